//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real storage.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{Registry, ScrapedDataset};

/// Error type for registry storage operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Registry not found: {0}")]
    NotFound(String),
    #[error("CSV error at line {line}: {message}")]
    Csv { line: u64, message: String },
    #[error("Nothing to write: registry has no rows")]
    NoRows,
}

/// Port for reading and writing the persisted registry
#[async_trait]
pub trait RegistryRepo: Send + Sync {
    /// Load every row with its header order
    async fn load(&self) -> Result<Registry, RegistryError>;

    /// Replace the persisted registry with the given one
    async fn save(&self, registry: &Registry) -> Result<(), RegistryError>;
}

/// Port for reading a scraped dataset listing
#[async_trait]
pub trait ScrapeSource: Send + Sync {
    async fn load(&self) -> Result<Vec<ScrapedDataset>, RegistryError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
