//! dataset-registry adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `registry`: CSV file and in-memory registry stores
//! - `scrape`: CSV reader for scraped dataset listings

mod registry_csv;
mod registry_memory;
mod scrape_csv;

/// Re-exports for registry adapters
pub mod registry {
    pub use crate::registry_csv::CsvRegistryRepo;
    pub use crate::registry_memory::InMemoryRegistryRepo;
}

/// Re-exports for scrape adapters
pub mod scrape {
    pub use crate::scrape_csv::CsvScrapeSource;
}
