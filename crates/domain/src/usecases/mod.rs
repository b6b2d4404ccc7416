//! Application use cases / business logic

pub mod enrich;
pub mod import;
pub mod index;
pub mod registry;

pub use enrich::{EnrichSummary, enrich_registry, enrich_row};
pub use import::{IMPORT_COLUMNS, ImportConfig, ImportSummary, ImportUseCase};
pub use index::{FingerprintIndex, build_index, find_duplicates, lookup, lookup_in};
pub use registry::{DuplicateReport, RegistryUseCase, RegistryUseCaseError};
