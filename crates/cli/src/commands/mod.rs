//! Subcommand implementations

pub mod config;
pub mod duplicates;
pub mod enrich;
pub mod import;
pub mod lookup;
pub mod resolve;
pub mod validate;

use dataset_registry_adapters::registry::CsvRegistryRepo;
use dataset_registry_domain::usecases::RegistryUseCase;
use std::path::Path;

use crate::config::AppConfig;

/// Registry use case over the CSV file selected by config and flags
pub(crate) fn registry_usecase(
    config: &AppConfig,
    override_path: Option<&Path>,
) -> RegistryUseCase<CsvRegistryRepo> {
    let path = config.registry_path(override_path);
    tracing::debug!(path = %path.display(), "Using registry");
    RegistryUseCase::new(CsvRegistryRepo::new(path), config.validation_policy())
}
