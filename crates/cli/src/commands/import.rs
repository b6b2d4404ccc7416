//! Import command - 10x Genomics scrape to registry CSV

use anyhow::{Context, Result};
use dataset_registry_adapters::{registry::CsvRegistryRepo, scrape::CsvScrapeSource};
use dataset_registry_domain::usecases::ImportUseCase;
use dataset_registry_domain::{RegistryRepo, ScrapeSource, SystemClock};
use std::path::PathBuf;

use crate::args::ImportArgs;
use crate::config::AppConfig;

pub async fn execute(args: ImportArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let output = config.registry_path(args.output.as_deref());

    if output.exists() && !args.force {
        anyhow::bail!(
            "Output file already exists: {}. Use --force to overwrite.",
            output.display()
        );
    }

    let records = CsvScrapeSource::new(&args.input)
        .load()
        .await
        .with_context(|| format!("Failed to read scrape file: {}", args.input.display()))?;

    let usecase = ImportUseCase::new(SystemClock, config.import_config());
    let (registry, summary) = usecase.import(&records);

    if registry.is_empty() {
        anyhow::bail!("No datasets found in {}", args.input.display());
    }

    CsvRegistryRepo::new(&output)
        .save(&registry)
        .await
        .with_context(|| format!("Failed to write registry: {}", output.display()))?;

    println!(
        "Imported {} of {} records into {} ({} duplicates skipped, {} without a resolvable url)",
        summary.imported,
        summary.read,
        output.display(),
        summary.duplicates_skipped,
        summary.unresolved
    );

    Ok(())
}
