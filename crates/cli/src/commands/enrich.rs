//! Enrich command - fill fingerprints and ids, write the registry back

use anyhow::{Context, Result};
use dataset_registry_domain::usecases::RegistryUseCaseError;
use std::path::PathBuf;

use crate::args::EnrichArgs;
use crate::config::AppConfig;

pub async fn execute(args: EnrichArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let path = config.registry_path(args.registry.as_deref());
    let usecase = super::registry_usecase(&config, Some(&path));

    let summary = match usecase.enrich(args.dry_run).await {
        Ok(summary) => summary,
        Err(RegistryUseCaseError::Structural(e)) => {
            anyhow::bail!("Cannot enrich {}: {}", path.display(), e)
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to enrich {}", path.display()));
        }
    };

    if args.json {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "dry_run": args.dry_run,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "Enriched {} rows: {} changed, {} dataset ids filled, {} unresolvable sources",
            summary.rows, summary.changed, summary.ids_backfilled, summary.unresolved_sources
        );
        if args.dry_run {
            println!("Dry run: {} not modified", path.display());
        } else {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
