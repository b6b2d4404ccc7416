//! Lookup command - is a DOI or URL already registered?

use anyhow::{Context, Result};
use dataset_registry_domain::LookupOutcome;
use std::path::PathBuf;

use crate::args::LookupArgs;
use crate::config::AppConfig;

/// Exit status when the source is not registered
const EXIT_NOT_FOUND: i32 = 1;
/// Exit status when the input is neither a DOI nor a URL
const EXIT_UNRESOLVABLE: i32 = 2;

pub async fn execute(args: LookupArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let usecase = super::registry_usecase(&config, args.registry.as_deref());

    let outcome = usecase
        .lookup(&args.source)
        .await
        .context("Failed to read registry")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    match outcome {
        LookupOutcome::Found { .. } => Ok(()),
        LookupOutcome::NotFound { .. } => std::process::exit(EXIT_NOT_FOUND),
        LookupOutcome::Unresolvable { .. } => std::process::exit(EXIT_UNRESOLVABLE),
    }
}

fn print_outcome(outcome: &LookupOutcome) {
    match outcome {
        LookupOutcome::Found {
            canonical,
            fingerprint,
            dataset_ids,
        } => {
            println!("FOUND: {}", dataset_ids.join(", "));
            println!("  canonical:   {}", canonical);
            println!("  fingerprint: {}", fingerprint);
        }
        LookupOutcome::NotFound {
            canonical,
            fingerprint,
        } => {
            println!("NOT FOUND");
            println!("  canonical:   {}", canonical);
            println!("  fingerprint: {}", fingerprint);
        }
        LookupOutcome::Unresolvable { .. } => {
            println!("Input does not look like a DOI or resolvable URL.");
        }
    }
}
