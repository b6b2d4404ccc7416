//! Validate command - structural check plus duplicate warnings

use anyhow::Result;
use dataset_registry_domain::policy::ValidationReport;
use dataset_registry_domain::usecases::RegistryUseCaseError;
use std::path::PathBuf;

use crate::args::ValidateArgs;
use crate::config::AppConfig;

/// Exit status when strict mode finds duplicates
const EXIT_DUPLICATES: i32 = 1;
/// Exit status for a structurally broken registry
const EXIT_STRUCTURAL: i32 = 2;

pub async fn execute(args: ValidateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = AppConfig::load(config_path.as_deref())?;
    if args.strict {
        config.validate.strict = true;
    }

    let usecase = super::registry_usecase(&config, args.registry.as_deref());

    let report = match usecase.validate().await {
        Ok(report) => report,
        Err(RegistryUseCaseError::Structural(e)) => {
            if args.json {
                let output = serde_json::json!({ "status": "error", "error": e.to_string() });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                eprintln!("ERROR: {}", e);
            }
            std::process::exit(EXIT_STRUCTURAL);
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Failed to read registry")),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.failed {
        std::process::exit(EXIT_DUPLICATES);
    }

    Ok(())
}

fn print_report(report: &ValidationReport) {
    if report.duplicates.is_empty() {
        println!("OK: no cross-ID duplicates detected ({} rows)", report.rows);
    } else {
        println!("WARNING: duplicate fingerprints spanning multiple dataset_ids detected:");
        for bucket in &report.duplicates {
            println!(
                "  fp={} ids={}",
                bucket.fingerprint,
                bucket.dataset_ids.join(", ")
            );
        }
    }

    if report.stale_rows > 0 {
        println!(
            "NOTE: {} row(s) have stale fingerprints or ids; run `dataset-registry enrich`",
            report.stale_rows
        );
    }

    if !report.unresolved_primary.is_empty() {
        println!(
            "NOTE: primary source does not resolve for: {}",
            report.unresolved_primary.join(", ")
        );
    }

    if !report.malformed_fingerprints.is_empty() {
        println!(
            "NOTE: malformed stored fingerprints for: {}",
            report.malformed_fingerprints.join(", ")
        );
    }
}
