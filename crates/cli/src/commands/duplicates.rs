//! Duplicates command - markdown report of shared fingerprints

use anyhow::{Context, Result};
use dataset_registry_domain::usecases::DuplicateReport;
use std::path::PathBuf;

use crate::args::DuplicatesArgs;
use crate::config::AppConfig;

pub async fn execute(args: DuplicatesArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let usecase = super::registry_usecase(&config, args.registry.as_deref());

    let report = usecase
        .duplicates()
        .await
        .context("Failed to read registry")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_markdown(&report));
    }

    Ok(())
}

fn render_markdown(report: &DuplicateReport) -> String {
    let mut out = String::from("## Duplicate check by source fingerprint\n\n");

    if report.rows == 0 {
        out.push_str("Registry is empty.\n");
        return out;
    }

    if report.duplicates.is_empty() {
        out.push_str("No duplicates found.\n");
        return out;
    }

    out.push_str("The following fingerprints are referenced by multiple dataset_ids:\n\n");
    for bucket in &report.duplicates {
        out.push_str(&format!(
            "- `{}` → {}\n",
            bucket.fingerprint,
            bucket.dataset_ids.join(", ")
        ));
    }

    out
}
