//! Import use case - turns a 10x Genomics scrape into registry rows

use serde::Serialize;
use std::collections::HashSet;

use crate::{
    canon::{canonical_source, looks_like_doi_or_url},
    model::{Registry, RegistryRow, ScrapedDataset, SourceKind},
    ports::Clock,
    usecases::enrich::enrich_row,
};

/// Column layout of an imported registry
pub const IMPORT_COLUMNS: [&str; 17] = [
    "dataset_id",
    "name",
    "short_description",
    "primary_source_type",
    "primary_source",
    "primary_fingerprint",
    "all_sources",
    "fingerprints",
    "doi",
    "pmid",
    "manufacturer",
    "product",
    "release_date",
    "tags",
    "curator",
    "last_updated",
    "notes",
];

/// Configuration for the import use case
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Value for the `manufacturer` column
    pub manufacturer: String,
    /// Value for the `curator` column
    pub curator: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            manufacturer: "10x Genomics".to_string(),
            curator: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub read: usize,
    pub imported: usize,
    /// Records dropped because an earlier record had the same dataset id
    pub duplicates_skipped: usize,
    /// Records whose url did not resolve
    pub unresolved: usize,
}

/// Use case for mapping scraped records onto the registry layout
pub struct ImportUseCase<C> {
    clock: C,
    config: ImportConfig,
}

impl<C: Clock> ImportUseCase<C> {
    pub fn new(clock: C, config: ImportConfig) -> Self {
        Self { clock, config }
    }

    /// Map, enrich and deduplicate by dataset id (first record wins)
    pub fn import(&self, records: &[ScrapedDataset]) -> (Registry, ImportSummary) {
        let today = self.clock.now().date().to_string();
        let mut summary = ImportSummary {
            read: records.len(),
            ..Default::default()
        };

        let mut seen = HashSet::new();
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let row = enrich_row(&self.map_record(record, &today));

            if row.primary_fingerprint.is_none() {
                summary.unresolved += 1;
            }

            if !row.dataset_id.is_empty() && !seen.insert(row.dataset_id.clone()) {
                tracing::debug!(dataset_id = %row.dataset_id, "Skipping duplicate record");
                summary.duplicates_skipped += 1;
                continue;
            }

            rows.push(row);
        }

        summary.imported = rows.len();
        tracing::info!(
            read = summary.read,
            imported = summary.imported,
            duplicates_skipped = summary.duplicates_skipped,
            "Imported scraped datasets"
        );

        let columns = IMPORT_COLUMNS.iter().map(|c| c.to_string()).collect();
        (Registry::new(columns, rows), summary)
    }

    fn map_record(&self, record: &ScrapedDataset, today: &str) -> RegistryRow {
        let product = record.product.trim();
        let species = record.species.trim();
        let sample_type = record.sample_type.trim();
        let url = record.url.trim();

        let canonical = if looks_like_doi_or_url(url) {
            canonical_source(url)
        } else {
            if !url.is_empty() {
                tracing::debug!(url, "Ignoring url that is neither DOI nor URL");
            }
            None
        };

        let source_type = match canonical.as_ref().map(|c| c.kind()) {
            Some(SourceKind::Url) => "url",
            Some(SourceKind::Doi) => "doi",
            None => "",
        };

        let short_description = format!("{} | {} | {}", product, species, sample_type)
            .trim_matches(|c: char| c == ' ' || c == '|')
            .to_string();

        let tags = [species, sample_type]
            .iter()
            .filter(|t| !t.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(",");

        let mut row = RegistryRow {
            name: record.dataset.trim().to_string(),
            primary_source: canonical.map(|c| c.into_string()).unwrap_or_default(),
            ..Default::default()
        };

        for (column, value) in [
            ("short_description", short_description.as_str()),
            ("primary_source_type", source_type),
            ("doi", ""),
            ("pmid", ""),
            ("manufacturer", self.config.manufacturer.as_str()),
            ("product", product),
            ("release_date", ""),
            ("tags", tags.as_str()),
            ("curator", self.config.curator.as_str()),
            ("last_updated", today),
            ("notes", ""),
        ] {
            row.set_extra(column, value);
        }

        row
    }
}
