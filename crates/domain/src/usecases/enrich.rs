//! Row enrichment - derives fingerprints and backfills dataset ids

use serde::Serialize;

use crate::{
    canon::canonical_source,
    fingerprint::Fingerprint,
    model::{DATASET_ID_PREFIX, Registry, RegistryRow},
};

/// Counters collected while enriching a whole registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichSummary {
    /// Rows seen
    pub rows: usize,
    /// Rows whose persisted form changed
    pub changed: usize,
    /// Rows that received a derived `dataset_id`
    pub ids_backfilled: usize,
    /// Source strings that did not resolve and got no fingerprint
    pub unresolved_sources: usize,
}

/// Enrich one row
///
/// Pure and idempotent: running it on an already enriched row returns an
/// equal row. A non-blank `dataset_id` is never replaced.
pub fn enrich_row(row: &RegistryRow) -> RegistryRow {
    enrich_row_counted(row).0
}

fn enrich_row_counted(row: &RegistryRow) -> (RegistryRow, usize) {
    let mut sources: Vec<String> = row
        .all_sources
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if sources.is_empty() {
        let primary = row.primary_source.trim();
        if !primary.is_empty() {
            sources.push(primary.to_string());
        }
    }

    let mut unresolved = 0;
    let fingerprints: Vec<Fingerprint> = sources
        .iter()
        .filter_map(|source| match canonical_source(source) {
            Some(canonical) => Some(canonical.fingerprint()),
            None => {
                tracing::debug!(
                    dataset_id = %row.dataset_id,
                    source = %source,
                    "Dropping unresolvable source"
                );
                unresolved += 1;
                None
            }
        })
        .collect();

    let primary_fingerprint = canonical_source(&row.primary_source).map(|c| c.fingerprint());

    let mut enriched = row.clone();
    enriched.all_sources = sources;
    enriched.fingerprints = fingerprints;
    enriched.dataset_id = row.dataset_id.trim().to_string();

    if enriched.dataset_id.is_empty() {
        if let Some(fp) = &primary_fingerprint {
            enriched.dataset_id = format!("{}{}", DATASET_ID_PREFIX, fp);
        }
    }
    enriched.primary_fingerprint = primary_fingerprint;

    (enriched, unresolved)
}

/// Enrich every row of a registry, keeping column order
pub fn enrich_registry(registry: &Registry) -> (Registry, EnrichSummary) {
    let mut summary = EnrichSummary {
        rows: registry.rows.len(),
        ..Default::default()
    };

    let rows = registry
        .rows
        .iter()
        .map(|row| {
            let (enriched, unresolved) = enrich_row_counted(row);
            summary.unresolved_sources += unresolved;
            if row.dataset_id.trim().is_empty() && !enriched.dataset_id.is_empty() {
                summary.ids_backfilled += 1;
            }
            if persisted_differs(row, &enriched) {
                summary.changed += 1;
            }
            enriched
        })
        .collect();

    tracing::debug!(
        rows = summary.rows,
        changed = summary.changed,
        ids_backfilled = summary.ids_backfilled,
        "Enriched registry"
    );

    (Registry::new(registry.columns.clone(), rows), summary)
}

/// Whether two rows would be written differently
pub(crate) fn persisted_differs(before: &RegistryRow, after: &RegistryRow) -> bool {
    ["dataset_id", "primary_fingerprint", "all_sources", "fingerprints"]
        .iter()
        .any(|column| before.field(column) != after.field(column))
}
