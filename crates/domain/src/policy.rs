//! Registry validation rules

use serde::Serialize;

use crate::{
    model::{DuplicateBucket, Registry, RegistryRow},
    usecases::{
        enrich::{enrich_registry, persisted_differs},
        index::{build_index, find_duplicates, warn_oversized},
    },
};

/// Policy configuration
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    /// Treat duplicate fingerprints as a failure
    pub strict: bool,
    /// Distinct ids per bucket above which a warning is logged
    pub max_bucket_ids: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            strict: false,
            max_bucket_ids: 10,
        }
    }
}

/// Structural problems that make a registry unusable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("registry is empty")]
    Empty,
    #[error("missing columns: {missing:?}")]
    MissingColumns { missing: Vec<String> },
}

/// Findings from validating a structurally sound registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub rows: usize,
    /// Fingerprints spanning more than one dataset id
    pub duplicates: Vec<DuplicateBucket>,
    /// Rows whose stored fingerprints or id differ from a fresh enrichment
    pub stale_rows: usize,
    /// Rows whose primary source does not resolve
    pub unresolved_primary: Vec<String>,
    /// Rows carrying a stored fingerprint that is not 12 lowercase hex chars
    pub malformed_fingerprints: Vec<String>,
    /// Whether the report fails under the policy in effect
    pub failed: bool,
}

/// Check structure, then enrich in memory and look for cross-id duplicates
///
/// Nothing is written back. Duplicates only fail the report in strict mode.
pub fn validate_registry(
    registry: &Registry,
    policy: &ValidationPolicy,
) -> Result<ValidationReport, StructuralError> {
    if registry.is_empty() {
        return Err(StructuralError::Empty);
    }

    let missing = registry.missing_columns();
    if !missing.is_empty() {
        return Err(StructuralError::MissingColumns {
            missing: missing.into_iter().map(str::to_string).collect(),
        });
    }

    let (enriched, _) = enrich_registry(registry);

    let stale_rows = registry
        .rows
        .iter()
        .zip(&enriched.rows)
        .filter(|(before, after)| persisted_differs(before, after))
        .count();

    let unresolved_primary = enriched
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.primary_fingerprint.is_none())
        .map(|(i, row)| row_label(i, row))
        .collect();

    let malformed_fingerprints = registry
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            row.fingerprints
                .iter()
                .chain(row.primary_fingerprint.as_ref())
                .any(|fp| !fp.is_well_formed())
        })
        .map(|(i, row)| row_label(i, row))
        .collect();

    let duplicates = find_duplicates(&build_index(&enriched.rows));
    warn_oversized(&duplicates, policy.max_bucket_ids);

    let failed = policy.strict && !duplicates.is_empty();

    tracing::info!(
        rows = enriched.rows.len(),
        duplicates = duplicates.len(),
        stale_rows,
        strict = policy.strict,
        "Validated registry"
    );

    Ok(ValidationReport {
        rows: enriched.rows.len(),
        duplicates,
        stale_rows,
        unresolved_primary,
        malformed_fingerprints,
        failed,
    })
}

fn row_label(index: usize, row: &RegistryRow) -> String {
    if row.dataset_id.is_empty() {
        format!("row {}", index + 1)
    } else {
        row.dataset_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{Fingerprint, fingerprint};
    use crate::model::REQUIRED_COLUMNS;

    fn full_columns() -> Vec<String> {
        REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn row(dataset_id: &str, primary: &str) -> RegistryRow {
        RegistryRow {
            dataset_id: dataset_id.to_string(),
            name: dataset_id.to_string(),
            primary_source: primary.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_registry_is_structural_error() {
        let registry = Registry::new(full_columns(), vec![]);
        assert_eq!(
            validate_registry(&registry, &ValidationPolicy::default()),
            Err(StructuralError::Empty)
        );
    }

    #[test]
    fn test_missing_columns_is_structural_error() {
        let registry = Registry::new(
            vec!["dataset_id".to_string(), "name".to_string()],
            vec![row("a", "https://example.com/a")],
        );

        match validate_registry(&registry, &ValidationPolicy::default()) {
            Err(StructuralError::MissingColumns { missing }) => {
                assert_eq!(
                    missing,
                    vec![
                        "primary_source",
                        "primary_fingerprint",
                        "all_sources",
                        "fingerprints"
                    ]
                );
            }
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicates_warn_but_pass_by_default() {
        let registry = Registry::new(
            full_columns(),
            vec![
                row("a", "https://example.com/x"),
                row("b", "www.example.com/x/"),
            ],
        );

        let report = validate_registry(&registry, &ValidationPolicy::default()).unwrap();
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].dataset_ids, vec!["a", "b"]);
        assert!(!report.failed);
    }

    #[test]
    fn test_strict_mode_fails_on_duplicates() {
        let registry = Registry::new(
            full_columns(),
            vec![
                row("a", "https://example.com/x"),
                row("b", "www.example.com/x/"),
            ],
        );
        let policy = ValidationPolicy {
            strict: true,
            ..Default::default()
        };

        assert!(validate_registry(&registry, &policy).unwrap().failed);
    }

    #[test]
    fn test_reports_stale_and_unresolved_rows() {
        let registry = Registry::new(
            full_columns(),
            vec![row("", "https://example.com/x"), row("b", "not available")],
        );

        let report = validate_registry(&registry, &ValidationPolicy::default()).unwrap();
        assert_eq!(report.rows, 2);
        // both rows gain an all_sources fallback, only the first a fingerprint
        assert_eq!(report.stale_rows, 2);
        assert_eq!(report.unresolved_primary, vec!["b"]);
        assert!(report.duplicates.is_empty());
        assert!(report.malformed_fingerprints.is_empty());
        assert!(!report.failed);
    }

    #[test]
    fn test_reports_malformed_stored_fingerprints() {
        let mut legacy = row("a", "https://example.com/a");
        legacy.fingerprints = vec![Fingerprint::from_stored("ABC").unwrap()];
        let mut clean = row("b", "https://example.com/b");
        clean.primary_fingerprint = Some(fingerprint("https://example.com/b"));
        let mut blank_id = row("", "https://example.com/c");
        blank_id.primary_fingerprint = Fingerprint::from_stored("not-a-hash");

        let registry = Registry::new(full_columns(), vec![legacy, clean, blank_id]);

        let report = validate_registry(&registry, &ValidationPolicy::default()).unwrap();
        assert_eq!(report.malformed_fingerprints, vec!["a", "row 3"]);
        assert!(!report.failed);
    }
}
