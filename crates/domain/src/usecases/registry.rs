//! Registry use case - ties the pure core to a registry store

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::{
    canon::canonical_source,
    model::{DuplicateBucket, LookupOutcome, Registry},
    policy::{StructuralError, ValidationPolicy, ValidationReport, validate_registry},
    ports::{RegistryError, RegistryRepo},
    usecases::{
        enrich::{EnrichSummary, enrich_registry},
        index::{FingerprintIndex, find_duplicates, lookup_in, warn_oversized},
    },
};

/// Errors surfaced by registry operations
#[derive(Debug, Error)]
pub enum RegistryUseCaseError {
    #[error(transparent)]
    Storage(#[from] RegistryError),
    #[error("Invalid registry: {0}")]
    Structural(#[from] StructuralError),
}

/// Duplicate buckets together with the size of the registry they came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
    pub rows: usize,
    pub duplicates: Vec<DuplicateBucket>,
}

/// Use case for the enrich / lookup / report / validate commands
pub struct RegistryUseCase<R> {
    repo: R,
    policy: ValidationPolicy,
}

impl<R: RegistryRepo> RegistryUseCase<R> {
    pub fn new(repo: R, policy: ValidationPolicy) -> Self {
        Self { repo, policy }
    }

    /// Load the registry and enrich every row in memory
    ///
    /// All rows are enriched before any index is built over them.
    pub async fn load_enriched(&self) -> Result<(Registry, EnrichSummary), RegistryError> {
        let registry = self.repo.load().await?;
        Ok(enrich_registry(&registry))
    }

    /// Enrich the registry and write it back unless `dry_run`
    pub async fn enrich(&self, dry_run: bool) -> Result<EnrichSummary, RegistryUseCaseError> {
        let (mut registry, summary) = self.load_enriched().await?;

        if registry.is_empty() {
            return Err(StructuralError::Empty.into());
        }

        registry.columns = registry.output_columns();

        if dry_run {
            tracing::info!(changed = summary.changed, "Dry run, registry not written");
        } else {
            self.repo.save(&registry).await?;
            tracing::info!(
                rows = summary.rows,
                changed = summary.changed,
                ids_backfilled = summary.ids_backfilled,
                "Registry written"
            );
        }

        Ok(summary)
    }

    /// Look up a raw source; unresolvable input never touches the store
    ///
    /// Fingerprints are recomputed, but only ids present in the store are
    /// reported; a row still waiting for a derived id is not found by id.
    pub async fn lookup(&self, raw: &str) -> Result<LookupOutcome, RegistryError> {
        if canonical_source(raw).is_none() {
            return Ok(LookupOutcome::Unresolvable {
                input: raw.to_string(),
            });
        }

        let stored = self.repo.load().await?;
        let (mut enriched, _) = enrich_registry(&stored);
        for (row, original) in enriched.rows.iter_mut().zip(&stored.rows) {
            row.dataset_id.clone_from(&original.dataset_id);
        }

        let index = FingerprintIndex::build(&enriched.rows);
        Ok(lookup_in(&index, raw))
    }

    /// Every fingerprint claimed by more than one dataset id
    pub async fn duplicates(&self) -> Result<DuplicateReport, RegistryError> {
        let (registry, _) = self.load_enriched().await?;
        let duplicates = find_duplicates(&FingerprintIndex::build(&registry.rows));
        warn_oversized(&duplicates, self.policy.max_bucket_ids);
        Ok(DuplicateReport {
            rows: registry.rows.len(),
            duplicates,
        })
    }

    /// Validate the stored registry without writing anything
    pub async fn validate(&self) -> Result<ValidationReport, RegistryUseCaseError> {
        let registry = self.repo.load().await?;
        Ok(validate_registry(&registry, &self.policy)?)
    }
}

// Allow passing the store by reference
#[async_trait]
impl<R: RegistryRepo + ?Sized> RegistryRepo for &R {
    async fn load(&self) -> Result<Registry, RegistryError> {
        (*self).load().await
    }

    async fn save(&self, registry: &Registry) -> Result<(), RegistryError> {
        (*self).save(registry).await
    }
}
