//! In-memory registry store for testing and dry runs

use async_trait::async_trait;
use dataset_registry_domain::{Registry, RegistryError, RegistryRepo};
use std::sync::RwLock;

/// In-memory registry store implementation
///
/// Behaves like the CSV store at its edges: loading before anything was
/// stored is `NotFound`, and an empty registry is never saved.
pub struct InMemoryRegistryRepo {
    registry: RwLock<Option<Registry>>,
}

impl InMemoryRegistryRepo {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(None),
        }
    }

    /// Start from an already stored registry
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry: RwLock::new(Some(registry)),
        }
    }

    /// Current stored registry, if any
    pub fn snapshot(&self) -> Option<Registry> {
        self.registry.read().ok().and_then(|r| r.clone())
    }
}

impl Default for InMemoryRegistryRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(e: impl std::fmt::Display) -> RegistryError {
    RegistryError::Io(std::io::Error::other(e.to_string()))
}

#[async_trait]
impl RegistryRepo for InMemoryRegistryRepo {
    async fn load(&self) -> Result<Registry, RegistryError> {
        let registry = self.registry.read().map_err(poisoned)?;
        registry
            .clone()
            .ok_or_else(|| RegistryError::NotFound("in-memory registry".to_string()))
    }

    async fn save(&self, registry: &Registry) -> Result<(), RegistryError> {
        if registry.is_empty() {
            return Err(RegistryError::NoRows);
        }

        let mut stored = self.registry.write().map_err(poisoned)?;
        *stored = Some(registry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset_registry_domain::policy::ValidationPolicy;
    use dataset_registry_domain::usecases::RegistryUseCase;
    use dataset_registry_domain::{LookupOutcome, RegistryRow, fingerprint};

    fn registry(rows: &[(&str, &str)]) -> Registry {
        let columns = ["dataset_id", "name", "primary_source"];
        let rows = rows
            .iter()
            .map(|(id, source)| {
                RegistryRow::from_fields(columns.into_iter().zip([*id, "n", *source]))
            })
            .collect();
        Registry::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[tokio::test]
    async fn test_load_before_save_is_not_found() {
        let repo = InMemoryRegistryRepo::new();
        let result = repo.load().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let repo = InMemoryRegistryRepo::new();
        let stored = registry(&[("ds_a", "https://example.com/a")]);

        repo.save(&stored).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_save_refuses_empty_registry() {
        let repo = InMemoryRegistryRepo::new();
        let result = repo.save(&Registry::default()).await;
        assert!(matches!(result, Err(RegistryError::NoRows)));
        assert!(repo.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_enrich_through_usecase() {
        let repo = InMemoryRegistryRepo::with_registry(registry(&[(
            "",
            "https://www.10xgenomics.com/datasets/foo/",
        )]));
        let usecase = RegistryUseCase::new(&repo, ValidationPolicy::default());

        let summary = usecase.enrich(false).await.unwrap();
        assert_eq!(summary.ids_backfilled, 1);

        let saved = repo.snapshot().unwrap();
        assert_eq!(
            saved.rows[0].dataset_id,
            format!("ds_{}", fingerprint("https://10xgenomics.com/datasets/foo"))
        );
        assert!(saved.missing_columns().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_and_duplicates_through_usecase() {
        let repo = InMemoryRegistryRepo::with_registry(registry(&[
            ("b", "https://example.com/same"),
            ("a", "example.com/same/"),
        ]));
        let usecase = RegistryUseCase::new(&repo, ValidationPolicy::default());

        let outcome = usecase.lookup("https://www.example.com/same?utm_source=x").await.unwrap();
        assert!(matches!(
            outcome,
            LookupOutcome::Found { ref dataset_ids, .. } if dataset_ids == &["a", "b"]
        ));

        let report = usecase.duplicates().await.unwrap();
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].dataset_ids, vec!["a", "b"]);
    }
}
