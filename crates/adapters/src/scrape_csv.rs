//! CSV reader for scraped dataset listings

use async_trait::async_trait;
use dataset_registry_domain::{RegistryError, ScrapeSource, ScrapedDataset};
use std::path::{Path, PathBuf};

use crate::registry_csv::csv_error;

/// Scrape file with columns `dataset, product, species, sample_type, url`
///
/// Missing columns read as empty, unknown columns are ignored.
pub struct CsvScrapeSource {
    path: PathBuf,
}

impl CsvScrapeSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

fn parse_scrape(bytes: &[u8]) -> Result<Vec<ScrapedDataset>, RegistryError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    reader
        .deserialize::<ScrapedDataset>()
        .map(|record| record.map_err(csv_error))
        .collect()
}

#[async_trait]
impl ScrapeSource for CsvScrapeSource {
    async fn load(&self) -> Result<Vec<ScrapedDataset>, RegistryError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Err(RegistryError::NotFound(self.path.display().to_string()));
        }

        let bytes = tokio::fs::read(&self.path).await?;
        let records = parse_scrape(&bytes)?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "Loaded scrape");
        Ok(records)
    }
}
