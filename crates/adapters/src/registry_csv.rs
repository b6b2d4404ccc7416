//! CSV-backed registry repository

use async_trait::async_trait;
use dataset_registry_domain::{Registry, RegistryError, RegistryRepo, RegistryRow};
use std::path::{Path, PathBuf};

/// Registry stored as one CSV file with a header row
pub struct CsvRegistryRepo {
    path: PathBuf,
}

impl CsvRegistryRepo {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Parse registry CSV bytes; an empty input yields an empty registry
pub(crate) fn parse_registry(bytes: &[u8]) -> Result<Registry, RegistryError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        // cells past the header have no column to be written back under
        if record.len() > columns.len() {
            return Err(RegistryError::Csv {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                message: format!(
                    "record has {} fields but the header has {}",
                    record.len(),
                    columns.len()
                ),
            });
        }
        let row = RegistryRow::from_fields(columns.iter().map(String::as_str).zip(record.iter()));
        rows.push(row);
    }

    Ok(Registry::new(columns, rows))
}

/// Serialize a registry, appending any missing required columns
pub(crate) fn render_registry(registry: &Registry) -> Result<Vec<u8>, RegistryError> {
    let columns = registry.output_columns();
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(&columns).map_err(csv_error)?;
    for row in &registry.rows {
        let values: Vec<String> = columns.iter().map(|c| row.field(c).into_owned()).collect();
        writer.write_record(&values).map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| RegistryError::Io(e.into_error()))
}

pub(crate) fn csv_error(error: csv::Error) -> RegistryError {
    let line = error.position().map(|p| p.line()).unwrap_or(0);
    RegistryError::Csv {
        line,
        message: error.to_string(),
    }
}

#[async_trait]
impl RegistryRepo for CsvRegistryRepo {
    async fn load(&self) -> Result<Registry, RegistryError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Err(RegistryError::NotFound(self.path.display().to_string()));
        }

        let bytes = tokio::fs::read(&self.path).await?;
        let registry = parse_registry(&bytes)?;

        tracing::debug!(
            path = %self.path.display(),
            rows = registry.rows.len(),
            columns = registry.columns.len(),
            "Loaded registry"
        );

        Ok(registry)
    }

    async fn save(&self, registry: &Registry) -> Result<(), RegistryError> {
        if registry.is_empty() {
            return Err(RegistryError::NoRows);
        }

        let bytes = render_registry(registry)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write beside the target, then swap in
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            rows = registry.rows.len(),
            "Saved registry"
        );

        Ok(())
    }
}
