//! Configuration loading and management

use anyhow::{Context, Result};
use dataset_registry_domain::policy::ValidationPolicy;
use dataset_registry_domain::usecases::ImportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub validate: ValidateConfig,

    #[serde(default)]
    pub import: ImportSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateConfig {
    #[serde(default)]
    pub strict: bool,

    #[serde(default = "default_max_bucket_ids")]
    pub max_bucket_ids: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSettings {
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,

    #[serde(default)]
    pub curator: String,
}

// Default value functions
fn default_registry_path() -> PathBuf {
    PathBuf::from("registry/datasets.csv")
}

fn default_max_bucket_ids() -> usize {
    10
}

fn default_manufacturer() -> String {
    "10x Genomics".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
        }
    }
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_bucket_ids: default_max_bucket_ids(),
        }
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            manufacturer: default_manufacturer(),
            curator: String::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("DATASET_REGISTRY")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Registry path, preferring a command-line override
    pub fn registry_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.general.registry_path.clone())
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            strict: self.validate.strict,
            max_bucket_ids: self.validate.max_bucket_ids,
        }
    }

    pub fn import_config(&self) -> ImportConfig {
        ImportConfig {
            manufacturer: self.import.manufacturer.clone(),
            curator: self.import.curator.clone(),
        }
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# dataset-registry configuration

[general]
registry_path = "registry/datasets.csv"

[validate]
# Fail validation when a fingerprint is claimed by more than one dataset_id
strict = false
# Warn when a duplicate bucket spans more dataset_ids than this
max_bucket_ids = 10

[import]
manufacturer = "10x Genomics"
curator = ""
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_toml_parses() {
        let config: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        assert_eq!(
            config.general.registry_path,
            PathBuf::from("registry/datasets.csv")
        );
        assert!(!config.validate.strict);
        assert_eq!(config.import.manufacturer, "10x Genomics");
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.validate.max_bucket_ids, 10);
        assert!(config.import.curator.is_empty());
    }

    #[test]
    fn test_registry_path_override() {
        let config = AppConfig::default();
        assert_eq!(
            config.registry_path(Some(Path::new("other.csv"))),
            PathBuf::from("other.csv")
        );
        assert_eq!(config.registry_path(None), config.general.registry_path);
    }
}
