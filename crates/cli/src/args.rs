//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// dataset-registry: identity resolution and duplicate detection for a dataset registry
#[derive(Parser, Debug)]
#[command(name = "dataset-registry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a DOI or URL is already registered
    Lookup(LookupArgs),

    /// Check registry structure and report duplicate fingerprints
    Validate(ValidateArgs),

    /// Report every fingerprint claimed by more than one dataset
    Duplicates(DuplicatesArgs),

    /// Fill fingerprints and missing dataset ids, then write the registry back
    Enrich(EnrichArgs),

    /// Print the canonical form and fingerprint of sources
    Resolve(ResolveArgs),

    /// Convert a 10x Genomics scrape CSV into registry rows
    #[command(name = "import-10x")]
    Import10x(ImportArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// DOI or URL to check
    pub source: String,

    /// Override registry path
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Override registry path
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Fail when duplicate fingerprints are found
    #[arg(long)]
    pub strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DuplicatesArgs {
    /// Override registry path
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// Override registry path
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// DOIs or URLs to resolve
    #[arg(required = true)]
    pub sources: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Scrape CSV with dataset, product, species, sample_type, url columns
    pub input: PathBuf,

    /// Registry file to write (defaults to the configured registry path)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}
