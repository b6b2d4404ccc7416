//! dataset-registry domain crate
//!
//! This crate contains the core identity-resolution logic following hexagonal architecture:
//! - `canon`: DOI and URL canonicalization, source resolution
//! - `fingerprint`: Short deterministic hashes of canonical sources
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `usecases`: Enrichment, indexing, lookup and import
//! - `policy`: Registry validation rules

pub mod canon;
pub mod fingerprint;
pub mod model;
pub mod policy;
pub mod ports;
pub mod usecases;

pub use canon::{canonical_source, canonicalize_doi, canonicalize_url, looks_like_doi_or_url};
pub use fingerprint::{Fingerprint, fingerprint};
pub use model::*;
pub use ports::*;
