//! Domain models and value objects

use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

use crate::fingerprint::{Fingerprint, fingerprint};

/// Prefix used when a `dataset_id` is derived from the primary fingerprint
pub const DATASET_ID_PREFIX: &str = "ds_";

/// Separator for list-valued registry columns
pub const LIST_SEPARATOR: char = '|';

/// Columns every registry file must carry
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "dataset_id",
    "name",
    "primary_source",
    "primary_fingerprint",
    "all_sources",
    "fingerprints",
];

/// Kind of external reference a canonical source denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Doi,
    Url,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Doi => "doi",
            SourceKind::Url => "url",
        }
    }
}

/// A normalized reference to an external dataset
///
/// The string form is `doi:`-prefixed for DOIs and a bare `https://` URL
/// otherwise, so both kinds share one fingerprint space without colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalSource {
    kind: SourceKind,
    value: String,
}

impl CanonicalSource {
    pub const DOI_PREFIX: &'static str = "doi:";

    /// Wrap an already-normalized, unprefixed DOI
    pub(crate) fn doi(doi: &str) -> Self {
        Self {
            kind: SourceKind::Doi,
            value: format!("{}{}", Self::DOI_PREFIX, doi),
        }
    }

    /// Wrap an already-normalized URL
    pub(crate) fn url(url: String) -> Self {
        Self {
            kind: SourceKind::Url,
            value: url,
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// Fingerprint of this source's string form
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint(&self.value)
    }
}

impl Serialize for CanonicalSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl fmt::Display for CanonicalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// One dataset entry of the registry
///
/// List-valued columns are held as vectors; they are only joined with
/// [`LIST_SEPARATOR`] when a row is written back out. Columns this type does
/// not know about are kept in `extra`, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryRow {
    pub dataset_id: String,
    pub name: String,
    pub primary_source: String,
    pub primary_fingerprint: Option<Fingerprint>,
    /// Raw alternate sources as stored, not canonicalized
    pub all_sources: Vec<String>,
    /// Fingerprints aligned with the resolvable entries of `all_sources`
    pub fingerprints: Vec<Fingerprint>,
    #[serde(skip)]
    pub extra: Vec<(String, String)>,
}

impl RegistryRow {
    /// Build a row from `(column, value)` pairs read at the storage boundary
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut row = Self::default();

        for (column, value) in fields {
            match column {
                "dataset_id" => row.dataset_id = value.trim().to_string(),
                "name" => row.name = value.to_string(),
                "primary_source" => row.primary_source = value.to_string(),
                "primary_fingerprint" => row.primary_fingerprint = Fingerprint::from_stored(value),
                "all_sources" => row.all_sources = split_list(value),
                "fingerprints" => {
                    row.fingerprints = split_list(value)
                        .into_iter()
                        .filter_map(|s| Fingerprint::from_stored(&s))
                        .collect();
                }
                other => row.extra.push((other.to_string(), value.to_string())),
            }
        }

        row
    }

    /// Value of a column in its persisted string form
    pub fn field(&self, column: &str) -> Cow<'_, str> {
        match column {
            "dataset_id" => Cow::Borrowed(&self.dataset_id),
            "name" => Cow::Borrowed(&self.name),
            "primary_source" => Cow::Borrowed(&self.primary_source),
            "primary_fingerprint" => Cow::Borrowed(
                self.primary_fingerprint
                    .as_ref()
                    .map(Fingerprint::as_str)
                    .unwrap_or_default(),
            ),
            "all_sources" => Cow::Owned(join_list(self.all_sources.iter().map(String::as_str))),
            "fingerprints" => Cow::Owned(join_list(self.fingerprints.iter().map(|f| f.as_str()))),
            other => Cow::Borrowed(self.extra_field(other).unwrap_or_default()),
        }
    }

    /// Value of a column not modelled by a named field
    pub fn extra_field(&self, column: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Set a column not modelled by a named field, keeping its position if present
    pub fn set_extra(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match self.extra.iter_mut().find(|(name, _)| name == column) {
            Some(entry) => entry.1 = value,
            None => self.extra.push((column.to_string(), value)),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    value.split(LIST_SEPARATOR).map(str::to_string).collect()
}

fn join_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push(LIST_SEPARATOR);
        }
        out.push_str(item);
    }
    out
}

/// A registry file: header order plus rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    /// Column names in file order
    pub columns: Vec<String>,
    pub rows: Vec<RegistryRow>,
}

impl Registry {
    pub fn new(columns: Vec<String>, rows: Vec<RegistryRow>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Required columns absent from the header
    pub fn missing_columns(&self) -> Vec<&'static str> {
        REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|required| !self.columns.iter().any(|c| c == required))
            .collect()
    }

    /// Columns to write: the existing header, then any missing required columns
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns = self.columns.clone();
        columns.extend(self.missing_columns().into_iter().map(str::to_string));
        columns
    }
}

/// Fingerprint referenced by more than one dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateBucket {
    pub fingerprint: Fingerprint,
    /// Distinct dataset ids, sorted
    pub dataset_ids: Vec<String>,
}

/// Result of looking up a raw source in a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// The source resolves and is claimed by at least one dataset
    Found {
        canonical: CanonicalSource,
        fingerprint: Fingerprint,
        dataset_ids: Vec<String>,
    },
    /// The source resolves but no dataset claims it
    NotFound {
        canonical: CanonicalSource,
        fingerprint: Fingerprint,
    },
    /// The input is neither a DOI nor a URL with a host
    Unresolvable { input: String },
}

/// One record of a 10x Genomics dataset scrape
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScrapedDataset {
    #[serde(default)]
    pub dataset: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub sample_type: String,
    #[serde(default)]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&'static str, &'static str)]) -> RegistryRow {
        RegistryRow::from_fields(pairs.iter().copied())
    }

    #[test]
    fn test_from_fields_splits_lists_and_keeps_extras() {
        let row = fields(&[
            ("dataset_id", "ds_1"),
            ("notes", "hello"),
            ("all_sources", "a.org/x| doi:10.1000/y"),
            ("fingerprints", "aaaaaaaaaaaa||bbbbbbbbbbbb"),
            ("tags", "mouse"),
        ]);

        assert_eq!(row.dataset_id, "ds_1");
        assert_eq!(row.all_sources, vec!["a.org/x", " doi:10.1000/y"]);
        assert_eq!(row.fingerprints.len(), 2);
        assert_eq!(row.fingerprints[1].as_str(), "bbbbbbbbbbbb");
        assert_eq!(row.extra_field("notes"), Some("hello"));
        assert_eq!(row.extra[1].0, "tags");
    }

    #[test]
    fn test_field_joins_lists() {
        let mut row = fields(&[("all_sources", "a|b")]);
        row.fingerprints = vec![fingerprint("a"), fingerprint("b")];

        assert_eq!(row.field("all_sources"), "a|b");
        let joined = row.field("fingerprints");
        assert_eq!(joined.split('|').count(), 2);
        assert_eq!(row.field("primary_fingerprint"), "");
        assert_eq!(row.field("unknown"), "");
    }

    #[test]
    fn test_blank_list_column_is_empty() {
        let row = fields(&[("all_sources", "  "), ("fingerprints", "")]);
        assert!(row.all_sources.is_empty());
        assert!(row.fingerprints.is_empty());
    }

    #[test]
    fn test_set_extra_keeps_position() {
        let mut row = fields(&[("a", "1"), ("b", "2")]);
        row.set_extra("a", "3");
        row.set_extra("c", "4");
        assert_eq!(
            row.extra,
            vec![
                ("a".to_string(), "3".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), "4".to_string()),
            ]
        );
    }

    #[test]
    fn test_output_columns_appends_missing_required() {
        let registry = Registry::new(
            vec!["name".to_string(), "notes".to_string(), "dataset_id".to_string()],
            vec![],
        );

        assert_eq!(
            registry.missing_columns(),
            vec![
                "primary_source",
                "primary_fingerprint",
                "all_sources",
                "fingerprints"
            ]
        );
        let columns = registry.output_columns();
        assert_eq!(&columns[..3], &["name", "notes", "dataset_id"]);
        assert_eq!(columns.len(), 7);
    }
}
