//! Fingerprint index, duplicate detection and lookup

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    canon::canonical_source,
    fingerprint::Fingerprint,
    model::{DuplicateBucket, LookupOutcome, RegistryRow},
};

/// Fingerprint → dataset ids claiming it, across all rows of a registry
///
/// A row may appear more than once in a bucket (once per column that carries
/// the fingerprint); consumers collapse ids before reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintIndex {
    buckets: BTreeMap<Fingerprint, Vec<String>>,
}

impl FingerprintIndex {
    /// Build from enriched rows
    pub fn build(rows: &[RegistryRow]) -> Self {
        let mut buckets: BTreeMap<Fingerprint, Vec<String>> = BTreeMap::new();

        for row in rows {
            for fp in row.fingerprints.iter().chain(row.primary_fingerprint.as_ref()) {
                buckets
                    .entry(fp.clone())
                    .or_default()
                    .push(row.dataset_id.clone());
            }
        }

        Self { buckets }
    }

    /// Raw bucket for a fingerprint, in insertion order
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&[String]> {
        self.buckets.get(fingerprint).map(Vec::as_slice)
    }

    /// Distinct non-blank ids for a fingerprint, sorted
    pub fn dataset_ids(&self, fingerprint: &Fingerprint) -> Vec<String> {
        self.get(fingerprint).map(distinct_ids).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &[String])> {
        self.buckets.iter().map(|(fp, ids)| (fp, ids.as_slice()))
    }
}

fn distinct_ids(ids: &[String]) -> Vec<String> {
    ids.iter()
        .filter(|id| !id.trim().is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Build the index over a registry's rows
pub fn build_index(rows: &[RegistryRow]) -> FingerprintIndex {
    FingerprintIndex::build(rows)
}

/// Fingerprints claimed by more than one distinct dataset id
///
/// Buckets come out ordered by fingerprint with ids sorted and deduplicated.
pub fn find_duplicates(index: &FingerprintIndex) -> Vec<DuplicateBucket> {
    index
        .iter()
        .filter_map(|(fp, ids)| {
            let dataset_ids = distinct_ids(ids);
            (dataset_ids.len() > 1).then(|| DuplicateBucket {
                fingerprint: fp.clone(),
                dataset_ids,
            })
        })
        .collect()
}

/// Warn about buckets whose distinct id count exceeds `max_ids`
///
/// A bucket that large more likely signals a shared landing page or a
/// truncated-hash collision than genuine duplicates. Nothing is merged.
pub fn warn_oversized(duplicates: &[DuplicateBucket], max_ids: usize) -> usize {
    let mut oversized = 0;
    for bucket in duplicates.iter().filter(|b| b.dataset_ids.len() > max_ids) {
        oversized += 1;
        tracing::warn!(
            fingerprint = %bucket.fingerprint,
            dataset_ids = bucket.dataset_ids.len(),
            max_ids,
            "Implausibly large duplicate bucket"
        );
    }
    oversized
}

/// Look up a raw source among enriched rows
pub fn lookup(rows: &[RegistryRow], raw: &str) -> LookupOutcome {
    lookup_in(&FingerprintIndex::build(rows), raw)
}

/// Look up a raw source in a prebuilt index
pub fn lookup_in(index: &FingerprintIndex, raw: &str) -> LookupOutcome {
    let Some(canonical) = canonical_source(raw) else {
        return LookupOutcome::Unresolvable {
            input: raw.to_string(),
        };
    };

    let fingerprint = canonical.fingerprint();
    let dataset_ids = index.dataset_ids(&fingerprint);

    if dataset_ids.is_empty() {
        LookupOutcome::NotFound {
            canonical,
            fingerprint,
        }
    } else {
        LookupOutcome::Found {
            canonical,
            fingerprint,
            dataset_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint;
    use crate::usecases::enrich::enrich_row;

    fn enriched(dataset_id: &str, primary: &str, all_sources: &[&str]) -> RegistryRow {
        enrich_row(&RegistryRow {
            dataset_id: dataset_id.to_string(),
            primary_source: primary.to_string(),
            all_sources: all_sources.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_index_collects_all_fingerprints() {
        let rows = vec![
            enriched("a", "https://example.com/a", &["https://example.com/a", "doi:10.1000/a"]),
            enriched("b", "https://example.com/b", &[]),
        ];
        let index = build_index(&rows);

        let fp_a = fingerprint("https://example.com/a");
        // once from all_sources, once from primary
        assert_eq!(index.get(&fp_a), Some(&["a".to_string(), "a".to_string()][..]));
        assert_eq!(index.dataset_ids(&fp_a), vec!["a"]);
        assert_eq!(index.dataset_ids(&fingerprint("doi:10.1000/a")), vec!["a"]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_same_row_twice_is_not_a_duplicate() {
        let rows = vec![enriched("a", "https://example.com/a", &[])];
        assert!(find_duplicates(&build_index(&rows)).is_empty());
    }

    #[test]
    fn test_duplicates_across_ids() {
        let rows = vec![
            enriched("zeta", "https://www.example.com/data/", &[]),
            enriched("alpha", "http://example.com/data?utm_source=mail", &[]),
            enriched("other", "https://example.com/other", &[]),
        ];

        let duplicates = find_duplicates(&build_index(&rows));
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].fingerprint, fingerprint("https://example.com/data"));
        assert_eq!(duplicates[0].dataset_ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_alternate_source_overlap_is_a_duplicate() {
        let rows = vec![
            enriched("a", "https://example.com/a", &["https://example.com/a", "10.1000/shared"]),
            enriched("b", "https://doi.org/10.1000/SHARED", &[]),
        ];

        let duplicates = find_duplicates(&build_index(&rows));
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].fingerprint, fingerprint("doi:10.1000/shared"));
    }

    #[test]
    fn test_blank_ids_are_ignored_when_reporting() {
        let mut row = enriched("x", "https://example.com/a", &[]);
        row.dataset_id = String::new();
        let rows = vec![row, enriched("y", "https://example.com/a", &[])];

        assert!(find_duplicates(&build_index(&rows)).is_empty());
    }

    #[test]
    fn test_lookup_outcomes() {
        let rows = vec![
            enriched("a", "https://example.com/a", &[]),
            enriched("b", "example.com/a/", &[]),
        ];

        match lookup(&rows, "HTTP://WWW.EXAMPLE.COM/a?gclid=1") {
            LookupOutcome::Found { dataset_ids, canonical, .. } => {
                assert_eq!(dataset_ids, vec!["a", "b"]);
                assert_eq!(canonical.as_str(), "https://example.com/a");
            }
            other => panic!("expected found, got {other:?}"),
        }

        assert!(matches!(
            lookup(&rows, "https://example.com/missing"),
            LookupOutcome::NotFound { .. }
        ));
        assert!(matches!(
            lookup(&rows, "not a url or doi"),
            LookupOutcome::Unresolvable { .. }
        ));
    }

    #[test]
    fn test_warn_oversized_counts() {
        let bucket = DuplicateBucket {
            fingerprint: fingerprint("x"),
            dataset_ids: vec!["a".into(), "b".into(), "c".into()],
        };
        assert_eq!(warn_oversized(std::slice::from_ref(&bucket), 2), 1);
        assert_eq!(warn_oversized(&[bucket], 3), 0);
    }
}
