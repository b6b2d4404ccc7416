//! Short deterministic hashes of canonical sources

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Deduplication key derived from a canonical source string
///
/// Truncation to [`Fingerprint::LEN`] hex characters keeps registry cells
/// short. Two datasets sharing a fingerprint are reported, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub const LEN: usize = 12;

    /// Accept a fingerprint as persisted in a registry file
    ///
    /// Stored values are kept verbatim; `None` for blank cells.
    pub fn from_stored(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this has the shape produced by [`fingerprint`]
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == Self::LEN
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compute the fingerprint of a canonical source string
pub fn fingerprint(canonical: &str) -> Fingerprint {
    let digest = Sha256::digest(canonical.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(Fingerprint::LEN);
    Fingerprint(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = fingerprint("https://example.com/a");
        let b = fingerprint("https://example.com/a");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint("doi:10.1000/abc");
        assert_eq!(fp.as_str().len(), Fingerprint::LEN);
        assert!(fp.is_well_formed());
        assert_eq!(fp.as_str(), fp.as_str().to_lowercase());
    }

    #[test]
    fn test_fingerprint_known_value() {
        // sha256("") = e3b0c44298fc1c149afbf4c8996fb924...
        assert_eq!(fingerprint("").as_str(), "e3b0c44298fc");
    }

    #[test]
    fn test_different_inputs_differ() {
        assert_ne!(fingerprint("https://a.org/"), fingerprint("https://b.org/"));
    }

    #[test]
    fn test_from_stored() {
        assert!(Fingerprint::from_stored("  ").is_none());
        let legacy = Fingerprint::from_stored(" ABC ").unwrap();
        assert_eq!(legacy.as_str(), "ABC");
        assert!(!legacy.is_well_formed());
    }
}
