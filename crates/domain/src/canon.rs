//! Source canonicalization
//!
//! Turns DOI strings and URLs into one normalized form per external resource.
//! Malformed input never errors; it yields `None` and the caller decides what
//! an unidentifiable source means for its row.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use url::Url;
use url::form_urlencoded;

use crate::model::CanonicalSource;

/// Query keys that vary between otherwise identical links
const TRACKING_KEYS: [&str; 5] = ["gclid", "fbclid", "yclid", "ref", "ref_"];

/// Query key prefixes that vary between otherwise identical links
const TRACKING_PREFIXES: [&str; 2] = ["utm_", "mc_"];

/// Redundant once a URL is rebuilt under `https`
const HTTPS_PORT: u16 = 443;

/// `doi:` or a doi.org resolver front-end, with or without a scheme
static DOI_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:doi:|(?:https?://)?(?:www\.|dx\.)?doi\.org/+)").expect("valid DOI prefix")
});

/// `10.<registrant>[.<subdivision>]*/<suffix>`
static DOI_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^10\.\d{4,9}(?:\.\d+)*/\S+$").expect("valid DOI shape"));

static REPEATED_SLASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/{2,}").expect("valid slash pattern"));

/// Normalize a DOI, returning it lower-cased and without resolver prefix
///
/// Only DOI-shaped remainders are accepted, so plain URLs and free text fall
/// through to [`canonicalize_url`].
pub fn canonicalize_doi(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let stripped = match DOI_PREFIX.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };

    let doi = stripped.trim().to_lowercase();
    if doi.is_empty() || !DOI_SHAPE.is_match(&doi) {
        return None;
    }

    Some(doi)
}

/// Normalize a URL to `https://host[:port]/path[?sorted-query]`
pub fn canonicalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let input: Cow<'_, str> = if has_http_scheme(trimmed) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("https://{}", trimmed))
    };

    let parsed = Url::parse(&input).ok()?;

    let mut host = parsed.host_str()?.to_lowercase();
    while let Some(rest) = host.strip_prefix("www.") {
        host = rest.to_string();
    }
    if host.is_empty() {
        return None;
    }

    let mut out = format!("https://{}", host);

    // `port()` is already `None` for the input scheme's own default
    if let Some(port) = parsed.port().filter(|p| *p != HTTPS_PORT) {
        out.push(':');
        out.push_str(&port.to_string());
    }

    let path = REPEATED_SLASHES.replace_all(parsed.path(), "/");
    match path.strip_suffix('/') {
        Some(stem) if !stem.is_empty() => out.push_str(stem),
        _ => out.push_str(&path),
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    params.sort();

    if !params.is_empty() {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&params)
            .finish();
        out.push('?');
        out.push_str(&query);
    }

    Some(out)
}

/// Resolve any raw source to its canonical form, DOI first
///
/// A DOI resolver link is keyed by its DOI rather than the resolver host, so
/// the same dataset cited through different front-ends shares one identity.
pub fn canonical_source(raw: &str) -> Option<CanonicalSource> {
    if let Some(doi) = canonicalize_doi(raw) {
        return Some(CanonicalSource::doi(&doi));
    }
    canonicalize_url(raw).map(CanonicalSource::url)
}

/// Cheap gate for upstream callers deciding whether a cell is worth resolving
pub fn looks_like_doi_or_url(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }

    let lower = s.to_lowercase();
    s.starts_with("http://")
        || s.starts_with("https://")
        || lower.starts_with("doi:")
        || lower.starts_with("10.")
        || (s.contains('.') && s.contains('/'))
}

fn has_http_scheme(s: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        s.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_lowercase();
    TRACKING_KEYS.contains(&key.as_str())
        || TRACKING_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix))
}
