//! Extension index client
//!
//! The index is an external service mapping extension names to downloadable
//! version candidates. The document is JSON:
//!
//! ```json
//! {
//!   "extensions": {
//!     "sample-ext": [
//!       { "downloadUrl": "https://.../sample_ext-1.0.0-py3-none-any.whl",
//!         "sha256Digest": "..." }
//!     ]
//!   }
//! }
//! ```
//!
//! Candidate versions are derived from the wheel filename in the download
//! URL; the index contract only guarantees a URL and an optional checksum.

use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::wheel::parse_wheel_filename;

/// Default extension index, overridable via HEARTH_INDEX_URL or --index-url
pub const DEFAULT_INDEX_URL: &str = "https://hearth-cli.github.io/extensions/index.json";

/// One downloadable artifact offered by the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Direct wheel download URL
    pub download_url: String,
    /// Optional expected SHA-256 hex digest
    pub sha256: Option<String>,
    /// Version derived from the wheel filename
    pub version: Version,
}

/// Raw index entry as published by the index service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub download_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_digest: Option<String>,
}

/// Full index document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(default)]
    pub extensions: BTreeMap<String, Vec<IndexEntry>>,
}

/// Query interface to the extension index
///
/// The manager is generic over this so tests can run against a canned index
/// without a network.
pub trait CandidateIndex {
    /// Candidates for `name`, newest first, optionally restricted to versions
    /// strictly newer than `newer_than`. An empty vector signals no
    /// candidates.
    fn query(
        &self,
        name: &str,
        newer_than: Option<&Version>,
    ) -> impl std::future::Future<Output = Result<Vec<Candidate>>> + Send;

    /// The raw index document, for passthrough listing
    fn fetch_all(&self) -> impl std::future::Future<Output = Result<IndexDocument>> + Send;
}

/// HTTP-backed index client
pub struct HttpIndex {
    client: reqwest::Client,
    index_url: Url,
}

impl HttpIndex {
    /// Create a client against an explicit index URL
    pub fn new(index_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            index_url,
        }
    }

    /// Resolve the effective index URL
    ///
    /// Priority: explicit override, HEARTH_INDEX_URL, built-in default.
    pub fn resolve_url(override_url: Option<&str>) -> Result<Url> {
        let raw = override_url
            .map(str::to_string)
            .or_else(|| std::env::var("HEARTH_INDEX_URL").ok())
            .unwrap_or_else(|| DEFAULT_INDEX_URL.to_string());

        Url::parse(&raw).map_err(|e| Error::InvalidIndexUrl {
            url: raw,
            detail: e.to_string(),
        })
    }
}

impl CandidateIndex for HttpIndex {
    async fn query(&self, name: &str, newer_than: Option<&Version>) -> Result<Vec<Candidate>> {
        let document = self.fetch_all().await?;
        Ok(select_candidates(&document, name, newer_than))
    }

    async fn fetch_all(&self) -> Result<IndexDocument> {
        debug!("Fetching extension index from {}", self.index_url);
        let response = self
            .client
            .get(self.index_url.clone())
            .send()
            .await?
            .error_for_status()?;
        let document = response.json::<IndexDocument>().await?;
        debug!("Index lists {} extensions", document.extensions.len());
        Ok(document)
    }
}

/// Pick candidates for `name` out of an index document, newest first
///
/// Entries whose download URL does not carry a parseable wheel filename are
/// skipped with a warning rather than failing the whole query.
pub fn select_candidates(
    document: &IndexDocument,
    name: &str,
    newer_than: Option<&Version>,
) -> Vec<Candidate> {
    let Some(entries) = document.extensions.get(name) else {
        return Vec::new();
    };

    let mut candidates: Vec<Candidate> = entries
        .iter()
        .filter_map(|entry| {
            let filename = entry.download_url.rsplit('/').next()?;
            let info = parse_wheel_filename(filename)?;
            let version = match Version::parse(&info.version) {
                Ok(v) => v,
                Err(e) => {
                    warn!(
                        "Skipping index entry for '{}' with unparseable version '{}': {}",
                        name, info.version, e
                    );
                    return None;
                }
            };
            Some(Candidate {
                download_url: entry.download_url.clone(),
                sha256: entry.sha256_digest.clone(),
                version,
            })
        })
        .filter(|candidate| match newer_than {
            Some(current) => candidate.version > *current,
            None => true,
        })
        .collect();

    candidates.sort_by(|a, b| b.version.cmp(&a.version));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> IndexDocument {
        serde_json::from_str(json).unwrap()
    }

    const SAMPLE_INDEX: &str = r#"{
        "extensions": {
            "sample-ext": [
                { "downloadUrl": "https://x/sample_ext-1.0.0-py3-none-any.whl",
                  "sha256Digest": "aaaa" },
                { "downloadUrl": "https://x/sample_ext-2.0.0-py3-none-any.whl" },
                { "downloadUrl": "https://x/sample_ext-1.5.0-py3-none-any.whl",
                  "sha256Digest": "bbbb" }
            ]
        }
    }"#;

    #[test]
    fn test_candidates_sorted_newest_first() {
        let doc = document(SAMPLE_INDEX);
        let candidates = select_candidates(&doc, "sample-ext", None);
        let versions: Vec<String> = candidates.iter().map(|c| c.version.to_string()).collect();
        assert_eq!(versions, vec!["2.0.0", "1.5.0", "1.0.0"]);
    }

    #[test]
    fn test_newer_than_filters_strictly() {
        let doc = document(SAMPLE_INDEX);
        let current = Version::new(1, 5, 0);
        let candidates = select_candidates(&doc, "sample-ext", Some(&current));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].version, Version::new(2, 0, 0));
    }

    #[test]
    fn test_newer_than_latest_yields_empty() {
        let doc = document(SAMPLE_INDEX);
        let current = Version::new(2, 0, 0);
        assert!(select_candidates(&doc, "sample-ext", Some(&current)).is_empty());
    }

    #[test]
    fn test_unknown_name_yields_empty() {
        let doc = document(SAMPLE_INDEX);
        assert!(select_candidates(&doc, "missing", None).is_empty());
    }

    #[test]
    fn test_checksum_carried_through() {
        let doc = document(SAMPLE_INDEX);
        let candidates = select_candidates(&doc, "sample-ext", None);
        assert_eq!(candidates[0].sha256, None);
        assert_eq!(candidates[2].sha256.as_deref(), Some("aaaa"));
    }

    #[test]
    fn test_unparseable_entry_skipped() {
        let doc = document(
            r#"{ "extensions": { "odd": [
                { "downloadUrl": "https://x/notawheel.whl" },
                { "downloadUrl": "https://x/odd-1.0.0-py3-none-any.whl" }
            ] } }"#,
        );
        let candidates = select_candidates(&doc, "odd", None);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].version, Version::new(1, 0, 0));
    }

    #[test]
    fn test_resolve_url_default() {
        if std::env::var("HEARTH_INDEX_URL").is_err() {
            let url = HttpIndex::resolve_url(None).unwrap();
            assert_eq!(url.as_str(), DEFAULT_INDEX_URL);
        }
    }

    #[test]
    fn test_resolve_url_override_wins() {
        let url = HttpIndex::resolve_url(Some("https://example.org/index.json")).unwrap();
        assert_eq!(url.as_str(), "https://example.org/index.json");
    }
}
