//! Artifact integrity and compatibility validation
//!
//! Runs entirely before any mutation of the extension store: a SHA-256 check
//! against the expected digest (when one was supplied), then extraction of
//! the wheel into a scoped temporary directory to read the extension's
//! self-declared host version bounds. The temporary directory is removed on
//! every exit path.

use semver::Version;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::Path;
use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::fetch::ArtifactHandle;
use crate::wheel::METADATA_FILE_NAME;

/// Metadata key declaring the minimum supported host core version
pub const MIN_VERSION_KEY: &str = "hearth.minCoreVersion";
/// Metadata key declaring the maximum supported host core version
pub const MAX_VERSION_KEY: &str = "hearth.maxCoreVersion";

/// An extension's declared host version bounds plus its raw metadata map
#[derive(Debug, Clone, Default)]
pub struct CompatibilityMetadata {
    pub min_host_version: Option<Version>,
    pub max_host_version: Option<Version>,
    /// The full metadata document as shipped in the wheel
    pub raw: serde_json::Map<String, Value>,
}

impl CompatibilityMetadata {
    /// Parse from the wheel's metadata document
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(raw) = value else {
            return Err(Error::invalid_artifact(
                "extension metadata is not a JSON object",
            ));
        };

        let min_host_version = parse_bound(&raw, MIN_VERSION_KEY)?;
        let max_host_version = parse_bound(&raw, MAX_VERSION_KEY)?;

        Ok(Self {
            min_host_version,
            max_host_version,
            raw,
        })
    }
}

fn parse_bound(
    raw: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<Version>> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Version::parse(s)
            .map(Some)
            .map_err(|e| Error::invalid_artifact(format!("bad version in '{key}': {e}"))),
        Some(other) => Err(Error::invalid_artifact(format!(
            "'{key}' must be a version string, got {other}"
        ))),
    }
}

/// Validates artifacts against an expected checksum and the host version
pub struct Validator {
    host_version: Version,
}

impl Validator {
    /// Create a validator for the given host core version
    pub fn new(host_version: Version) -> Self {
        Self { host_version }
    }

    /// Verify integrity, then extract and check compatibility metadata
    ///
    /// Every failure leaves the filesystem untouched apart from the scoped
    /// extraction directory, which is always removed.
    pub async fn validate(
        &self,
        artifact: &ArtifactHandle,
        expected_sha256: Option<&str>,
    ) -> Result<CompatibilityMetadata> {
        if let Some(expected) = expected_sha256 {
            verify_sha256(artifact.path(), expected).await?;
        }

        let metadata = read_wheel_metadata(artifact.path())?;
        self.check_compatibility(&metadata)?;
        debug!("Validation successful on {:?}", artifact.path());
        Ok(metadata)
    }

    /// Compare the host version against the declared min/max bounds
    pub fn check_compatibility(&self, metadata: &CompatibilityMetadata) -> Result<()> {
        let below_min = metadata
            .min_host_version
            .as_ref()
            .is_some_and(|min| self.host_version < *min);
        let above_max = metadata
            .max_host_version
            .as_ref()
            .is_some_and(|max| self.host_version > *max);

        debug!(
            "Compatibility result: host={} min={:?} max={:?} below_min={} above_max={}",
            self.host_version, metadata.min_host_version, metadata.max_host_version,
            below_min, above_max
        );

        if below_min || above_max {
            return Err(Error::IncompatibleVersion {
                host_version: self.host_version.clone(),
                min_required: below_min.then(|| metadata.min_host_version.clone()).flatten(),
                max_required: above_max.then(|| metadata.max_host_version.clone()).flatten(),
            });
        }
        Ok(())
    }
}

/// Compute SHA-256 over the full file and compare against the expected digest
///
/// Comparison is case-insensitive on the hex encoding. The digests go into
/// the error fields and the debug log only; the user-facing message stays
/// generic.
pub async fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let content = tokio::fs::read(path).await?;
    let computed = format!("{:x}", Sha256::digest(&content));

    if computed.eq_ignore_ascii_case(expected) {
        debug!("Checksum of {:?} is OK", path);
        Ok(())
    } else {
        debug!(
            "Invalid checksum for {:?}. Expected '{}', computed '{}'.",
            path, expected, computed
        );
        Err(Error::ChecksumMismatch {
            expected: expected.to_string(),
            computed,
        })
    }
}

/// Extract the wheel into a scoped temp directory and read its metadata file
///
/// A wheel without a metadata file is treated as unbounded (no declared
/// compatibility constraints). Structural corruption (unreadable zip,
/// malformed metadata) fails with `InvalidArtifact`.
fn read_wheel_metadata(path: &Path) -> Result<CompatibilityMetadata> {
    let extract_dir = TempDir::new()?;

    let file = std::fs::File::open(path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| Error::invalid_artifact(format!("unreadable wheel archive: {e}")))?;
    archive
        .extract(extract_dir.path())
        .map_err(|e| Error::invalid_artifact(format!("failed to extract wheel: {e}")))?;

    let metadata = find_metadata_file(extract_dir.path())
        .map(|p| -> Result<CompatibilityMetadata> {
            let content = std::fs::read_to_string(&p)?;
            let value: Value = serde_json::from_str(&content)
                .map_err(|e| Error::invalid_artifact(format!("malformed {METADATA_FILE_NAME}: {e}")))?;
            CompatibilityMetadata::from_value(value)
        })
        .transpose()?
        .unwrap_or_default();

    // extract_dir dropped here, success or failure
    Ok(metadata)
}

/// Locate the metadata file anywhere in the extracted wheel tree
pub(crate) fn find_metadata_file(root: &Path) -> Option<std::path::PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == METADATA_FILE_NAME)
        .map(|entry| entry.into_path())
}
