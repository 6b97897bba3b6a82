//! Artifact source resolution
//!
//! Classifies a user-supplied source string as a local file or remote URL and
//! derives the canonical extension name from the artifact filename. This runs
//! before any filesystem mutation, so every failure here leaves the system
//! untouched.

use std::fmt;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::wheel::{parse_wheel_filename, WheelInfo};

/// Where an extension artifact comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Path on the local filesystem (may contain `~`)
    LocalPath(PathBuf),
    /// Direct http/https download URL
    RemoteUrl(Url),
}

impl ArtifactSource {
    /// Classify a source string
    ///
    /// The source must end in `.whl`; anything else fails with
    /// `UnsupportedArtifactType`. A parseable URL with an http or https
    /// scheme is remote, everything else is treated as a local path.
    pub fn parse(source: &str) -> Result<Self> {
        if !source.ends_with(".whl") {
            return Err(Error::unsupported_artifact_type(source));
        }

        if let Ok(url) = Url::parse(source) {
            if url.scheme() == "http" || url.scheme() == "https" {
                debug!("Extension source is a URL: {}", url);
                return Ok(ArtifactSource::RemoteUrl(url));
            }
        }

        debug!("Extension source is a local path: {}", source);
        Ok(ArtifactSource::LocalPath(PathBuf::from(source)))
    }

    /// The artifact filename (final path segment of the source)
    pub fn filename(&self) -> Result<String> {
        let filename = match self {
            ArtifactSource::LocalPath(path) => path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned()),
            ArtifactSource::RemoteUrl(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .map(str::to_string),
        };
        filename.ok_or_else(|| Error::name_resolution_failed(self.to_string()))
    }
}

impl fmt::Display for ArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactSource::LocalPath(path) => write!(f, "{}", path.display()),
            ArtifactSource::RemoteUrl(url) => write!(f, "{}", url),
        }
    }
}

/// A source resolved down to a concrete artifact location and identity
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    /// Classified artifact location
    pub source: ArtifactSource,
    /// Canonical extension name derived from the filename
    pub name: String,
    /// Artifact filename (kept for provenance and handles)
    pub filename: String,
    /// Version encoded in the filename
    pub version: String,
}

/// Resolve a source string to its artifact location and extension identity
pub fn resolve_source(source_str: &str) -> Result<ResolvedSource> {
    let source = ArtifactSource::parse(source_str)?;
    let filename = source.filename()?;

    let WheelInfo { name, version } = parse_wheel_filename(&filename)
        .ok_or_else(|| Error::name_resolution_failed(source_str))?;

    debug!(
        "Resolved source '{}' to extension '{}' version {}",
        source_str, name, version
    );

    Ok(ResolvedSource {
        source,
        name,
        filename,
        version,
    })
}
