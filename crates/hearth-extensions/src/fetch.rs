//! Artifact fetching
//!
//! Materializes a local wheel file from an [`ArtifactSource`]. Local paths
//! are referenced in place (no copy); remote URLs are streamed into a
//! temporary directory owned by the returned handle, so the download is
//! cleaned up when the handle drops, on every path.

use futures::StreamExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::source::ArtifactSource;

/// A materialized local artifact file
///
/// Owned exclusively by the workflow that created it. When the artifact was
/// downloaded, the handle owns the temporary download directory and removes
/// it on drop.
#[derive(Debug)]
pub struct ArtifactHandle {
    path: PathBuf,
    filename: String,
    // Keeps the download directory alive for the handle's lifetime.
    _download_dir: Option<TempDir>,
}

impl ArtifactHandle {
    /// Path to the artifact file on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The artifact filename (used for provenance copies)
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Fetches artifacts from local paths or remote URLs
pub struct Fetcher {
    client: reqwest::Client,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    /// Create a fetcher with default transport settings
    ///
    /// No explicit timeout is applied; callers relying on bounded latency
    /// must serialize and supervise invocations themselves.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Materialize an artifact locally
    pub async fn fetch(&self, source: &ArtifactSource) -> Result<ArtifactHandle> {
        let filename = source.filename()?;
        match source {
            ArtifactSource::LocalPath(path) => fetch_local(path, filename),
            ArtifactSource::RemoteUrl(url) => self.fetch_remote(url, filename).await,
        }
    }

    async fn fetch_remote(&self, url: &Url, filename: String) -> Result<ArtifactHandle> {
        let download_dir = TempDir::new()?;
        let target = download_dir.path().join(&filename);
        debug!("Downloading {} to {:?}", url, target);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::download_failed(url.as_str(), e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::download_failed(
                url.as_str(),
                format!("server responded with {}", response.status()),
            ));
        }

        let mut file = tokio::fs::File::create(&target).await?;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| Error::download_failed(url.as_str(), e.to_string()))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!("Downloaded {} bytes to {:?}", target.metadata()?.len(), target);

        Ok(ArtifactHandle {
            path: target,
            filename,
            _download_dir: Some(download_dir),
        })
    }
}

fn fetch_local(path: &Path, filename: String) -> Result<ArtifactHandle> {
    // Expand ~ shorthand before resolving; canonicalize also verifies existence.
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let resolved = std::fs::canonicalize(&expanded).map_err(|_| Error::FileNotFound {
        path: path.to_path_buf(),
    })?;

    if !resolved.is_file() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!("Using local artifact at {:?}", resolved);
    Ok(ArtifactHandle {
        path: resolved,
        filename,
        _download_dir: None,
    })
}
