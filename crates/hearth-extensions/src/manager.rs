//! Install/update orchestration
//!
//! Sequences resolver, fetcher, validator, installer, and store into the two
//! stateful workflows: fresh install and in-place update with backup and
//! rollback. Invariants enforced here:
//!
//! - no duplicate names: at most one installed version per name
//! - no partial leftovers: any failed install leaves the store without a
//!   trace of the attempted name
//! - after `update` returns, either the new version is installed or the old
//!   one is restored, except in the explicit restore-failure case which is
//!   surfaced as its own error kind
//!
//! Nothing here serializes concurrent invocations; two simultaneous
//! workflows targeting the same name can race. Callers own that invariant.

use semver::Version;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::index::{CandidateIndex, IndexDocument};
use crate::installer::Installer;
use crate::source::resolve_source;
use crate::store::{copy_tree, ExtensionStore, InstalledExtension};
use crate::validate::Validator;

/// What to install
#[derive(Debug, Clone)]
pub enum AddRequest {
    /// Explicit artifact source (local path or direct URL), with an optional
    /// expected checksum supplied by the caller
    FromSource {
        source: String,
        sha256: Option<String>,
    },
    /// Extension name to be resolved through the index
    ByName { name: String },
}

/// Outcome of a successful update
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub name: String,
    pub from_version: Version,
    pub to_version: String,
}

/// Orchestrates the extension lifecycle workflows
pub struct ExtensionManager<I, X> {
    store: ExtensionStore,
    fetcher: Fetcher,
    validator: Validator,
    installer: I,
    index: X,
}

impl<I: Installer, X: CandidateIndex> ExtensionManager<I, X> {
    /// Create a manager over the given store and collaborators
    pub fn new(store: ExtensionStore, host_version: Version, installer: I, index: X) -> Self {
        Self {
            store,
            fetcher: Fetcher::new(),
            validator: Validator::new(host_version),
            installer,
            index,
        }
    }

    /// The underlying store (source of truth for what is installed)
    pub fn store(&self) -> &ExtensionStore {
        &self.store
    }

    /// Install a new extension
    pub async fn add(&self, request: AddRequest) -> Result<InstalledExtension> {
        match request {
            AddRequest::ByName { name } => {
                if self.store.exists(&name) {
                    return Err(Error::already_exists(&name));
                }
                let candidates = self.index.query(&name, None).await?;
                let best = candidates
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::NoCandidateFound { name: name.clone() })?;
                debug!(
                    "Resolved '{}' to {} (version {})",
                    name, best.download_url, best.version
                );
                self.install_artifact(&best.download_url, best.sha256.as_deref())
                    .await
            }
            AddRequest::FromSource { source, sha256 } => {
                self.install_artifact(&source, sha256.as_deref()).await
            }
        }
    }

    /// Remove an installed extension
    pub async fn remove(&self, name: &str) -> Result<InstalledExtension> {
        let extension = self.store.get(name)?;
        tokio::fs::remove_dir_all(self.store.path_for(name)).await?;
        info!("Removed extension '{}'", name);
        Ok(extension)
    }

    /// List installed extensions
    pub fn list(&self) -> Result<Vec<InstalledExtension>> {
        self.store.list()
    }

    /// Show one installed extension, metadata included
    pub fn show(&self, name: &str) -> Result<InstalledExtension> {
        self.store.get(name)
    }

    /// Update an installed extension to the newest index candidate
    ///
    /// Backs up the current installation, removes it, and runs the fresh
    /// install sequence with the resolved update source. On failure the
    /// backup is restored; if restoring also fails, the backup is preserved
    /// on disk and the distinct `RestoreFailed` kind is returned.
    pub async fn update(&self, name: &str) -> Result<UpdateReport> {
        let current = self.store.get(name)?;
        let current_version = Version::parse(&current.version).map_err(|e| {
            Error::invalid_artifact(format!(
                "installed version '{}' of '{}' is not a valid version: {}",
                current.version, name, e
            ))
        })?;

        let candidates = self.index.query(name, Some(&current_version)).await?;
        let best = candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::NoUpdateAvailable {
                name: name.to_string(),
            })?;

        // Snapshot the current installation before the point of no return.
        let backup_root = tempfile::TempDir::new()?;
        let backup_dir = backup_root.path().join(name);
        let extension_path = self.store.path_for(name);
        debug!(
            "Backing up current extension: {:?} to {:?}",
            extension_path, backup_dir
        );
        copy_tree(&extension_path, &backup_dir)?;

        // The name is absent from the store from here until reinstall finishes.
        tokio::fs::remove_dir_all(&extension_path).await?;

        match self
            .install_artifact(&best.download_url, best.sha256.as_deref())
            .await
        {
            Ok(installed) => {
                debug!("Deleting backup of old extension at {:?}", backup_dir);
                drop(backup_root);
                Ok(UpdateReport {
                    name: name.to_string(),
                    from_version: current_version,
                    to_version: installed.version,
                })
            }
            Err(cause) => {
                error!("An error occurred whilst updating: {}", cause);
                debug!("Restoring {:?} to {:?}", backup_dir, extension_path);
                if let Err(restore_err) = copy_tree(&backup_dir, &extension_path) {
                    // Second-order failure: the extension is now absent and
                    // the backup is the only remaining copy. Keep it.
                    let kept = backup_root.keep();
                    error!(
                        "Restore failed; backup preserved at {:?}: {}",
                        kept, restore_err
                    );
                    return Err(Error::RestoreFailed {
                        name: name.to_string(),
                        backup: kept.join(name),
                        detail: restore_err.to_string(),
                    });
                }
                Err(Error::UpdateFailed {
                    name: name.to_string(),
                    rolled_back_to: current_version,
                    cause: Box::new(cause),
                })
            }
        }
    }

    /// Passthrough listing of everything the index offers
    pub async fn list_available(&self) -> Result<IndexDocument> {
        self.index.fetch_all().await
    }

    /// The fresh-install sequence shared by `add` and `update`
    ///
    /// Order matters: everything that can fail without cleanup (resolution,
    /// fetch, validation) runs before the destination directory is touched.
    async fn install_artifact(
        &self,
        source_str: &str,
        sha256: Option<&str>,
    ) -> Result<InstalledExtension> {
        let resolved = resolve_source(source_str)?;

        if self.store.exists(&resolved.name) {
            return Err(Error::already_exists(&resolved.name));
        }

        let artifact = self.fetcher.fetch(&resolved.source).await?;

        debug!("Validating the extension {:?}", artifact.path());
        self.validator.validate(&artifact, sha256).await?;

        let target = self.store.path_for(&resolved.name);
        let outcome = self.installer.install(artifact.path(), &target).await?;
        debug!("Installer output:\n{}", outcome.output);

        if !outcome.success() {
            debug!(
                "Installer failed, deleting anything installed at {:?}",
                target
            );
            // Best-effort: the installer may have failed before creating it.
            let _ = tokio::fs::remove_dir_all(&target).await;
            return Err(Error::InstallationFailed {
                status: outcome.status,
            });
        }

        // Save the wheel we installed from inside the extension dir as
        // installation provenance; `store.get` parses identity back out of it.
        // A failure here must also take the freshly installed tree with it,
        // so a failed add never leaves the name registered.
        let provenance = target.join(artifact.filename());
        let registered = match tokio::fs::copy(artifact.path(), &provenance).await {
            Ok(_) => {
                debug!("Saved the wheel to {:?}", provenance);
                self.store.get(&resolved.name)
            }
            Err(e) => Err(e.into()),
        };

        match registered {
            Ok(installed) => {
                info!(
                    "Installed extension '{}' version {}",
                    installed.name, installed.version
                );
                Ok(installed)
            }
            Err(e) => {
                let _ = tokio::fs::remove_dir_all(&target).await;
                Err(e)
            }
        }
    }
}
