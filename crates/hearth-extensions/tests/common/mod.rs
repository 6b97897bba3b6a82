//! Shared fixtures for extension lifecycle tests

#![allow(dead_code)]

use semver::Version;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use hearth_extensions::index::select_candidates;
use hearth_extensions::{
    Candidate, CandidateIndex, ExtensionManager, ExtensionStore, IndexDocument, IndexEntry,
    InstallOutcome, Installer, Result,
};

/// Host version the test manager validates against
pub fn host_version() -> Version {
    Version::new(1, 4, 0)
}

/// Build a minimal wheel file at `dir/filename`
///
/// The wheel contains one module file with `payload` as its content and,
/// optionally, a hearthext_metadata.json document.
pub fn build_wheel(dir: &Path, filename: &str, metadata: Option<&str>, payload: &str) -> PathBuf {
    let path = dir.join(filename);
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    writer.start_file("pkg/__init__.py", options).unwrap();
    writer.write_all(payload.as_bytes()).unwrap();

    if let Some(metadata) = metadata {
        writer
            .start_file("pkg/hearthext_metadata.json", options)
            .unwrap();
        writer.write_all(metadata.as_bytes()).unwrap();
    }

    writer.finish().unwrap();
    path
}

/// SHA-256 hex digest of a file
pub fn sha256_hex(path: &Path) -> String {
    format!("{:x}", Sha256::digest(std::fs::read(path).unwrap()))
}

/// Lay out an already-installed extension directly in the store root
///
/// Mirrors what a successful install leaves behind: unpacked contents plus
/// the provenance wheel.
pub fn preinstall(store_root: &Path, name: &str, wheel_filename: &str, payload: &str) {
    let dir = store_root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("module.py"), payload).unwrap();
    std::fs::write(dir.join(wheel_filename), format!("wheel:{payload}")).unwrap();
}

/// Snapshot a directory tree as relative-path -> content pairs
pub fn snapshot_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, std::fs::read(e.path()).unwrap())
        })
        .collect()
}

/// Installer that unpacks the wheel like `pip install --target`, or
/// misbehaves in one of the configured ways
pub enum FakeInstaller {
    /// Unpacks the wheel into the target directory
    Working,
    /// Fails with the given status after littering the target directory
    Failing(i32),
    /// Unpacks, then deletes the artifact file out from under the caller
    ConsumingArtifact,
    /// Writes a plain file at the target path (not a directory) and fails,
    /// which defeats both the partial-install cleanup and any later
    /// directory copy onto that path
    SquattingFile,
}

impl FakeInstaller {
    pub fn working() -> Self {
        Self::Working
    }

    pub fn failing(status: i32) -> Self {
        Self::Failing(status)
    }

    pub fn consuming_artifact() -> Self {
        Self::ConsumingArtifact
    }

    pub fn squatting_file() -> Self {
        Self::SquattingFile
    }
}

impl Installer for FakeInstaller {
    async fn install(&self, artifact: &Path, target: &Path) -> Result<InstallOutcome> {
        match self {
            FakeInstaller::Failing(status) => {
                // Simulate a partial install the orchestrator must clean up
                std::fs::create_dir_all(target)?;
                std::fs::write(target.join("partial.bin"), b"debris")?;
                Ok(InstallOutcome {
                    status: *status,
                    output: "fake installer: simulated failure".to_string(),
                })
            }
            FakeInstaller::SquattingFile => {
                std::fs::write(target, b"squatter")?;
                Ok(InstallOutcome {
                    status: 1,
                    output: "fake installer: wrote a file at the target path".to_string(),
                })
            }
            FakeInstaller::Working | FakeInstaller::ConsumingArtifact => {
                std::fs::create_dir_all(target)?;
                let file = std::fs::File::open(artifact)?;
                let mut archive = zip::ZipArchive::new(file).expect("test wheels are valid zips");
                archive.extract(target).expect("test wheels extract cleanly");
                if matches!(self, FakeInstaller::ConsumingArtifact) {
                    std::fs::remove_file(artifact)?;
                }
                Ok(InstallOutcome {
                    status: 0,
                    output: "fake installer: ok".to_string(),
                })
            }
        }
    }
}

/// Canned index over local wheel paths
pub struct FakeIndex {
    pub document: IndexDocument,
}

impl FakeIndex {
    pub fn empty() -> Self {
        Self {
            document: IndexDocument {
                extensions: BTreeMap::new(),
            },
        }
    }

    /// Offer a local wheel file as a download candidate for `name`
    pub fn offering(name: &str, wheel_paths: &[(&Path, Option<String>)]) -> Self {
        let entries = wheel_paths
            .iter()
            .map(|(path, sha)| IndexEntry {
                download_url: path.to_string_lossy().into_owned(),
                sha256_digest: sha.clone(),
            })
            .collect();
        let mut extensions = BTreeMap::new();
        extensions.insert(name.to_string(), entries);
        Self {
            document: IndexDocument { extensions },
        }
    }
}

impl CandidateIndex for FakeIndex {
    async fn query(&self, name: &str, newer_than: Option<&Version>) -> Result<Vec<Candidate>> {
        Ok(select_candidates(&self.document, name, newer_than))
    }

    async fn fetch_all(&self) -> Result<IndexDocument> {
        Ok(self.document.clone())
    }
}

/// Manager wired to a store root, fake index, and fake installer
pub fn manager(
    store_root: &Path,
    installer: FakeInstaller,
    index: FakeIndex,
) -> ExtensionManager<FakeInstaller, FakeIndex> {
    ExtensionManager::new(
        ExtensionStore::new(store_root),
        host_version(),
        installer,
        index,
    )
}
