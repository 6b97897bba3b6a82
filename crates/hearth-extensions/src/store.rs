//! On-disk extension store
//!
//! The store is a flat namespace of directories under one root, one directory
//! per installed extension name. It is the sole source of truth for what is
//! installed; nothing here caches existence across calls.
//!
//! Each install directory contains the unpacked wheel contents plus the
//! original wheel file, saved as installation provenance. The provenance
//! wheel is what `get` parses the name and version back out of.

use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::validate::find_metadata_file;
use crate::wheel::parse_wheel_filename;

/// Extension type marker for wheel-based extensions
pub const EXT_TYPE_WHL: &str = "whl";

/// A record of one installed extension
#[derive(Debug, Clone, Serialize)]
pub struct InstalledExtension {
    pub name: String,
    pub version: String,
    pub ext_type: String,
    /// The metadata map shipped in the wheel, empty if none was present
    pub metadata: serde_json::Map<String, Value>,
    /// Installation directory
    pub path: PathBuf,
}

/// Directory-backed extension store
#[derive(Debug, Clone)]
pub struct ExtensionStore {
    root: PathBuf,
}

impl ExtensionStore {
    /// Create a store rooted at an explicit directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a store at the configured extensions directory
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(hearth_core::get_extensions_dir()?))
    }

    /// The store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Installation directory for a given extension name
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Whether an extension with this name is installed
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_dir()
    }

    /// Look up an installed extension
    pub fn get(&self, name: &str) -> Result<InstalledExtension> {
        let path = self.path_for(name);
        if !path.is_dir() {
            return Err(Error::not_installed(name));
        }
        self.read_record(name, &path)
    }

    /// Enumerate all installed extensions, sorted by name
    ///
    /// Directories that cannot be read back as extensions are skipped with a
    /// warning rather than failing the whole listing.
    pub fn list(&self) -> Result<Vec<InstalledExtension>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut extensions = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            match self.read_record(&name, &entry.path()) {
                Ok(ext) => extensions.push(ext),
                Err(e) => warn!("Skipping unreadable extension directory '{}': {}", name, e),
            }
        }

        extensions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(extensions)
    }

    fn read_record(&self, name: &str, path: &Path) -> Result<InstalledExtension> {
        let provenance = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .find(|filename| filename.ends_with(".whl"))
            .ok_or_else(|| {
                Error::invalid_artifact(format!(
                    "no provenance wheel found in '{}'",
                    path.display()
                ))
            })?;

        let info = parse_wheel_filename(&provenance)
            .ok_or_else(|| Error::name_resolution_failed(provenance.clone()))?;

        let metadata = match find_metadata_file(path) {
            Some(metadata_path) => {
                let content = std::fs::read_to_string(&metadata_path)?;
                match serde_json::from_str::<Value>(&content) {
                    Ok(Value::Object(map)) => map,
                    _ => {
                        warn!("Ignoring malformed metadata in {:?}", metadata_path);
                        Default::default()
                    }
                }
            }
            None => Default::default(),
        };

        debug!("Read extension '{}' version {} from {:?}", name, info.version, path);

        Ok(InstalledExtension {
            name: name.to_string(),
            version: info.version,
            ext_type: EXT_TYPE_WHL.to_string(),
            metadata,
            path: path.to_path_buf(),
        })
    }
}

/// Recursively copy a directory tree
///
/// Used for update backups and their restoration. The destination must not
/// already exist as a file; intermediate directories are created as needed.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| {
            Error::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")
            }))
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields paths under its root");
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
