//! Shared helpers for extension subcommands

use anyhow::{Context, Result};
use hearth_extensions::{ExtensionManager, ExtensionStore, HttpIndex, PipInstaller};

/// Build the production manager: directory store, pip installer, HTTP index
pub(super) fn build_manager(
    index_url: Option<&str>,
) -> Result<ExtensionManager<PipInstaller, HttpIndex>> {
    let store = ExtensionStore::from_env().context("Failed to locate the extension store")?;
    let host_version = hearth_core::host_version()?;
    let index_url = HttpIndex::resolve_url(index_url)?;

    Ok(ExtensionManager::new(
        store,
        host_version,
        PipInstaller::from_env(),
        HttpIndex::new(index_url),
    ))
}
