//! Shared utility functions for Hearth crates

use anyhow::anyhow;
use std::path::PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() because:
/// - In containers with volume mounts, HOME may point at an alternate mount
/// - dirs::home_dir() reads from /etc/passwd which doesn't respect env overrides
/// - Shell scripts use $HOME, so we need consistency with bootstrap scripts
pub fn get_home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    // Fallback to dirs::home_dir() for non-container environments
    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Get the hearth configuration directory (~/.hearth)
pub fn get_hearth_dir() -> anyhow::Result<PathBuf> {
    Ok(get_home_dir()?.join(".hearth"))
}

/// Get the extension store root directory
///
/// - HEARTH_EXT_HOME: explicit override (tests, alternate installs)
/// - Fallback: ~/.hearth/extensions
pub fn get_extensions_dir() -> anyhow::Result<PathBuf> {
    if let Ok(ext_home) = std::env::var("HEARTH_EXT_HOME") {
        return Ok(PathBuf::from(ext_home));
    }

    Ok(get_hearth_dir()?.join("extensions"))
}
