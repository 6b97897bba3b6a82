//! Host core version lookup

use anyhow::{Context, Result};
use semver::Version;

/// The host core version extensions are validated against
///
/// Extensions declare min/max host version bounds in their metadata; this is
/// the version those bounds are compared to.
pub fn host_version() -> Result<Version> {
    Version::parse(env!("CARGO_PKG_VERSION")).context("Failed to parse host core version")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_version_parses() {
        let version = host_version().unwrap();
        assert!(version.major >= 1);
    }
}
