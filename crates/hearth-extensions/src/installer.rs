//! Package installer adapter
//!
//! Extensions are installed by invoking pip as a subprocess targeting the
//! extension's destination directory. A non-zero exit status is returned as
//! data, not an error: the orchestrator decides how to compensate.

use std::collections::HashMap;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::error::Result;

/// Result of one installer invocation
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// Subprocess exit code (-1 if terminated by signal)
    pub status: i32,
    /// Combined stdout and stderr, captured for diagnostics
    pub output: String,
}

impl InstallOutcome {
    /// Whether the installer reported success
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Seam between the orchestrator and the external package installer
///
/// The production implementation shells out to pip; tests substitute a fake
/// that populates (or refuses to populate) the target directory.
pub trait Installer {
    /// Unpack `artifact` into `target`, creating the directory as needed
    fn install(
        &self,
        artifact: &Path,
        target: &Path,
    ) -> impl std::future::Future<Output = Result<InstallOutcome>> + Send;
}

/// pip-backed installer
pub struct PipInstaller {
    python: String,
    /// Environment overrides applied to the installer subprocess only.
    ///
    /// The parent process environment is never mutated; overrides are scoped
    /// to the child and vanish with it, even when the install fails.
    env_overrides: HashMap<String, String>,
}

impl PipInstaller {
    /// Create an installer using the given Python interpreter
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            env_overrides: HashMap::new(),
        }
    }

    /// Create from the environment (HEARTH_PYTHON, default `python3`)
    pub fn from_env() -> Self {
        let python = std::env::var("HEARTH_PYTHON").unwrap_or_else(|_| "python3".to_string());
        Self::new(python)
    }

    /// Add an environment override for the installer subprocess
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_overrides.insert(key.into(), value.into());
        self
    }
}

impl Installer for PipInstaller {
    async fn install(&self, artifact: &Path, target: &Path) -> Result<InstallOutcome> {
        let mut cmd = Command::new(&self.python);
        cmd.arg("-m")
            .arg("pip")
            .arg("install")
            .arg("--target")
            .arg(target)
            .arg(artifact)
            .arg("-vv")
            .arg("--disable-pip-version-check")
            .arg("--no-cache-dir")
            .envs(&self.env_overrides);

        debug!("Running installer: {:?}", cmd);
        let output = cmd.output().await?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        let status = output.status.code().unwrap_or(-1);
        debug!("Installer exited with status {}", status);

        Ok(InstallOutcome {
            status,
            output: combined,
        })
    }
}
