//! Error types for extension management
//!
//! Every expected failure of the install/update/remove pipeline is a distinct
//! variant so callers handle each kind explicitly instead of matching on
//! message text. Diagnostic detail (computed digests, subprocess output) is
//! carried in variant fields and logged at debug level; the Display text stays
//! suitable for end users.

use semver::Version;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using hearth-extensions' Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension management error kinds
#[derive(Error, Debug)]
pub enum Error {
    /// An extension with this name is already installed
    #[error("The extension '{name}' already exists.")]
    AlreadyExists { name: String },

    /// The named extension is not installed
    #[error("The extension '{name}' is not installed.")]
    NotInstalled { name: String },

    /// The source does not reference a supported artifact type
    ///
    /// The field holds the offending source string; it is deliberately not
    /// named `source` so thiserror does not treat it as an error cause.
    #[error("Unknown extension type for '{source_str}'. Only Python wheels are supported.")]
    UnsupportedArtifactType { source_str: String },

    /// The extension name could not be derived from the artifact filename
    #[error("Unable to determine extension name from '{source_str}'. Is the file name correct?")]
    NameResolutionFailed { source_str: String },

    /// A local artifact path does not exist
    #[error("File '{path}' not found.")]
    FileNotFound { path: PathBuf },

    /// Artifact download failed (transport error or non-2xx status)
    #[error("Download of '{url}' failed. Please ensure you have network connection. Error detail: {detail}")]
    DownloadFailed { url: String, detail: String },

    /// The artifact's SHA-256 digest does not match the expected value
    ///
    /// The digests live in the fields for debug-level diagnostics; the
    /// user-facing message deliberately omits them.
    #[error("The checksum of the extension does not match the expected value. Run with increased verbosity for more information.")]
    ChecksumMismatch { expected: String, computed: String },

    /// The artifact archive is structurally invalid
    #[error("The extension is invalid. Run with increased verbosity for more information.")]
    InvalidArtifact { detail: String },

    /// The extension's declared host version bounds exclude this host
    #[error("{}", incompatible_message(.host_version, .min_required.as_ref(), .max_required.as_ref()))]
    IncompatibleVersion {
        host_version: Version,
        min_required: Option<Version>,
        max_required: Option<Version>,
    },

    /// The package installer subprocess exited non-zero
    #[error("An error occurred. The installer failed with status code {status}. Run with increased verbosity for more information.")]
    InstallationFailed { status: i32 },

    /// The index returned no candidate for the requested name
    #[error("No matching extensions for '{name}'.")]
    NoCandidateFound { name: String },

    /// The index returned no candidate newer than the installed version
    #[error("No updates available for '{name}'.")]
    NoUpdateAvailable { name: String },

    /// An update failed and the previous version was restored
    #[error("Failed to update. Rolled '{name}' back to {rolled_back_to}.")]
    UpdateFailed {
        name: String,
        rolled_back_to: Version,
        #[source]
        cause: Box<Error>,
    },

    /// An update failed AND restoring the backup also failed
    ///
    /// The extension is now absent and the backup directory is orphaned on
    /// disk. Callers must treat the on-disk state as inconsistent.
    #[error("Failed to update '{name}' and the previous version could not be restored. The backup is preserved at '{backup}'.")]
    RestoreFailed {
        name: String,
        backup: PathBuf,
        detail: String,
    },

    /// The configured index URL is not a valid URL
    #[error("Invalid index URL '{url}': {detail}")]
    InvalidIndexUrl { url: String, detail: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Index query transport failure
    #[error("Failed to query the extension index: {0}")]
    Index(#[from] reqwest::Error),
}

fn incompatible_message(host: &Version, min: Option<&Version>, max: Option<&Version>) -> String {
    let mut msg = format!(
        "The extension is not compatible with this version of the CLI.\n\
         You have CLI core version {host} and this extension requires "
    );
    match (min, max) {
        (Some(min), Some(max)) => msg.push_str(&format!("a min of {min} and max of {max}.")),
        (Some(min), None) => msg.push_str(&format!("a min of {min}.")),
        (None, Some(max)) => msg.push_str(&format!("a max of {max}.")),
        (None, None) => msg.push_str("no particular version."),
    }
    msg
}

impl Error {
    /// Create an already-exists error
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists { name: name.into() }
    }

    /// Create a not-installed error
    pub fn not_installed(name: impl Into<String>) -> Self {
        Self::NotInstalled { name: name.into() }
    }

    /// Create an unsupported-artifact-type error
    pub fn unsupported_artifact_type(source_str: impl Into<String>) -> Self {
        Self::UnsupportedArtifactType {
            source_str: source_str.into(),
        }
    }

    /// Create a name-resolution error
    pub fn name_resolution_failed(source_str: impl Into<String>) -> Self {
        Self::NameResolutionFailed {
            source_str: source_str.into(),
        }
    }

    /// Create an invalid-artifact error
    pub fn invalid_artifact(detail: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            detail: detail.into(),
        }
    }

    /// Create a download-failed error
    pub fn download_failed(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            detail: detail.into(),
        }
    }
}
