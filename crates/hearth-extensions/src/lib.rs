//! Extension management for Hearth
//!
//! This crate handles:
//! - Artifact source resolution (local wheels, direct URLs, index lookup)
//! - Artifact fetching with scoped temporary downloads
//! - Integrity (SHA-256) and host-version compatibility validation
//! - Installation via the external pip installer
//! - The on-disk extension store
//! - Install/update orchestration with backup and rollback

pub mod error;
pub mod fetch;
pub mod index;
pub mod installer;
pub mod manager;
pub mod source;
pub mod store;
pub mod validate;
pub mod wheel;

pub use error::{Error, Result};
pub use fetch::{ArtifactHandle, Fetcher};
pub use index::{Candidate, CandidateIndex, HttpIndex, IndexDocument, IndexEntry};
pub use installer::{InstallOutcome, Installer, PipInstaller};
pub use manager::{AddRequest, ExtensionManager, UpdateReport};
pub use source::{resolve_source, ArtifactSource, ResolvedSource};
pub use store::{ExtensionStore, InstalledExtension, EXT_TYPE_WHL};
pub use validate::{CompatibilityMetadata, Validator};
pub use wheel::{parse_wheel_filename, WheelInfo};
