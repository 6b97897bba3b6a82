//! # hearth-core
//!
//! Core library for the Hearth CLI providing:
//! - Home and extension directory resolution
//! - Host core version lookup

pub mod utils;
pub mod version;

pub use utils::{get_extensions_dir, get_hearth_dir, get_home_dir};
pub use version::host_version;
