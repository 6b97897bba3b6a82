//! Version command

use anyhow::Result;
use serde::Serialize;

use crate::cli::VersionArgs;

/// Version information
#[derive(Debug, Clone, Serialize)]
struct VersionInfo {
    version: String,
    commit: Option<String>,
}

impl VersionInfo {
    fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("GIT_SHA").map(String::from),
        }
    }
}

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        match &info.commit {
            Some(commit) => println!("hearth {} ({})", info.version, commit),
            None => println!("hearth {}", info.version),
        }
    }
    Ok(())
}
