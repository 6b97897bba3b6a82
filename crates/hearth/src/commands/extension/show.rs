//! Extension show command

use anyhow::{Context, Result};

use super::common::build_manager;
use crate::cli::ExtensionShowArgs;
use crate::output;

/// Show one installed extension, metadata included
pub(super) async fn run(args: ExtensionShowArgs) -> Result<()> {
    let manager = build_manager(None)?;
    let extension = manager.show(&args.name)?;

    if args.json {
        let json = serde_json::to_string_pretty(&extension)
            .context("Failed to serialize extension")?;
        println!("{}", json);
    } else {
        output::kv("name", &extension.name);
        output::kv("version", &extension.version);
        output::kv("type", &extension.ext_type);
        output::kv("path", &extension.path.display().to_string());
        if !extension.metadata.is_empty() {
            let metadata = serde_json::to_string_pretty(&extension.metadata)
                .context("Failed to serialize metadata")?;
            output::kv("metadata", &metadata);
        }
    }

    Ok(())
}
