//! Extension remove command

use anyhow::Result;
use dialoguer::Confirm;

use super::common::build_manager;
use crate::cli::ExtensionRemoveArgs;
use crate::output;

/// Remove an installed extension
///
/// Supports:
/// - Remove with confirmation: `hearth extension remove sample-ext`
/// - Force remove: `hearth extension remove sample-ext -y`
pub(super) async fn run(args: ExtensionRemoveArgs) -> Result<()> {
    let manager = build_manager(None)?;

    // Look up first so the confirmation names the installed version
    let extension = manager.show(&args.name)?;

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove '{}' version {}?",
                extension.name, extension.version
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            output::info("Cancelled");
            return Ok(());
        }
    }

    manager.remove(&args.name).await?;
    output::success(&format!("Removed extension '{}'", args.name));
    Ok(())
}
