//! Extension update command

use anyhow::Result;
use hearth_extensions::Error;

use super::common::build_manager;
use crate::cli::ExtensionUpdateArgs;
use crate::output;

/// Update an installed extension to the newest compatible index candidate
pub(super) async fn run(args: ExtensionUpdateArgs) -> Result<()> {
    let manager = build_manager(args.index_url.as_deref())?;

    let pb = output::spinner(&format!("Updating extension '{}'...", args.name));
    let result = manager.update(&args.name).await;
    pb.finish_and_clear();

    match result {
        Ok(report) => {
            output::success(&format!(
                "Updated '{}' from {} to {}",
                report.name, report.from_version, report.to_version
            ));
            Ok(())
        }
        Err(err @ Error::RestoreFailed { .. }) => {
            // The store is in a degraded state: the extension is absent and
            // the backup is the only remaining copy.
            output::warn("The extension could not be restored after the failed update.");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
