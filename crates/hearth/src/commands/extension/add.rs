//! Extension add command

use anyhow::{anyhow, Result};
use hearth_extensions::AddRequest;

use super::common::build_manager;
use crate::cli::ExtensionAddArgs;
use crate::output;

/// Install an extension
///
/// Supports:
/// - By name via the index: `hearth extension add --name sample-ext`
/// - From a URL: `hearth extension add https://x/sample_ext-1.0.0-py3-none-any.whl`
/// - From a local wheel: `hearth extension add ./sample_ext-1.0.0-py3-none-any.whl`
pub(super) async fn run(args: ExtensionAddArgs) -> Result<()> {
    let request = match (args.source, args.name) {
        (Some(source), None) => AddRequest::FromSource {
            source,
            sha256: args.sha256,
        },
        (None, Some(name)) => AddRequest::ByName { name },
        _ => return Err(anyhow!("Provide either a wheel source or --name.")),
    };

    let manager = build_manager(args.index_url.as_deref())?;

    let pb = output::spinner("Installing extension...");
    let result = manager.add(request).await;
    pb.finish_and_clear();

    let installed = result?;
    output::success(&format!(
        "Installed extension '{}' version {}",
        installed.name, installed.version
    ));
    Ok(())
}
