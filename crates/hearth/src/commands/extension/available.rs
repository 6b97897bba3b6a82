//! Extension available command (index passthrough)

use anyhow::{Context, Result};
use hearth_extensions::parse_wheel_filename;
use tabled::{settings::Style, Table, Tabled};

use super::common::build_manager;
use crate::cli::ExtensionAvailableArgs;
use crate::output;

#[derive(Tabled)]
struct AvailableRow {
    name: String,
    version: String,
    #[tabled(rename = "download url")]
    download_url: String,
}

/// List extensions offered by the index
pub(super) async fn run(args: ExtensionAvailableArgs) -> Result<()> {
    let manager = build_manager(args.index_url.as_deref())?;

    let pb = output::spinner("Querying extension index...");
    let result = manager.list_available().await;
    pb.finish_and_clear();
    let document = result?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&document).context("Failed to serialize index")?;
        println!("{}", json);
        return Ok(());
    }

    let rows: Vec<AvailableRow> = document
        .extensions
        .iter()
        .flat_map(|(name, entries)| {
            entries.iter().map(move |entry| {
                let version = entry
                    .download_url
                    .rsplit('/')
                    .next()
                    .and_then(parse_wheel_filename)
                    .map(|info| info.version)
                    .unwrap_or_else(|| "?".to_string());
                AvailableRow {
                    name: name.clone(),
                    version,
                    download_url: entry.download_url.clone(),
                }
            })
        })
        .collect();

    if rows.is_empty() {
        output::info("The index offers no extensions");
    } else {
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{}", table);
    }

    Ok(())
}
