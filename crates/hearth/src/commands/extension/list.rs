//! Extension list command

use anyhow::{Context, Result};
use tabled::{settings::Style, Table, Tabled};

use super::common::build_manager;
use crate::cli::ExtensionListArgs;
use crate::output;

#[derive(Tabled, serde::Serialize)]
struct InstalledRow {
    name: String,
    version: String,
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    ext_type: String,
}

/// List installed extensions
pub(super) async fn run(args: ExtensionListArgs) -> Result<()> {
    let manager = build_manager(None)?;
    let rows: Vec<InstalledRow> = manager
        .list()?
        .into_iter()
        .map(|ext| InstalledRow {
            name: ext.name,
            version: ext.version,
            ext_type: ext.ext_type,
        })
        .collect();

    if args.json {
        let json =
            serde_json::to_string_pretty(&rows).context("Failed to serialize extensions")?;
        println!("{}", json);
    } else if rows.is_empty() {
        output::info("No extensions installed");
    } else {
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{}", table);
    }

    Ok(())
}
