//! Extension management commands
//!
//! Implements the extension lifecycle CLI:
//! - add: Install an extension from the index, a URL, or a local wheel
//! - remove: Remove an installed extension
//! - list: List installed extensions
//! - show: Show one installed extension, metadata included
//! - update: Update to the newest compatible index candidate
//! - available: List what the index offers

mod add;
mod available;
mod common;
mod list;
mod remove;
mod show;
mod update;

use anyhow::Result;

use crate::cli::ExtensionCommands;

/// Main entry point for extension subcommands
pub async fn run(cmd: ExtensionCommands) -> Result<()> {
    match cmd {
        ExtensionCommands::Add(args) => add::run(args).await,
        ExtensionCommands::Remove(args) => remove::run(args).await,
        ExtensionCommands::List(args) => list::run(args).await,
        ExtensionCommands::Show(args) => show::run(args).await,
        ExtensionCommands::Update(args) => update::run(args).await,
        ExtensionCommands::Available(args) => available::run(args).await,
    }
}
