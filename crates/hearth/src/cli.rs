//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};

/// Hearth - host CLI with wheel-based plugin extensions
#[derive(Parser, Debug)]
#[command(name = "hearth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Extension management
    #[command(subcommand)]
    Extension(ExtensionCommands),
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Extension commands
#[derive(Subcommand, Debug)]
pub enum ExtensionCommands {
    /// Install an extension from the index, a URL, or a local wheel
    Add(ExtensionAddArgs),

    /// Remove an installed extension
    Remove(ExtensionRemoveArgs),

    /// List installed extensions
    List(ExtensionListArgs),

    /// Show an installed extension's details
    Show(ExtensionShowArgs),

    /// Update an installed extension to the newest compatible version
    Update(ExtensionUpdateArgs),

    /// List extensions available in the index
    Available(ExtensionAvailableArgs),
}

#[derive(Args, Debug)]
pub struct ExtensionAddArgs {
    /// Wheel source: a local path or a direct download URL
    #[arg(conflicts_with = "name")]
    pub source: Option<String>,

    /// Extension name to resolve through the index
    #[arg(short, long)]
    pub name: Option<String>,

    /// Expected SHA-256 hex digest of the wheel (for explicit sources)
    #[arg(long, conflicts_with = "name")]
    pub sha256: Option<String>,

    /// Extension index URL override
    #[arg(long)]
    pub index_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExtensionRemoveArgs {
    /// Extension name
    pub name: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ExtensionListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExtensionShowArgs {
    /// Extension name
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExtensionUpdateArgs {
    /// Extension name
    pub name: String,

    /// Extension index URL override
    #[arg(long)]
    pub index_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExtensionAvailableArgs {
    /// Extension index URL override
    #[arg(long)]
    pub index_url: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
