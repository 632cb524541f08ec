//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// claude-memory installer
///
/// Installs the claude-memory binaries and links them into the Claude Code
/// plugin directory. Your memory database is never touched.
#[derive(Parser, Debug)]
#[command(name = "cmi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install claude-memory and link the plugin
    Install(InstallArgs),

    /// Upgrade an existing install (rebuilds the plugin links)
    Upgrade(InstallArgs),

    /// Remove the installed binaries and assets
    Uninstall {
        /// Also remove the plugin directory under ~/.claude/plugins
        #[arg(long)]
        purge_plugin: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show installation status
    Status {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Run the installed claude-memory binary to check it works
    Verify,

    /// List release artifacts for every supported platform
    Targets,

    /// Show version
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Target platform (macos, linux); defaults to this host
    #[arg(long)]
    pub platform: Option<String>,

    /// Target architecture (amd64, arm64); defaults to this host
    #[arg(long)]
    pub arch: Option<String>,

    /// Install from a local archive instead of downloading (checksum still verified)
    #[arg(long, value_name = "PATH")]
    pub archive: Option<PathBuf>,

    /// Skip `claude mcp add` registration
    #[arg(long)]
    pub no_register: bool,

    /// Print the install report as JSON instead of the notice
    #[arg(short, long)]
    pub json: bool,
}
