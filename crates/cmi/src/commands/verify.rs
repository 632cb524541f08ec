//! Post-install verification.

use anyhow::{Context, Result};
use cmi_core::manifest::CLI_BINARY;
use cmi_core::notice::quote_path;
use colored::Colorize;

use crate::commands::local_installer;
use crate::config::Config;

pub fn execute(config: &Config) -> Result<()> {
    let installer = local_installer(config)?;
    let output = installer
        .verify()
        .context("claude-memory did not pass verification")?;

    println!("{} {}", "✓".green(), output);
    let stats = format!("{} stats", quote_path(&installer.paths().binary(CLI_BINARY)));
    println!("  Run {} for database statistics.", stats.cyan());
    Ok(())
}
