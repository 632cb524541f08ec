//! Uninstall command.
//!
//! Removes the installation root. The plugin directory is only removed with
//! --purge-plugin, and the memory database is never touched either way.

use anyhow::Result;
use cmi_core::UninstallOptions;
use colored::Colorize;
use dialoguer::Confirm;

use crate::commands::local_installer;
use crate::config::Config;

pub fn execute(purge_plugin: bool, yes: bool, config: &Config) -> Result<()> {
    let installer = local_installer(config)?;
    let paths = installer.paths();

    if purge_plugin && !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove plugin directory {}?",
                paths.plugin_dir.display()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
    }

    let report = installer.uninstall(UninstallOptions { purge_plugin })?;

    if report.removed_install_root {
        println!(
            "{} Removed {}",
            "✓".green(),
            paths.install_root.display()
        );
    } else {
        println!(
            "{} Nothing installed at {}",
            "○".yellow(),
            paths.install_root.display()
        );
    }

    if report.plugin_dir_removed {
        println!("{} Removed {}", "✓".green(), paths.plugin_dir.display());
    }
    if let Some(leftover) = &report.leftover_plugin_dir {
        println!(
            "{} Plugin links left in {}",
            "○".yellow(),
            leftover.display()
        );
        println!(
            "  Run {} to remove them.",
            "cmi uninstall --purge-plugin".cyan()
        );
    }

    if report.memory_store_present {
        println!(
            "{} Your memory database was kept: {}",
            "✓".green(),
            paths.memory_store.display()
        );
    }

    Ok(())
}
