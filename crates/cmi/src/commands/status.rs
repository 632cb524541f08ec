//! Installation status command.
//!
//! Supports JSON output for programmatic use.

use anyhow::Result;
use cmi_core::InstallStatus;
use cmi_core::plugin::LinkState;
use colored::Colorize;

use crate::config::Config;

pub fn execute(json: bool, config: &Config) -> Result<()> {
    let paths = config.install_paths();
    let manifest = cmi_core::InstallManifest::standard();
    let status = InstallStatus::inspect(&paths, &manifest, &config.registration);

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "claude-memory status".cyan().bold());
    println!("{}", "─".repeat(50));
    println!();

    print!("  Installed: ");
    match &status.receipt {
        Some(receipt) => println!(
            "{} {} ({}, {})",
            "✓".green(),
            receipt.version.green(),
            receipt.target,
            receipt.installed_at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => println!("{}", "✗ not installed".red()),
    }
    println!("  Install root: {}", paths.install_root.display());

    println!();
    println!("  {}", "Binaries:".cyan());
    for binary in &status.binaries {
        print!("    {}: ", binary.name);
        if binary.present {
            println!("{}", "✓ present".green());
        } else {
            println!("{}", "✗ missing".red());
        }
    }

    println!();
    println!("  {} {}", "Plugin links:".cyan(), paths.plugin_dir.display());
    for link in &status.links {
        let name = link
            .link
            .strip_prefix(&paths.plugin_dir)
            .unwrap_or(link.link.as_path())
            .display();
        print!("    {}: ", name);
        match link.state {
            LinkState::Ok => println!("{}", "✓ linked".green()),
            LinkState::Dangling => println!("{}", "✗ dangling".red()),
            LinkState::Foreign => println!("{}", "○ points elsewhere".yellow()),
            LinkState::NotALink => println!("{}", "✗ not a symlink".red()),
            LinkState::Missing => println!("{}", "✗ missing".red()),
        }
    }

    println!();
    print!("  Memory database: ");
    if status.memory_store_present {
        println!("{} {}", "✓".green(), status.memory_store.display());
    } else {
        println!(
            "{}",
            format!("○ not created yet ({})", status.memory_store.display()).yellow()
        );
    }

    print!("  {}: ", config.registration.host_tool);
    match &status.host_tool {
        Some(path) => println!("{} {}", "✓".green(), path.display()),
        None => println!("{}", "○ not found".yellow()),
    }

    println!();
    let issues = status.issues();
    if issues.is_empty() {
        println!("{}", "✓ All checks passed".green().bold());
    } else {
        println!("{}", format!("✗ {} issue(s) found:", issues.len()).red().bold());
        for issue in &issues {
            println!("  • {}", issue);
        }
    }

    Ok(())
}
