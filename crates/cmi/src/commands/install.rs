//! Install and upgrade commands.

use anyhow::{Context, Result};
use cmi_core::{FileFetcher, Fetcher, HttpFetcher, InstallReport, RegistrationOutcome, Target};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::cli::InstallArgs;
use crate::commands::build_installer;
use crate::config::Config;

pub async fn execute(args: InstallArgs, config: &Config, upgrade: bool) -> Result<()> {
    let target = Target::resolve(args.platform.as_deref(), args.arch.as_deref())
        .context("Cannot determine install target")?;

    let fetcher: Box<dyn Fetcher> = match &args.archive {
        Some(path) => Box::new(FileFetcher::new(path)),
        None => Box::new(HttpFetcher::new(
            config.download_timeout(),
            &config.network.user_agent,
        )?),
    };

    let mut config = config.clone();
    if args.no_register {
        config.registration.enabled = false;
    }
    let installer = build_installer(&config, fetcher)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!(
        "{} claude-memory {} for {}",
        if upgrade { "Upgrading" } else { "Installing" },
        installer.channel().version(),
        target
    ));

    let result = if upgrade {
        installer.upgrade(target).await
    } else {
        installer.install(target).await
    };
    spinner.finish_and_clear();
    let report = result.context(if upgrade { "Upgrade failed" } else { "Install failed" })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&report);
    println!();
    println!(
        "{}",
        cmi_core::notice::render(
            installer.paths(),
            &installer.registration().server_name,
            &report.registration
        )
    );
    Ok(())
}

fn print_summary(report: &InstallReport) {
    match &report.previous_version {
        Some(previous) if previous != &report.version => println!(
            "{} Upgraded claude-memory {} → {} ({})",
            "✓".green(),
            previous,
            report.version.green(),
            report.target
        ),
        _ => println!(
            "{} Installed claude-memory {} ({})",
            "✓".green(),
            report.version.green(),
            report.target
        ),
    }
    println!("  sha256: {}", report.sha256.dimmed());
    println!("  Install root: {}", report.install_root.display());
    println!(
        "  Plugin links: {} in {}",
        report.links.len(),
        report.plugin_dir.display()
    );

    match &report.registration {
        RegistrationOutcome::Registered { host_tool } => println!(
            "  {} MCP server registered via {}",
            "✓".green(),
            host_tool.display()
        ),
        RegistrationOutcome::Skipped { .. } => {
            println!("  {} MCP registration skipped", "○".yellow())
        }
        RegistrationOutcome::ToolMissing { host_tool, .. } => println!(
            "  {} {} not found; register the MCP server manually (see below)",
            "○".yellow(),
            host_tool
        ),
        RegistrationOutcome::Failed { reason, .. } => println!(
            "  {} MCP registration failed: {} (see below)",
            "○".yellow(),
            reason
        ),
    }
}
