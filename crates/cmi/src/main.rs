//! cmi - claude-memory installer
//!
//! Downloads a verified claude-memory release, installs it, and links it into
//! the Claude Code plugin directory.

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};

const DEFAULT_LOG: &str = "cmi=info,cmi_core=info";
const VERBOSE_LOG: &str = "cmi=debug,cmi_core=debug";

/// RUST_LOG wins over the defaults; --verbose is layered on top of either
fn log_filter(verbose: bool, rust_log: Option<&str>) -> Result<EnvFilter> {
    let mut filter = match rust_log.filter(|s| !s.trim().is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::new(DEFAULT_LOG),
    };
    if verbose {
        for directive in VERBOSE_LOG.split(',') {
            filter = filter.add_directive(directive.parse()?);
        }
    }
    Ok(filter)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = log_filter(cli.verbose, rust_log.as_deref())?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load configuration
    let config = config::Config::load()?;
    debug!("Config path: {}", config::Config::config_path().display());

    // Execute command
    match cli.command {
        Commands::Install(args) => commands::install::execute(args, &config, false).await,
        Commands::Upgrade(args) => commands::install::execute(args, &config, true).await,
        Commands::Uninstall { purge_plugin, yes } => {
            commands::uninstall::execute(purge_plugin, yes, &config)
        }
        Commands::Status { json } => commands::status::execute(json, &config),
        Commands::Verify => commands::verify::execute(&config),
        Commands::Targets => commands::targets::execute(&config),
        Commands::Version => {
            println!("cmi {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
