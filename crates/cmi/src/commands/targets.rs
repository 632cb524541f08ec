//! List release artifacts.

use anyhow::Result;
use cmi_core::Target;
use colored::Colorize;

use crate::config::Config;

pub fn execute(config: &Config) -> Result<()> {
    let channel = config.release_channel()?;
    let host = Target::host().ok();

    println!(
        "{} {}",
        "claude-memory release".cyan().bold(),
        channel.version().bold()
    );
    println!("{}", "─".repeat(50));

    for (target, descriptor) in channel.artifacts() {
        let marker = if Some(*target) == host {
            "(this host)".green().to_string()
        } else {
            String::new()
        };
        println!("  {} {}", target.to_string().bold(), marker);
        println!("    url:    {}", descriptor.url);
        println!("    sha256: {}", descriptor.sha256.dimmed());
    }

    Ok(())
}
