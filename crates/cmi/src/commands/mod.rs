//! Command implementations for the cmi CLI.

pub mod install;
pub mod status;
pub mod targets;
pub mod uninstall;
pub mod verify;

use anyhow::Result;
use cmi_core::{Fetcher, InstallManifest, Installer, OfflineFetcher};

use crate::config::Config;

/// Installer wired from configuration with the given fetcher
pub fn build_installer(config: &Config, fetcher: Box<dyn Fetcher>) -> Result<Installer> {
    Ok(Installer::new(fetcher, config.install_paths())
        .with_channel(config.release_channel()?)
        .with_manifest(InstallManifest::standard())
        .with_registration(config.registration.clone()))
}

/// Installer for commands that do not download (uninstall, verify)
pub fn local_installer(config: &Config) -> Result<Installer> {
    build_installer(config, Box::new(OfflineFetcher))
}
