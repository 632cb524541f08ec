//! Install, upgrade, uninstall and verify.
//!
//! Install order is fixed:
//! resolve -> fetch -> verify checksum -> extract -> rebuild plugin links
//! -> ensure store parent -> register (best effort) -> write receipt.
//! Nothing is written before the checksum has been verified.

use crate::archive;
use crate::error::{Error, Result, fs_err};
use crate::fetch::Fetcher;
use crate::integrity;
use crate::layout::InstallPaths;
use crate::manifest::{CLI_BINARY, InstallManifest, SERVER_BINARY};
use crate::platform::Target;
use crate::plugin::{self, LinkRecord};
use crate::receipt::InstallReceipt;
use crate::register::{RegistrationOutcome, RegistrationSettings};
use crate::release::ReleaseChannel;
use crate::store;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info, warn};

/// Outcome of a successful install or upgrade
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub version: String,
    pub target: Target,
    pub sha256: String,
    pub previous_version: Option<String>,
    pub install_root: PathBuf,
    pub plugin_dir: PathBuf,
    pub memory_store: PathBuf,
    pub links: Vec<LinkRecord>,
    pub store_parent_created: bool,
    pub registration: RegistrationOutcome,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UninstallOptions {
    /// Also remove the plugin directory symlinks
    pub purge_plugin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UninstallReport {
    pub removed_install_root: bool,
    pub plugin_dir_removed: bool,
    /// Plugin directory still on disk after uninstall
    pub leftover_plugin_dir: Option<PathBuf>,
    pub memory_store_present: bool,
}

pub struct Installer {
    fetcher: Box<dyn Fetcher>,
    channel: ReleaseChannel,
    manifest: InstallManifest,
    paths: InstallPaths,
    registration: RegistrationSettings,
}

impl Installer {
    /// Installer for the built-in release channel and standard manifest
    pub fn new(fetcher: Box<dyn Fetcher>, paths: InstallPaths) -> Self {
        Self {
            fetcher,
            channel: ReleaseChannel::builtin(),
            manifest: InstallManifest::standard(),
            paths,
            registration: RegistrationSettings::default(),
        }
    }

    pub fn with_channel(mut self, channel: ReleaseChannel) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_manifest(mut self, manifest: InstallManifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_registration(mut self, registration: RegistrationSettings) -> Self {
        self.registration = registration;
        self
    }

    pub fn paths(&self) -> &InstallPaths {
        &self.paths
    }

    pub fn channel(&self) -> &ReleaseChannel {
        &self.channel
    }

    pub fn manifest(&self) -> &InstallManifest {
        &self.manifest
    }

    pub fn registration(&self) -> &RegistrationSettings {
        &self.registration
    }

    /// Install the channel's version for `target`, replacing any previous install.
    pub async fn install(&self, target: Target) -> Result<InstallReport> {
        self.manifest.validate()?;
        self.paths.check_store_isolation()?;
        let descriptor = self.channel.resolve(target)?;
        let version = self.channel.version();
        // The plugin directory usually sits under the store's parent, so
        // presence is sampled before anything is written.
        let store_parent_existed = store::store_parent_present(&self.paths);

        let previous_version = match InstallReceipt::load(&self.paths) {
            Ok(receipt) => receipt.map(|r| r.version),
            Err(e) => {
                warn!("Ignoring previous install receipt: {}", e);
                None
            }
        };

        info!("Installing claude-memory {} for {}", version, target);
        let body = self.fetcher.fetch(&descriptor.url).await?;
        let sha256 = integrity::verify(&descriptor.url, &body, &descriptor.sha256)?;
        debug!("Checksum verified: {}", sha256);

        archive::extract(&body, &self.manifest, &self.paths)?;
        drop(body);

        let links = plugin::rebuild_plugin_dir(&self.paths, &self.manifest)?;
        store::ensure_store_parent(&self.paths)?;
        let store_parent_created = !store_parent_existed;

        let server = self.paths.binary(SERVER_BINARY);
        let registration = if self.manifest.has_binary(SERVER_BINARY) {
            self.registration.register(&server)
        } else {
            RegistrationOutcome::Skipped {
                manual_command: self.registration.manual_command(&server),
            }
        };

        InstallReceipt::new(version, target, &descriptor.url, &sha256, &self.manifest)
            .save(&self.paths)?;

        Ok(InstallReport {
            version: version.to_string(),
            target,
            sha256,
            previous_version,
            install_root: self.paths.install_root.clone(),
            plugin_dir: self.paths.plugin_dir.clone(),
            memory_store: self.paths.memory_store.clone(),
            links,
            store_parent_created,
            registration,
        })
    }

    /// Same procedure as [`Installer::install`]; logs the version transition.
    pub async fn upgrade(&self, target: Target) -> Result<InstallReport> {
        let report = self.install(target).await?;
        match &report.previous_version {
            Some(previous) if previous == &report.version => {
                info!("Reinstalled claude-memory {}", report.version)
            }
            Some(previous) => info!("Upgraded claude-memory {} -> {}", previous, report.version),
            None => info!("No previous install found; installed {}", report.version),
        }
        Ok(report)
    }

    /// Remove the installation root, and the plugin directory only when asked.
    ///
    /// The memory store and its parent directory are left as they are.
    pub fn uninstall(&self, options: UninstallOptions) -> Result<UninstallReport> {
        self.paths.check_store_isolation()?;

        let root = &self.paths.install_root;
        let removed_install_root = if root.exists() {
            fs::remove_dir_all(root).map_err(fs_err(root))?;
            info!("Removed {}", root.display());
            true
        } else {
            false
        };

        let plugin_dir_removed = if options.purge_plugin {
            plugin::remove_plugin_dir(&self.paths)?
        } else {
            false
        };

        let leftover_plugin_dir = fs::symlink_metadata(&self.paths.plugin_dir)
            .is_ok()
            .then(|| self.paths.plugin_dir.clone());

        Ok(UninstallReport {
            removed_install_root,
            plugin_dir_removed,
            leftover_plugin_dir,
            memory_store_present: store::store_present(&self.paths),
        })
    }

    /// Run `claude-memory version` from the installation root.
    pub fn verify(&self) -> Result<String> {
        let binary = self.paths.binary(CLI_BINARY);
        if !binary.is_file() {
            return Err(Error::Verification(format!(
                "{} is not installed",
                binary.display()
            )));
        }

        let output = Command::new(&binary)
            .arg("version")
            .output()
            .map_err(|e| Error::Verification(format!("could not run {}: {}", binary.display(), e)))?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if !output.status.success() {
            return Err(Error::Verification(format!(
                "{} version exited with {}",
                CLI_BINARY, output.status
            )));
        }
        if !stdout.contains(CLI_BINARY) {
            return Err(Error::Verification(format!(
                "unexpected version output: {}",
                stdout
            )));
        }
        Ok(stdout)
    }
}
