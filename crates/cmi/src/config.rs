//! Configuration management for cmi.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variable CMI_CONFIG (path to an alternate config file)
//! 2. Config file (<data dir>/config.toml)
//! 3. Default values

use anyhow::{Context, Result};
use cmi_core::fetch::DEFAULT_TIMEOUT_SECS;
use cmi_core::layout::{
    default_data_dir, default_install_root, default_memory_store, default_plugin_dir,
};
use cmi_core::release::DEFAULT_RELEASE_BASE;
use cmi_core::{ArtifactSpec, InstallPaths, RegistrationSettings, ReleaseChannel};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Install locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Release override (defaults to the built-in release)
    #[serde(default)]
    pub release: Option<ReleaseConfig>,

    /// MCP server registration with the host tool
    #[serde(default)]
    pub registration: RegistrationSettings,

    /// Download settings
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Package-owned directory holding binaries and assets
    #[serde(default = "default_install_root")]
    pub install_root: PathBuf,

    /// Symlink directory scanned by the plugin host
    #[serde(default = "default_plugin_dir")]
    pub plugin_dir: PathBuf,

    /// Memory database owned by claude-memory (never modified)
    #[serde(default = "default_memory_store")]
    pub memory_store: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Release version, e.g. "1.0.4"
    pub version: String,

    /// Base URL used for artifacts without an explicit url
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// One entry per supported platform/arch
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Download timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

// Default value functions
fn default_base_url() -> String {
    DEFAULT_RELEASE_BASE.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("cmi/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            install_root: default_install_root(),
            plugin_dir: default_plugin_dir(),
            memory_store: default_memory_store(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Config::default()
        };

        Ok(config)
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("CMI_CONFIG") {
            PathBuf::from(path)
        } else {
            default_data_dir().join("config.toml")
        }
    }

    pub fn install_paths(&self) -> InstallPaths {
        InstallPaths {
            install_root: self.paths.install_root.clone(),
            plugin_dir: self.paths.plugin_dir.clone(),
            memory_store: self.paths.memory_store.clone(),
        }
    }

    /// The configured release channel, or the built-in one
    pub fn release_channel(&self) -> Result<ReleaseChannel> {
        match &self.release {
            None => Ok(ReleaseChannel::builtin()),
            Some(release) => {
                ReleaseChannel::from_specs(&release.version, &release.base_url, &release.artifacts)
                    .context("Invalid [release] section in config")
            }
        }
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmi_core::{Arch, Platform, Target};
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.release.is_none());
        assert!(config.registration.enabled);
        assert_eq!(config.registration.host_tool, "claude");
        assert_eq!(config.registration.server_name, "mark42");
        assert_eq!(config.network.timeout_secs, 300);
        assert!(config.paths.memory_store.ends_with(".claude/memory.db"));
        assert!(
            config
                .paths
                .plugin_dir
                .ends_with(".claude/plugins/local/claude-memory")
        );

        let channel = config.release_channel().unwrap();
        assert_eq!(channel.version(), "1.0.1");
    }

    #[test]
    fn test_parse_release_override() {
        let content = r#"
            [paths]
            install_root = "/opt/claude-memory"

            [registration]
            enabled = false

            [release]
            version = "1.0.4"

            [[release.artifacts]]
            platform = "darwin"
            arch = "arm64"
            sha256 = "b5823f2e5dbc38fd9d03c7ef9c8677c2e7f1a2a479f8276d641920bc251afd73"
        "#;
        let config: Config = toml::from_str(content).expect("Failed to parse config");

        assert_eq!(config.paths.install_root, PathBuf::from("/opt/claude-memory"));
        assert!(config.paths.plugin_dir.ends_with("claude-memory"));
        assert!(!config.registration.enabled);
        assert_eq!(config.registration.host_tool, "claude");

        let channel = config.release_channel().unwrap();
        assert_eq!(channel.version(), "1.0.4");
        let descriptor = channel
            .resolve(Target::new(Platform::Macos, Arch::Arm64))
            .unwrap();
        assert!(descriptor.url.ends_with("v1.0.4/claude-memory_1.0.4_darwin_arm64.tar.gz"));
        assert!(
            channel
                .resolve(Target::new(Platform::Linux, Arch::Arm64))
                .is_err()
        );
    }

    #[test]
    fn test_invalid_checksum_in_config() {
        let content = r#"
            [release]
            version = "1.0.4"

            [[release.artifacts]]
            platform = "linux"
            arch = "amd64"
            sha256 = "deadbeef"
        "#;
        let config: Config = toml::from_str(content).expect("Failed to parse config");
        assert!(config.release_channel().is_err());
    }

    #[test]
    fn test_load_from_env_path() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("cmi.toml");
        std::fs::write(&path, "[network]\ntimeout_secs = 12\n").unwrap();

        // SAFETY: only this test reads or writes CMI_CONFIG
        unsafe { std::env::set_var("CMI_CONFIG", &path) };
        let config = Config::load().expect("Failed to load config");
        unsafe { std::env::remove_var("CMI_CONFIG") };

        assert_eq!(config.download_timeout(), Duration::from_secs(12));
        assert_eq!(config.install_paths().memory_store, config.paths.memory_store);
    }
}
