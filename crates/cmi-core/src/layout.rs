//! Filesystem locations managed by the installer.
//!
//! - installation root: package-owned, replaced wholesale on every install
//! - plugin directory: symlink farm scanned by the plugin host
//! - memory store: user data owned by the memory engine, never written here

use crate::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Receipt file written at the top of the installation root
pub const RECEIPT_FILE: &str = "INSTALL_RECEIPT.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallPaths {
    pub install_root: PathBuf,
    pub plugin_dir: PathBuf,
    pub memory_store: PathBuf,
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Base directory for installer-owned data
pub fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "claude-memory", "cmi") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        home_dir().join(".claude-memory-installer")
    }
}

pub fn default_install_root() -> PathBuf {
    default_data_dir().join("claude-memory")
}

pub fn default_plugin_dir() -> PathBuf {
    home_dir()
        .join(".claude")
        .join("plugins")
        .join("local")
        .join("claude-memory")
}

pub fn default_memory_store() -> PathBuf {
    home_dir().join(".claude").join("memory.db")
}

impl Default for InstallPaths {
    fn default() -> Self {
        Self {
            install_root: default_install_root(),
            plugin_dir: default_plugin_dir(),
            memory_store: default_memory_store(),
        }
    }
}

impl InstallPaths {
    /// Layout rooted entirely under `home`, mirroring the default locations
    pub fn under_home(home: &Path, install_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            plugin_dir: home
                .join(".claude")
                .join("plugins")
                .join("local")
                .join("claude-memory"),
            memory_store: home.join(".claude").join("memory.db"),
        }
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.install_root.join("bin")
    }

    pub fn binary(&self, name: &str) -> PathBuf {
        self.bin_dir().join(name)
    }

    pub fn asset(&self, name: &str) -> PathBuf {
        self.install_root.join(name)
    }

    pub fn receipt(&self) -> PathBuf {
        self.install_root.join(RECEIPT_FILE)
    }

    pub fn plugin_bin_dir(&self) -> PathBuf {
        self.plugin_dir.join("bin")
    }

    /// Parent directory of the memory store, the only store-related path we create
    pub fn memory_store_parent(&self) -> Option<&Path> {
        self.memory_store
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Refuse layouts where a wholesale delete could reach the memory store.
    ///
    /// The installation root and plugin directory are both removed
    /// recursively, so the store must live outside of both.
    pub fn check_store_isolation(&self) -> Result<()> {
        let store = normalize(&self.memory_store);
        for (label, dir) in [
            ("installation root", &self.install_root),
            ("plugin directory", &self.plugin_dir),
        ] {
            let dir = normalize(dir);
            if store.starts_with(&dir) {
                return Err(Error::configuration(format!(
                    "memory store {} must not be inside the {} {}",
                    self.memory_store.display(),
                    label,
                    dir.display()
                )));
            }
        }
        if normalize(&self.install_root).starts_with(normalize(&self.plugin_dir))
            || normalize(&self.plugin_dir).starts_with(normalize(&self.install_root))
        {
            return Err(Error::configuration(
                "installation root and plugin directory must not contain each other",
            ));
        }
        Ok(())
    }
}

/// Lexically resolve `.` and `..` so containment checks see through them
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
