//! The install manifest.
//!
//! One ordered list of binaries and assets drives both archive extraction and
//! the plugin symlink rebuild, so the two can never drift apart.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Command-line binary shipped in every release
pub const CLI_BINARY: &str = "claude-memory";

/// MCP server binary shipped in every release
pub const SERVER_BINARY: &str = "claude-memory-server";

/// Whether an asset is a directory tree or a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Directory,
    File,
}

/// A named static asset placed at the top of the installation root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub name: String,
    pub kind: AssetKind,
}

impl AssetEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AssetKind::Directory,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AssetKind::File,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallManifest {
    pub binaries: Vec<String>,
    pub assets: Vec<AssetEntry>,
}

impl Default for InstallManifest {
    fn default() -> Self {
        Self::standard()
    }
}

impl InstallManifest {
    /// Manifest of current releases, including the MCP server registration file
    pub fn standard() -> Self {
        Self {
            binaries: vec![CLI_BINARY.to_string(), SERVER_BINARY.to_string()],
            assets: vec![
                AssetEntry::dir(".claude-plugin"),
                AssetEntry::dir("agents"),
                AssetEntry::dir("skills"),
                AssetEntry::dir("commands"),
                AssetEntry::dir("hooks"),
                AssetEntry::file("hooks.json"),
                AssetEntry::file(".mcp.json"),
            ],
        }
    }

    /// Copy of this manifest with one asset dropped
    pub fn without_asset(&self, name: &str) -> Self {
        Self {
            binaries: self.binaries.clone(),
            assets: self
                .assets
                .iter()
                .filter(|a| a.name != name)
                .cloned()
                .collect(),
        }
    }

    pub fn asset(&self, name: &str) -> Option<&AssetEntry> {
        self.assets.iter().find(|a| a.name == name)
    }

    pub fn has_binary(&self, name: &str) -> bool {
        self.binaries.iter().any(|b| b == name)
    }

    /// Reject names that would escape the install root or collide.
    pub fn validate(&self) -> Result<()> {
        if self.binaries.is_empty() {
            return Err(Error::configuration("install manifest lists no binaries"));
        }

        let mut seen = std::collections::HashSet::new();
        for name in self.binaries.iter() {
            check_entry_name(name)?;
            if !seen.insert(("bin", name.as_str())) {
                return Err(Error::configuration(format!("duplicate binary '{}'", name)));
            }
        }
        for asset in &self.assets {
            check_entry_name(&asset.name)?;
            if asset.name == "bin" {
                return Err(Error::configuration("asset name 'bin' is reserved"));
            }
            if !seen.insert(("asset", asset.name.as_str())) {
                return Err(Error::configuration(format!(
                    "duplicate asset '{}'",
                    asset.name
                )));
            }
        }
        Ok(())
    }
}

fn check_entry_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::configuration(format!(
            "manifest entry '{}' must be a single path component",
            name
        ))),
    }
}
