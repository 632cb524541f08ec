//! Install receipt written into the installation root.

use crate::error::{Error, Result, fs_err};
use crate::layout::InstallPaths;
use crate::manifest::InstallManifest;
use crate::platform::Target;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReceipt {
    pub version: String,
    pub url: String,
    pub sha256: String,
    pub installed_at: DateTime<Utc>,
    pub binaries: Vec<String>,
    pub assets: Vec<String>,
    pub target: Target,
}

impl InstallReceipt {
    pub fn new(
        version: &str,
        target: Target,
        url: &str,
        sha256: &str,
        manifest: &InstallManifest,
    ) -> Self {
        Self {
            version: version.to_string(),
            url: url.to_string(),
            sha256: sha256.to_string(),
            installed_at: Utc::now(),
            binaries: manifest.binaries.clone(),
            assets: manifest.assets.iter().map(|a| a.name.clone()).collect(),
            target,
        }
    }

    /// Load the receipt of the current installation, if there is one
    pub fn load(paths: &InstallPaths) -> Result<Option<Self>> {
        let path = paths.receipt();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(fs_err(&path))?;
        let receipt = toml::from_str(&content).map_err(|e| {
            Error::configuration(format!("unreadable receipt {}: {}", path.display(), e))
        })?;
        Ok(Some(receipt))
    }

    pub fn save(&self, paths: &InstallPaths) -> Result<()> {
        let path = paths.receipt();
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::configuration(format!("Failed to serialize receipt: {}", e)))?;
        fs::write(&path, content).map_err(fs_err(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, Platform};
    use tempfile::tempdir;

    #[test]
    fn test_receipt_save_and_load() {
        let temp = tempdir().expect("Failed to create temp dir");
        let paths = InstallPaths::under_home(temp.path(), temp.path().join("root"));
        fs::create_dir_all(&paths.install_root).unwrap();

        assert!(InstallReceipt::load(&paths).unwrap().is_none());

        let receipt = InstallReceipt::new(
            "1.0.4",
            Target::new(Platform::Linux, Arch::Arm64),
            "https://example.invalid/cm.tar.gz",
            &"c".repeat(64),
            &InstallManifest::standard(),
        );
        receipt.save(&paths).unwrap();

        let loaded = InstallReceipt::load(&paths).unwrap().unwrap();
        assert_eq!(loaded, receipt);
        assert_eq!(loaded.assets.len(), 7);
    }

    #[test]
    fn test_corrupt_receipt() {
        let temp = tempdir().expect("Failed to create temp dir");
        let paths = InstallPaths::under_home(temp.path(), temp.path().join("root"));
        fs::create_dir_all(&paths.install_root).unwrap();
        fs::write(paths.receipt(), "version = [").unwrap();

        assert!(InstallReceipt::load(&paths).unwrap_err().is_configuration());
    }
}
