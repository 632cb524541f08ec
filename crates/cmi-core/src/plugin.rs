//! Plugin directory symlink farm.
//!
//! The plugin host discovers assets by scanning the plugin directory. Every
//! entry there is a symlink into the installation root. The directory is
//! cleared and repopulated from the manifest on each install, so an asset
//! dropped between versions never leaves a dangling link behind.

use crate::error::{Error, Result, fs_err};
use crate::layout::InstallPaths;
use crate::manifest::InstallManifest;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One symlink created in the plugin directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub link: PathBuf,
    pub target: PathBuf,
}

/// Observed state of an expected plugin link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// Symlink pointing at the expected target, which exists
    Ok,
    /// Symlink present but its target is gone
    Dangling,
    /// Symlink pointing somewhere else
    Foreign,
    /// Something other than a symlink occupies the path
    NotALink,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkStatus {
    pub link: PathBuf,
    pub expected_target: PathBuf,
    pub state: LinkState,
}

/// Delete the plugin directory if present. Returns whether anything was removed.
pub fn remove_plugin_dir(paths: &InstallPaths) -> Result<bool> {
    let dir = &paths.plugin_dir;
    match fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(dir).map_err(fs_err(dir))?;
            Ok(true)
        }
        Ok(_) => {
            fs::remove_file(dir).map_err(fs_err(dir))?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::filesystem(dir, e)),
    }
}

/// Every (link, target) pair the manifest calls for, assets first then binaries
pub fn planned_links(paths: &InstallPaths, manifest: &InstallManifest) -> Vec<LinkRecord> {
    let assets = manifest.assets.iter().map(|asset| LinkRecord {
        link: paths.plugin_dir.join(&asset.name),
        target: paths.asset(&asset.name),
    });
    let binaries = manifest.binaries.iter().map(|binary| LinkRecord {
        link: paths.plugin_bin_dir().join(binary),
        target: paths.binary(binary),
    });
    assets.chain(binaries).collect()
}

/// Clear the plugin directory, then recreate it with one symlink per manifest entry.
pub fn rebuild_plugin_dir(
    paths: &InstallPaths,
    manifest: &InstallManifest,
) -> Result<Vec<LinkRecord>> {
    if remove_plugin_dir(paths)? {
        debug!("Cleared previous plugin directory {}", paths.plugin_dir.display());
    }

    let bin = paths.plugin_bin_dir();
    fs::create_dir_all(&bin).map_err(fs_err(&bin))?;

    let links = planned_links(paths, manifest);
    for record in &links {
        create_symlink(&record.target, &record.link)?;
    }

    info!(
        "Linked {} entries into {}",
        links.len(),
        paths.plugin_dir.display()
    );
    Ok(links)
}

/// Compare the plugin directory against what the manifest expects
pub fn inspect_plugin_dir(paths: &InstallPaths, manifest: &InstallManifest) -> Vec<LinkStatus> {
    planned_links(paths, manifest)
        .into_iter()
        .map(|record| {
            let state = link_state(&record.link, &record.target);
            LinkStatus {
                link: record.link,
                expected_target: record.target,
                state,
            }
        })
        .collect()
}

fn link_state(link: &Path, expected: &Path) -> LinkState {
    let Ok(meta) = fs::symlink_metadata(link) else {
        return LinkState::Missing;
    };
    if !meta.file_type().is_symlink() {
        return LinkState::NotALink;
    }
    match fs::read_link(link) {
        Ok(target) if target == expected => {
            if expected.exists() {
                LinkState::Ok
            } else {
                LinkState::Dangling
            }
        }
        Ok(_) => LinkState::Foreign,
        Err(_) => LinkState::Dangling,
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link).map_err(fs_err(link))
}

#[cfg(not(unix))]
fn create_symlink(_target: &Path, link: &Path) -> Result<()> {
    Err(Error::filesystem(
        link,
        std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "plugin links require a Unix host",
        ),
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn populated_root(temp: &Path, manifest: &InstallManifest) -> InstallPaths {
        let paths = InstallPaths::under_home(&temp.join("home"), temp.join("root"));
        fs::create_dir_all(paths.bin_dir()).unwrap();
        for binary in &manifest.binaries {
            fs::write(paths.binary(binary), "bin").unwrap();
        }
        for asset in &manifest.assets {
            fs::create_dir_all(paths.asset(&asset.name)).unwrap();
        }
        paths
    }

    fn link_targets(paths: &InstallPaths, manifest: &InstallManifest) -> Vec<PathBuf> {
        planned_links(paths, manifest)
            .iter()
            .map(|r| fs::read_link(&r.link).unwrap())
            .collect()
    }

    #[test]
    fn test_rebuild_creates_links() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manifest = InstallManifest::standard();
        let paths = populated_root(temp.path(), &manifest);

        let links = rebuild_plugin_dir(&paths, &manifest).unwrap();
        assert_eq!(links.len(), 9);

        let cli = paths.plugin_bin_dir().join("claude-memory");
        assert!(fs::symlink_metadata(&cli).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&cli).unwrap(), paths.binary("claude-memory"));
        assert_eq!(
            fs::read_link(paths.plugin_dir.join("hooks")).unwrap(),
            paths.asset("hooks")
        );
    }

    #[test]
    fn test_rebuild_twice_is_identical() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manifest = InstallManifest::standard();
        let paths = populated_root(temp.path(), &manifest);

        rebuild_plugin_dir(&paths, &manifest).unwrap();
        let first = link_targets(&paths, &manifest);
        rebuild_plugin_dir(&paths, &manifest).unwrap();
        let second = link_targets(&paths, &manifest);

        assert_eq!(first, second);
    }

    #[test]
    fn test_rebuild_drops_removed_assets() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manifest = InstallManifest::standard();
        let paths = populated_root(temp.path(), &manifest);
        rebuild_plugin_dir(&paths, &manifest).unwrap();
        // A file the user dropped into the plugin directory by hand
        fs::write(paths.plugin_dir.join("notes.txt"), "x").unwrap();

        let shrunk = manifest.without_asset("hooks.json");
        rebuild_plugin_dir(&paths, &shrunk).unwrap();

        assert!(fs::symlink_metadata(paths.plugin_dir.join("hooks.json")).is_err());
        assert!(!paths.plugin_dir.join("notes.txt").exists());
        assert!(paths.plugin_dir.join("hooks").exists());
    }

    #[test]
    fn test_inspect_reports_dangling_and_missing() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manifest = InstallManifest::standard();
        let paths = populated_root(temp.path(), &manifest);
        rebuild_plugin_dir(&paths, &manifest).unwrap();

        fs::remove_dir_all(paths.asset("skills")).unwrap();
        fs::remove_file(paths.plugin_dir.join("agents")).unwrap();

        let statuses = inspect_plugin_dir(&paths, &manifest);
        let state_of = |name: &str| {
            statuses
                .iter()
                .find(|s| s.link == paths.plugin_dir.join(name))
                .map(|s| s.state)
                .unwrap()
        };
        assert_eq!(state_of("skills"), LinkState::Dangling);
        assert_eq!(state_of("agents"), LinkState::Missing);
        assert_eq!(state_of("hooks"), LinkState::Ok);
    }

    #[test]
    fn test_occupied_link_path_is_filesystem_error() {
        let temp = tempdir().expect("Failed to create temp dir");
        let occupied = temp.path().join("hooks.json");
        fs::write(&occupied, "regular file").unwrap();

        let err = create_symlink(&temp.path().join("target"), &occupied).unwrap_err();
        assert!(err.is_filesystem());
        assert_eq!(fs::read_to_string(&occupied).unwrap(), "regular file");
    }

    #[test]
    fn test_remove_plugin_dir_absent() {
        let temp = tempdir().expect("Failed to create temp dir");
        let paths = InstallPaths::under_home(temp.path(), temp.path().join("root"));
        assert!(!remove_plugin_dir(&paths).unwrap());
    }

    #[test]
    fn test_undeletable_plugin_dir_is_filesystem_error() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manifest = InstallManifest::standard();
        let mut paths = populated_root(temp.path(), &manifest);
        // A regular file where the plugin directory's parent should be
        let blocker = temp.path().join("plugins");
        fs::write(&blocker, "not a directory").unwrap();
        paths.plugin_dir = blocker.join("claude-memory");

        let err = remove_plugin_dir(&paths).unwrap_err();
        assert!(err.is_filesystem());

        let err = rebuild_plugin_dir(&paths, &manifest).unwrap_err();
        assert!(err.is_filesystem());
        assert!(fs::symlink_metadata(paths.plugin_bin_dir()).is_err());
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
    }
}
