//! Unpacking a verified release archive into the installation root.
//!
//! Only members named by the [`InstallManifest`] are written. Binaries land in
//! `<root>/bin/`, assets at `<root>/<name>`. Everything else in the tarball
//! (README, LICENSE, ...) is skipped.

use crate::error::{Error, Result, fs_err};
use crate::layout::InstallPaths;
use crate::manifest::{AssetKind, InstallManifest};
use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// What an extraction wrote
#[derive(Debug, Clone, Default)]
pub struct ExtractSummary {
    pub binaries: Vec<PathBuf>,
    pub assets: Vec<String>,
    pub files_written: usize,
    pub members_skipped: usize,
}

/// Remove any previous installation root and recreate it empty with `bin/`.
pub fn reset_install_root(paths: &InstallPaths) -> Result<()> {
    let root = &paths.install_root;
    match fs::symlink_metadata(root) {
        Ok(meta) if meta.is_dir() => {
            debug!("Removing previous installation root {}", root.display());
            fs::remove_dir_all(root).map_err(fs_err(root))?;
        }
        Ok(_) => fs::remove_file(root).map_err(fs_err(root))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::filesystem(root, e)),
    }

    let bin = paths.bin_dir();
    fs::create_dir_all(&bin).map_err(fs_err(&bin))?;
    Ok(())
}

/// Relative path of a tar member, refusing anything that could escape the root
fn member_path(raw: &Path) -> Result<PathBuf> {
    let mut clean = PathBuf::new();
    for component in raw.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => {
                return Err(Error::archive(format!(
                    "refusing unsafe archive member {}",
                    raw.display()
                )));
            }
        }
    }
    Ok(clean)
}

/// Unpack the manifest entries of a gzip'd tarball into a fresh installation root.
///
/// The caller must already have verified `archive`'s checksum.
pub fn extract(
    archive: &[u8],
    manifest: &InstallManifest,
    paths: &InstallPaths,
) -> Result<ExtractSummary> {
    reset_install_root(paths)?;

    let mut tarball = tar::Archive::new(GzDecoder::new(archive));
    let entries = tarball
        .entries()
        .map_err(|e| Error::archive(format!("unreadable archive: {}", e)))?;

    let mut summary = ExtractSummary::default();
    let mut found_binaries = BTreeSet::new();
    let mut found_assets = BTreeSet::new();

    for entry in entries {
        let mut entry = entry.map_err(|e| Error::archive(format!("corrupt archive entry: {}", e)))?;
        let raw = entry
            .path()
            .map_err(|e| Error::archive(format!("invalid member path: {}", e)))?
            .into_owned();
        let rel = member_path(&raw)?;
        let Some(top) = rel.components().next() else {
            continue;
        };
        let top = top.as_os_str().to_string_lossy().into_owned();
        let depth = rel.components().count();
        let entry_type = entry.header().entry_type();

        if manifest.has_binary(&top) {
            if depth != 1 || !entry_type.is_file() {
                return Err(Error::archive(format!(
                    "binary {} is not a regular file at the archive top level",
                    raw.display()
                )));
            }
            let dest = paths.binary(&top);
            entry.unpack(&dest).map_err(fs_err(&dest))?;
            make_executable(&dest)?;
            debug!("Installed binary {}", dest.display());
            found_binaries.insert(top);
            summary.binaries.push(dest);
            summary.files_written += 1;
            continue;
        }

        let Some(asset) = manifest.asset(&top) else {
            debug!("Skipping archive member {}", raw.display());
            summary.members_skipped += 1;
            continue;
        };

        if entry_type.is_symlink() || entry_type.is_hard_link() {
            return Err(Error::archive(format!(
                "links are not allowed in plugin assets: {}",
                raw.display()
            )));
        }
        if asset.kind == AssetKind::File && (depth != 1 || !entry_type.is_file()) {
            return Err(Error::archive(format!(
                "asset {} must be a single file",
                asset.name
            )));
        }

        let dest = paths.install_root.join(&rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(fs_err(parent))?;
        }
        entry.unpack(&dest).map_err(fs_err(&dest))?;
        if entry_type.is_file() {
            summary.files_written += 1;
        }
        found_assets.insert(top);
    }

    let missing: Vec<&str> = manifest
        .binaries
        .iter()
        .filter(|b| !found_binaries.contains(*b))
        .chain(
            manifest
                .assets
                .iter()
                .map(|a| &a.name)
                .filter(|name| !found_assets.contains(*name)),
        )
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(Error::archive(format!(
            "archive is missing manifest entries: {}",
            missing.join(", ")
        )));
    }

    summary.assets = manifest.assets.iter().map(|a| a.name.clone()).collect();
    info!(
        "Extracted {} files into {} ({} members skipped)",
        summary.files_written,
        paths.install_root.display(),
        summary.members_skipped
    );
    Ok(summary)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(fs_err(path))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
