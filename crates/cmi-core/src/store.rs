//! The user memory store.
//!
//! The store file belongs to the memory engine. The installer only ever
//! creates its parent directory and never opens, writes or removes the file.

use crate::error::{Result, fs_err};
use crate::layout::InstallPaths;
use std::fs;
use tracing::debug;

/// Create the store's parent directory if absent. Returns true if it was created.
pub fn ensure_store_parent(paths: &InstallPaths) -> Result<bool> {
    let Some(parent) = paths.memory_store_parent() else {
        return Ok(false);
    };
    if parent.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(parent).map_err(fs_err(parent))?;
    debug!("Created memory store directory {}", parent.display());
    Ok(true)
}

/// Whether the store's parent directory exists
pub fn store_parent_present(paths: &InstallPaths) -> bool {
    paths.memory_store_parent().is_some_and(|parent| parent.is_dir())
}

/// Whether a store file exists. Metadata only, the file is never opened.
pub fn store_present(paths: &InstallPaths) -> bool {
    fs::symlink_metadata(&paths.memory_store).is_ok()
}
