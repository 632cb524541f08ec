//! Error types for cmi-core.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using cmi-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for install, upgrade and uninstall.
///
/// Every variant aborts the running operation. Host-tool registration never
/// produces one of these; see [`crate::register::RegistrationOutcome`].
#[derive(Error, Debug)]
pub enum Error {
    // Resolution errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Download errors
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    Integrity {
        url: String,
        expected: String,
        actual: String,
    },

    // Unpacking errors
    #[error("Archive error: {0}")]
    Archive(String),

    // Filesystem errors
    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Post-install check
    #[error("Verification failed: {0}")]
    Verification(String),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a fetch error
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create an archive error
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive(message.into())
    }

    /// Wrap an IO error with the path it happened on
    pub fn filesystem(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity { .. })
    }

    pub fn is_filesystem(&self) -> bool {
        matches!(self, Self::Filesystem { .. })
    }
}

/// Closure adapter for `map_err` on std::fs calls.
pub(crate) fn fs_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::filesystem(path, source)
}
