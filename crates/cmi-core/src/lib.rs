//! cmi-core - Core library for the claude-memory installer
//!
//! Installs a pre-built claude-memory release and wires it up for the plugin host:
//!
//! - **platform** / **release**: target resolution and the per-target artifact table
//! - **fetch** / **integrity**: archive download and SHA-256 verification
//! - **archive**: extraction of manifest entries into the installation root
//! - **plugin**: the symlink farm scanned by the plugin host
//! - **store**: the user memory store, which is never touched
//! - **register**: best-effort MCP server registration
//! - **install**: the install / upgrade / uninstall procedure

pub mod archive;
pub mod error;
pub mod fetch;
pub mod install;
pub mod integrity;
pub mod layout;
pub mod manifest;
pub mod notice;
pub mod platform;
pub mod plugin;
pub mod receipt;
pub mod register;
pub mod release;
pub mod status;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use error::{Error, Result};
pub use fetch::{Fetcher, FileFetcher, HttpFetcher, OfflineFetcher};
pub use install::{InstallReport, Installer, UninstallOptions, UninstallReport};
pub use layout::InstallPaths;
pub use manifest::InstallManifest;
pub use platform::{Arch, Platform, Target};
pub use register::{RegistrationOutcome, RegistrationSettings};
pub use release::{ArtifactDescriptor, ArtifactSpec, ReleaseChannel};
pub use status::InstallStatus;
