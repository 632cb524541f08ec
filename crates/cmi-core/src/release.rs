//! Release channel: which archive to download for which target.
//!
//! A channel is one version plus a lookup table from [`Target`] to an
//! [`ArtifactDescriptor`]. A missing key is the only way resolution fails.

use crate::error::{Error, Result};
use crate::integrity;
use crate::platform::{Arch, Platform, Target};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where GitHub release assets for claude-memory are published
pub const DEFAULT_RELEASE_BASE: &str =
    "https://github.com/mfenderov/claude-memory/releases/download";

/// Version shipped by the built-in channel
pub const BUILTIN_VERSION: &str = "1.0.1";

const BUILTIN_CHECKSUMS: [(Platform, Arch, &str); 4] = [
    (
        Platform::Macos,
        Arch::Amd64,
        "8797ebdf565fc8d0d75f2cf37dfc5925cf6841e0e108db1aa6fa4de69e0c84a1",
    ),
    (
        Platform::Macos,
        Arch::Arm64,
        "b5823f2e5dbc38fd9d03c7ef9c8677c2e7f1a2a479f8276d641920bc251afd73",
    ),
    (
        Platform::Linux,
        Arch::Amd64,
        "20ecd3dbcdd7711ca77bd61854ae62ec16389ba4c45d0140daa4f766ff07c57e",
    ),
    (
        Platform::Linux,
        Arch::Arm64,
        "e798e1e3e9a254ef8049171d4231630f94449d507e5fb4fedc770ac14a379f19",
    ),
];

/// Download location and expected SHA-256 of one release archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    pub url: String,
    pub sha256: String,
}

/// Flat artifact entry as written in configuration files.
///
/// `url` may be omitted, in which case the standard release URL is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSpec {
    pub platform: Platform,
    pub arch: Arch,
    #[serde(default)]
    pub url: Option<String>,
    pub sha256: String,
}

/// One version of the release, addressable per target
#[derive(Debug, Clone)]
pub struct ReleaseChannel {
    version: String,
    artifacts: BTreeMap<Target, ArtifactDescriptor>,
}

/// Standard artifact file name for a version and target
pub fn artifact_file_name(version: &str, target: Target) -> String {
    format!(
        "claude-memory_{}_{}_{}.tar.gz",
        version,
        target.platform.artifact_name(),
        target.arch.artifact_name()
    )
}

/// Standard download URL for a version and target under `base`
pub fn artifact_url(base: &str, version: &str, target: Target) -> String {
    format!(
        "{}/v{}/{}",
        base.trim_end_matches('/'),
        version,
        artifact_file_name(version, target)
    )
}

impl ReleaseChannel {
    /// Build an empty channel for a version
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            artifacts: BTreeMap::new(),
        }
    }

    /// The channel compiled into this binary
    pub fn builtin() -> Self {
        let mut channel = Self::new(BUILTIN_VERSION);
        for (platform, arch, sha256) in BUILTIN_CHECKSUMS {
            let target = Target::new(platform, arch);
            channel.artifacts.insert(
                target,
                ArtifactDescriptor {
                    url: artifact_url(DEFAULT_RELEASE_BASE, BUILTIN_VERSION, target),
                    sha256: sha256.to_string(),
                },
            );
        }
        channel
    }

    /// Build a channel from configuration entries.
    ///
    /// Rejects duplicate targets and checksums that are not 64 hex digits.
    pub fn from_specs(
        version: impl Into<String>,
        base_url: &str,
        specs: &[ArtifactSpec],
    ) -> Result<Self> {
        let mut channel = Self::new(version);
        for spec in specs {
            let target = Target::new(spec.platform, spec.arch);
            let url = spec
                .url
                .clone()
                .unwrap_or_else(|| artifact_url(base_url, &channel.version, target));
            channel.insert(
                target,
                ArtifactDescriptor {
                    url,
                    sha256: spec.sha256.clone(),
                },
            )?;
        }
        Ok(channel)
    }

    /// Add one descriptor. A target may appear only once.
    pub fn insert(&mut self, target: Target, descriptor: ArtifactDescriptor) -> Result<()> {
        integrity::parse_digest(&descriptor.sha256)?;
        if self.artifacts.contains_key(&target) {
            return Err(Error::configuration(format!(
                "duplicate artifact for {} in release {}",
                target, self.version
            )));
        }
        self.artifacts.insert(target, descriptor);
        Ok(())
    }

    pub fn with_artifact(mut self, target: Target, descriptor: ArtifactDescriptor) -> Result<Self> {
        self.insert(target, descriptor)?;
        Ok(self)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Look up the descriptor for a target
    pub fn resolve(&self, target: Target) -> Result<&ArtifactDescriptor> {
        self.artifacts.get(&target).ok_or_else(|| {
            Error::configuration(format!(
                "no release artifact for {} in version {}",
                target, self.version
            ))
        })
    }

    /// Iterate over all (target, descriptor) pairs in table order
    pub fn artifacts(&self) -> impl Iterator<Item = (&Target, &ArtifactDescriptor)> {
        self.artifacts.iter()
    }
}
