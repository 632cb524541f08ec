//! Platform and architecture targets.
//!
//! Releases are published for exactly two operating systems and two CPU
//! architectures. Anything else is rejected at parse time so an unsupported
//! combination never reaches the network.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating system family of a release artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "darwin")]
    Macos,
    Linux,
}

/// CPU architecture of a release artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    #[serde(alias = "x86_64")]
    Amd64,
    #[serde(alias = "aarch64")]
    Arm64,
}

/// A (platform, architecture) pair, the key of the release table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Target {
    pub platform: Platform,
    pub arch: Arch,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Macos, Platform::Linux];

    /// Name used in release artifact file names
    pub fn artifact_name(self) -> &'static str {
        match self {
            Platform::Macos => "darwin",
            Platform::Linux => "linux",
        }
    }
}

impl Arch {
    pub const ALL: [Arch; 2] = [Arch::Amd64, Arch::Arm64];

    /// Name used in release artifact file names
    pub fn artifact_name(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "osx" => Ok(Platform::Macos),
            "linux" => Ok(Platform::Linux),
            other => Err(Error::configuration(format!(
                "unsupported platform '{}' (expected macos or linux)",
                other
            ))),
        }
    }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amd64" | "x86_64" | "intel" => Ok(Arch::Amd64),
            "arm64" | "aarch64" | "arm" => Ok(Arch::Arm64),
            other => Err(Error::configuration(format!(
                "unsupported architecture '{}' (expected amd64 or arm64)",
                other
            ))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Macos => "macos",
            Platform::Linux => "linux",
        })
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.artifact_name())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.platform, self.arch)
    }
}

impl Target {
    pub fn new(platform: Platform, arch: Arch) -> Self {
        Self { platform, arch }
    }

    /// Parse a target from user-supplied platform and architecture names
    pub fn parse(platform: &str, arch: &str) -> Result<Self> {
        Ok(Self::new(platform.parse()?, arch.parse()?))
    }

    /// Detect the target of the running host
    pub fn host() -> Result<Self> {
        Self::parse(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Resolve a target, falling back to the host for whichever half is missing
    pub fn resolve(platform: Option<&str>, arch: Option<&str>) -> Result<Self> {
        let platform = match platform {
            Some(p) => p.parse()?,
            None => Platform::from_str(std::env::consts::OS)?,
        };
        let arch = match arch {
            Some(a) => a.parse()?,
            None => Arch::from_str(std::env::consts::ARCH)?,
        };
        Ok(Self::new(platform, arch))
    }

    /// Every target a release is published for
    pub fn all() -> impl Iterator<Item = Target> {
        Platform::ALL
            .into_iter()
            .flat_map(|p| Arch::ALL.into_iter().map(move |a| Target::new(p, a)))
    }
}
