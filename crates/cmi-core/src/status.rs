//! Read-only inspection of an installation.

use crate::layout::InstallPaths;
use crate::manifest::InstallManifest;
use crate::plugin::{self, LinkState, LinkStatus};
use crate::receipt::InstallReceipt;
use crate::register::RegistrationSettings;
use crate::store;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct BinaryStatus {
    pub name: String,
    pub path: PathBuf,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstallStatus {
    pub receipt: Option<InstallReceipt>,
    pub receipt_error: Option<String>,
    pub binaries: Vec<BinaryStatus>,
    pub links: Vec<LinkStatus>,
    pub memory_store: PathBuf,
    pub memory_store_present: bool,
    pub host_tool: Option<PathBuf>,
}

impl InstallStatus {
    /// Gather status without modifying anything on disk
    pub fn inspect(
        paths: &InstallPaths,
        manifest: &InstallManifest,
        registration: &RegistrationSettings,
    ) -> Self {
        let (receipt, receipt_error) = match InstallReceipt::load(paths) {
            Ok(receipt) => (receipt, None),
            Err(e) => (None, Some(e.to_string())),
        };

        let binaries = manifest
            .binaries
            .iter()
            .map(|name| {
                let path = paths.binary(name);
                BinaryStatus {
                    name: name.clone(),
                    present: path.is_file(),
                    path,
                }
            })
            .collect();

        Self {
            receipt,
            receipt_error,
            binaries,
            links: plugin::inspect_plugin_dir(paths, manifest),
            memory_store: paths.memory_store.clone(),
            memory_store_present: store::store_present(paths),
            host_tool: which::which(&registration.host_tool).ok(),
        }
    }

    pub fn is_installed(&self) -> bool {
        self.receipt.is_some() && self.binaries.iter().all(|b| b.present)
    }

    /// Human-readable problems, empty when the install is healthy
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if let Some(e) = &self.receipt_error {
            issues.push(e.clone());
        } else if self.receipt.is_none() {
            issues.push("claude-memory is not installed".to_string());
        }
        for binary in self.binaries.iter().filter(|b| !b.present) {
            issues.push(format!("missing binary {}", binary.path.display()));
        }
        for link in &self.links {
            let problem = match link.state {
                LinkState::Ok => continue,
                LinkState::Dangling => "dangling link",
                LinkState::Foreign => "link points elsewhere",
                LinkState::NotALink => "not a symlink",
                LinkState::Missing => "missing link",
            };
            issues.push(format!("{}: {}", problem, link.link.display()));
        }
        issues
    }
}
