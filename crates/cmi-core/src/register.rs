//! Best-effort registration of the MCP server with the host tool.
//!
//! Runs `<host> mcp add <name> --scope <scope> --transport <transport> -- <server>`.
//! The outcome is reported, never raised: an install succeeds whether or not
//! the host tool was available.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSettings {
    /// Attempt registration at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Host CLI that owns MCP server registration
    #[serde(default = "default_host_tool")]
    pub host_tool: String,

    /// Name the server is registered under
    #[serde(default = "default_server_name")]
    pub server_name: String,

    #[serde(default = "default_scope")]
    pub scope: String,

    #[serde(default = "default_transport")]
    pub transport: String,
}

fn default_true() -> bool {
    true
}

fn default_host_tool() -> String {
    "claude".to_string()
}

fn default_server_name() -> String {
    "mark42".to_string()
}

fn default_scope() -> String {
    "user".to_string()
}

fn default_transport() -> String {
    "stdio".to_string()
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            host_tool: default_host_tool(),
            server_name: default_server_name(),
            scope: default_scope(),
            transport: default_transport(),
        }
    }
}

/// Result of the registration step, kept apart from install success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    Registered { host_tool: PathBuf },
    Skipped { manual_command: String },
    ToolMissing { host_tool: String, manual_command: String },
    Failed { reason: String, manual_command: String },
}

impl RegistrationOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }

    /// Command the user should run by hand, if registration did not happen
    pub fn manual_command(&self) -> Option<&str> {
        match self {
            Self::Registered { .. } => None,
            Self::Skipped { manual_command }
            | Self::ToolMissing { manual_command, .. }
            | Self::Failed { manual_command, .. } => Some(manual_command),
        }
    }
}

impl RegistrationSettings {
    fn args(&self, server_binary: &Path) -> Vec<String> {
        vec![
            "mcp".to_string(),
            "add".to_string(),
            self.server_name.clone(),
            "--scope".to_string(),
            self.scope.clone(),
            "--transport".to_string(),
            self.transport.clone(),
            "--".to_string(),
            server_binary.display().to_string(),
        ]
    }

    /// Shell-ready form of the registration command, each argument quoted as needed
    pub fn manual_command(&self, server_binary: &Path) -> String {
        let mut parts = vec![self.host_tool.clone()];
        parts.extend(self.args(server_binary));
        shell_words::join(parts)
    }

    /// Register `server_binary` with the host tool, swallowing every failure.
    pub fn register(&self, server_binary: &Path) -> RegistrationOutcome {
        let manual_command = self.manual_command(server_binary);

        if !self.enabled {
            debug!("MCP registration disabled");
            return RegistrationOutcome::Skipped { manual_command };
        }

        let host_tool = match which::which(&self.host_tool) {
            Ok(path) => path,
            Err(_) => {
                info!("{} not found on PATH; skipping MCP registration", self.host_tool);
                return RegistrationOutcome::ToolMissing {
                    host_tool: self.host_tool.clone(),
                    manual_command,
                };
            }
        };

        debug!("Running {}", manual_command);
        match Command::new(&host_tool).args(self.args(server_binary)).output() {
            Ok(output) if output.status.success() => {
                info!("Registered MCP server {}", self.server_name);
                RegistrationOutcome::Registered { host_tool }
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                warn!("MCP registration failed: {}", stderr);
                RegistrationOutcome::Failed {
                    reason: if stderr.is_empty() {
                        format!("{} exited with {}", self.host_tool, output.status)
                    } else {
                        stderr
                    },
                    manual_command,
                }
            }
            Err(e) => {
                warn!("Could not run {}: {}", host_tool.display(), e);
                RegistrationOutcome::Failed {
                    reason: e.to_string(),
                    manual_command,
                }
            }
        }
    }
}
