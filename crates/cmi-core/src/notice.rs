//! Post-install notice shown to the user.
//!
//! The text states that the memory store is left alone. It must never claim
//! the store was created, migrated or otherwise modified.

use crate::layout::InstallPaths;
use crate::manifest::CLI_BINARY;
use crate::register::RegistrationOutcome;
use std::fmt::Write;
use std::path::Path;

const RULE: &str = "══════════════════════════════════════════════════════════════";

/// Render the notice for a finished install or upgrade
pub fn render(paths: &InstallPaths, server_name: &str, registration: &RegistrationOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Claude Memory plugin installed!");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "YOUR MEMORY IS SAFE");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out);
    let _ = writeln!(out, "Database location: {}", paths.memory_store.display());
    let _ = writeln!(out);
    let _ = writeln!(out, "This file contains YOUR knowledge graph and is NEVER touched by");
    let _ = writeln!(out, "install, upgrade, or uninstall. Your memories persist.");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out);
    let _ = writeln!(out, "Plugin location: {}", paths.plugin_dir.display());
    let _ = writeln!(out);
    let _ = writeln!(out, "To activate:");
    let _ = writeln!(out, "  1. Restart Claude Code");
    match registration {
        RegistrationOutcome::Registered { .. } => {
            let _ = writeln!(
                out,
                "  2. The MCP server \"{}\" will start automatically",
                server_name
            );
        }
        other => {
            let _ = writeln!(out, "  2. Register the MCP server \"{}\":", server_name);
            if let Some(command) = other.manual_command().filter(|c| !c.is_empty()) {
                let _ = writeln!(out, "       {}", command);
            }
        }
    }
    let _ = writeln!(out, "  3. Hooks will fire on SessionStart, PostToolUse, Stop");
    let _ = writeln!(out);
    let _ = writeln!(out, "Available commands: /init, /status, /sync, /calibrate");
    let _ = writeln!(out);
    let cli = quote_path(&paths.binary(CLI_BINARY));
    let _ = writeln!(out, "Verify installation:");
    let _ = writeln!(out, "  {} version", cli);
    let _ = writeln!(out, "  {} stats", cli);
    let _ = writeln!(out);
    let _ = writeln!(out, "Backup recommendation:");
    let store = paths.memory_store.to_string_lossy();
    let _ = writeln!(
        out,
        "  cp {} {}",
        shell_words::quote(&store),
        shell_words::quote(&format!("{}.backup", store))
    );
    out
}

/// Path as a single shell word
pub fn quote_path(path: &Path) -> String {
    shell_words::quote(&path.to_string_lossy()).into_owned()
}
