//! Tarball fixtures shared by unit tests.

use crate::manifest::{AssetKind, InstallManifest};
use flate2::Compression;
use flate2::write::GzEncoder;

pub(crate) struct ArchiveBuilder {
    builder: tar::Builder<GzEncoder<Vec<u8>>>,
}

impl ArchiveBuilder {
    pub(crate) fn new() -> Self {
        Self {
            builder: tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default())),
        }
    }

    pub(crate) fn file(mut self, path: &str, content: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        self.builder
            .append_data(&mut header, path, content)
            .expect("append file");
        self
    }

    /// Append a member whose name bypasses tar's own path sanitizing
    pub(crate) fn raw_file(mut self, path: &str, content: &[u8]) -> Self {
        let mut header = tar::Header::new_old();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.as_old_mut().name[..path.len()].copy_from_slice(path.as_bytes());
        header.set_cksum();
        self.builder.append(&header, content).expect("append raw");
        self
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.builder
            .into_inner()
            .expect("finish tar")
            .finish()
            .expect("finish gzip")
    }
}

/// A release tarball containing every entry of `manifest` plus a README
pub(crate) fn release_archive(manifest: &InstallManifest) -> Vec<u8> {
    let mut archive = ArchiveBuilder::new().file("README.md", b"# claude-memory\n");
    for binary in &manifest.binaries {
        let script = format!("#!/bin/sh\necho \"{} 1.0.4\"\n", binary);
        archive = archive.file(binary, script.as_bytes());
    }
    for asset in &manifest.assets {
        archive = match asset.kind {
            AssetKind::File => archive.file(&asset.name, b"{}\n"),
            AssetKind::Directory => {
                let inner = match asset.name.as_str() {
                    "agents" => "memory-agent.md",
                    ".claude-plugin" => "plugin.json",
                    _ => "README.md",
                };
                archive.file(&format!("{}/{}", asset.name, inner), b"content\n")
            }
        };
    }
    archive.finish()
}
