//! Release archive download.
//!
//! The [`Fetcher`] trait is the single network seam of the installer. The
//! HTTP implementation is used by default; [`FileFetcher`] serves an archive
//! already on disk (offline installs), still subject to checksum verification.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Default request timeout for archive downloads
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Return the full archive body found at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP(S) fetcher backed by reqwest
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concat!("cmi/", env!("CARGO_PKG_VERSION")),
        )
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!("Downloading {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))?
            .to_vec();

        debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// Serves a local archive in place of the release URL
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!("Using local archive {} in place of {}", self.path.display(), url);
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::fetch(self.path.display().to_string(), e.to_string()))
    }
}

/// Refuses every download, for operations that work on the local install only
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

#[async_trait]
impl Fetcher for OfflineFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        Err(Error::fetch(url, "downloads are disabled for this operation"))
    }
}
