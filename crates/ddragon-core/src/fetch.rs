//! Upstream HTTP access.
//!
//! Deliberately dumb: one GET per call, no retries, no caching. Non-2xx
//! statuses and transport failures are both normalized to
//! [`MirrorError::Fetch`] so callers never need to distinguish them.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::NetworkConfig;
use crate::error::{MirrorError, Result};

/// Seam between the mirror and the upstream CDN.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform exactly one HTTP GET and return the raw body.
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// reqwest-backed fetcher used in production.
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(NetworkConfig::REQUEST_TIMEOUT)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| MirrorError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MirrorError::Fetch {
                url: url.to_string(),
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::Fetch {
                url: url.to_string(),
                status: Some(status.as_u16()),
                message: format!("upstream returned {}", status),
            });
        }

        let bytes = response.bytes().await.map_err(|e| MirrorError::Fetch {
            url: url.to_string(),
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}
