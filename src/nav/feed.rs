//! Bulk NAV feed transport
//!
//! Fetches the raw AMFI listing over HTTP, or reads it from a local
//! file when the configured source is a path (useful for tests and
//! offline runs). Parsing lives in the registry, not here.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

/// Daily bulk NAV listing for all AMFI-registered schemes
pub const AMFI_NAV_URL: &str = "https://portal.amfiindia.com/spages/NAVAll.txt";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; FundwatchBot/1.0)";

/// Source of raw bulk feed text
#[async_trait]
pub trait NavSource: Send + Sync {
    async fn fetch(&self) -> Result<String>;
}

/// Fetches the bulk feed from a URL or local file path
pub struct FeedClient {
    source: String,
    timeout: Duration,
}

impl FeedClient {
    pub fn new(source: impl Into<String>, timeout: Duration) -> Self {
        Self {
            source: source.into(),
            timeout,
        }
    }
}

#[async_trait]
impl NavSource for FeedClient {
    async fn fetch(&self) -> Result<String> {
        if !is_remote(&self.source) {
            return std::fs::read_to_string(&self.source)
                .with_context(|| format!("Failed to read NAV feed file: {}", self.source));
        }

        info!("Fetching NAV data from {}", self.source);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()?;

        let response = client
            .get(&self.source)
            .send()
            .await
            .context("Failed to fetch NAV feed")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "NAV feed returned error status: {}",
                response.status()
            ));
        }

        response.text().await.context("Failed to read NAV feed body")
    }
}

/// URLs go through reqwest, anything else is treated as a file path
pub(crate) fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
