// Shortener redirect resolution — the swap-ready abstraction.
//
// Only known shortener hosts get a resolution pass (a lightweight no-body
// request that follows redirects). Resolution never fails a link: on
// timeout or any network error the original URL is used as-is.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Resolves a shortened URL to its final destination.
#[async_trait]
pub trait UrlResolver: Send + Sync {
    /// Resolve `url`, falling back to the input on any failure.
    async fn resolve(&self, url: &str) -> String;
}

/// Resolver that issues a HEAD request and follows redirects.
pub struct HttpRedirectResolver {
    client: reqwest::Client,
}

impl HttpRedirectResolver {
    /// Create a resolver with the given per-request timeout.
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::enrich::USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("Failed to build redirect resolver client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl UrlResolver for HttpRedirectResolver {
    async fn resolve(&self, url: &str) -> String {
        match self.client.head(url).send().await {
            Ok(response) => response.url().to_string(),
            Err(e) => {
                // Expected for dead shorteners and slow hops — keep the
                // original URL and move on.
                debug!(url = url, error = %e, "Redirect resolution failed, using original");
                url.to_string()
            }
        }
    }
}
