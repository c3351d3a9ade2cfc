// Destination collaborators — uniform "send" contract.
//
// Every destination looks the same to the gateway: a name, a configured
// check, and a send that reports success/message/error. What the
// destination actually does (task manager, read-later queue, reference
// store) is its own business.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Outcome of one destination send.
#[derive(Debug, Clone)]
pub struct SendResult {
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
}

impl SendResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.into()),
        }
    }
}

/// A downstream sink for routed actions.
#[async_trait]
pub trait Destination: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this destination has what it needs (endpoint, credentials).
    /// The gateway refuses to dispatch to an unconfigured destination.
    fn is_configured(&self) -> bool;

    /// Deliver a validated payload. Err is a transport failure; a rejected
    /// delivery comes back as a non-success SendResult.
    async fn send(&self, payload: &serde_json::Value) -> Result<SendResult>;
}

/// Destination that POSTs the payload to a configured webhook URL.
pub struct WebhookDestination {
    name: String,
    url: Option<String>,
    client: reqwest::Client,
    timeout: Duration,
}

impl WebhookDestination {
    /// Create a destination with the given per-send timeout. A hung
    /// webhook must not stall the sequential run.
    pub fn new(name: &str, url: Option<String>, timeout_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            url,
            client: reqwest::Client::new(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

#[async_trait]
impl Destination for WebhookDestination {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    async fn send(&self, payload: &serde_json::Value) -> Result<SendResult> {
        let url = self
            .url
            .as_deref()
            .with_context(|| format!("Destination `{}` has no webhook URL", self.name))?;

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Webhook request to `{}` failed", self.name))?;

        if response.status().is_success() {
            Ok(SendResult::ok(format!("sent to {}", self.name)))
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Ok(SendResult::failed(
                format!("{} rejected the payload", self.name),
                format!("webhook returned {status}: {body}"),
            ))
        }
    }
}
