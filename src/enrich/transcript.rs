// Video transcript fetching via an external transcript API.
//
// "No transcript published" and "transcripts disabled" are expected
// outcomes, not failures — they come back as Absent with no error on the
// link. Only real API trouble lands in the error field.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::models::Fetched;

/// Fetches a transcript for a video id.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Fetched<String>;
}

/// Transcript fetcher backed by a configured HTTP endpoint.
///
/// Expects `GET {base}/transcript?videoId=<id>` to return
/// `{"transcript": "..."}`, 404 when the video has no transcript.
pub struct HttpTranscriptFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranscriptFetcher {
    /// Create a fetcher with the given per-request timeout.
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::enrich::USER_AGENT)
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("Failed to build transcript client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_inner(&self, video_id: &str) -> Result<Fetched<String>> {
        let url = format!("{}/transcript", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("videoId", video_id)])
            .send()
            .await
            .context("Transcript request failed")?;

        if response.status() == StatusCode::NOT_FOUND {
            // No transcript published for this video — expected absence.
            debug!(video_id = video_id, "No transcript available");
            return Ok(Fetched::Absent);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Transcript API returned {status}: {body}");
        }

        let parsed: TranscriptResponse = response
            .json()
            .await
            .context("Failed to parse transcript response")?;

        match parsed.transcript {
            Some(t) if !t.trim().is_empty() => Ok(Fetched::Content(t)),
            _ => Ok(Fetched::Absent),
        }
    }
}

#[async_trait]
impl TranscriptFetcher for HttpTranscriptFetcher {
    async fn fetch(&self, video_id: &str) -> Fetched<String> {
        match self.fetch_inner(video_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(video_id = video_id, error = %e, "Transcript fetch failed");
                Fetched::Failed(format!("{e:#}"))
            }
        }
    }
}

#[derive(Deserialize)]
struct TranscriptResponse {
    transcript: Option<String>,
}
