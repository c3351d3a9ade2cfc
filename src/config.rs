use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// All secrets and endpoints come from env vars (never hardcoded). The .env
/// file is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Command spawned to talk to the bookmark source (fetch/read/thread).
    pub source_command: String,
    /// Command spawned to run the decision-making agent.
    pub agent_command: String,
    /// Path to the persisted processing ledger (JSON document).
    pub ledger_path: PathBuf,
    /// Timeout for any single outbound HTTP call (redirects, articles,
    /// transcripts, webhook sends), in ms.
    pub fetch_timeout_ms: u64,
    /// Maximum length of fetched content attached to a link, in characters.
    pub max_content_length: usize,
    /// Attempt generic article extraction for unclassified links.
    pub fetch_articles: bool,
    /// Fetch transcripts for video links.
    pub fetch_transcripts: bool,
    /// Expand likely threads into a full conversation transcript.
    pub expand_threads: bool,
    /// Transcript API endpoint. Empty means transcript fetching is disabled
    /// even when fetch_transcripts is set.
    pub transcript_api_url: String,
    /// Webhook endpoint for the task-manager destination.
    pub tasks_webhook_url: Option<String>,
    /// Webhook endpoint for the read-later destination.
    pub readlater_webhook_url: Option<String>,
    /// Webhook endpoint for the reference-store destination.
    pub reference_webhook_url: Option<String>,
    /// Default age threshold for `magpie prune`, in days.
    pub prune_max_age_days: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the source and agent commands, which
    /// are required for anything beyond `list`, `prune`, and `status`.
    pub fn load() -> Result<Self> {
        Ok(Self {
            source_command: env::var("MAGPIE_SOURCE_CMD").unwrap_or_default(),
            agent_command: env::var("MAGPIE_AGENT_CMD").unwrap_or_default(),
            ledger_path: env::var("MAGPIE_LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_ledger_path()),
            fetch_timeout_ms: env::var("MAGPIE_FETCH_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            max_content_length: env::var("MAGPIE_MAX_CONTENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2_000),
            fetch_articles: env_flag("MAGPIE_FETCH_ARTICLES", true),
            fetch_transcripts: env_flag("MAGPIE_FETCH_TRANSCRIPTS", true),
            expand_threads: env_flag("MAGPIE_EXPAND_THREADS", true),
            transcript_api_url: env::var("TRANSCRIPT_API_URL").unwrap_or_default(),
            tasks_webhook_url: env::var("TASKS_WEBHOOK_URL").ok(),
            readlater_webhook_url: env::var("READLATER_WEBHOOK_URL").ok(),
            reference_webhook_url: env::var("REFERENCE_WEBHOOK_URL").ok(),
            prune_max_age_days: env::var("MAGPIE_PRUNE_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(90),
        })
    }

    /// Check that the bookmark source command is configured.
    /// Call this before any operation that talks to the source.
    pub fn require_source(&self) -> Result<()> {
        if self.source_command.is_empty() {
            anyhow::bail!(
                "MAGPIE_SOURCE_CMD not set. Add it to your .env file.\n\
                 It should name a CLI that emits bookmark JSON (see README)."
            );
        }
        Ok(())
    }

    /// Check that the decision agent command is configured.
    /// Call this before any operation that needs the agent's verdict.
    pub fn require_agent(&self) -> Result<()> {
        if self.agent_command.is_empty() {
            anyhow::bail!(
                "MAGPIE_AGENT_CMD not set. Add it to your .env file.\n\
                 It should name a CLI that accepts a prompt on stdin and\n\
                 emits a tool-call JSON document on stdout."
            );
        }
        Ok(())
    }

    /// Whether transcript fetching is actually usable: the flag must be on
    /// and an endpoint must be configured.
    pub fn transcripts_enabled(&self) -> bool {
        self.fetch_transcripts && !self.transcript_api_url.is_empty()
    }
}

/// Parse a boolean env flag ("1"/"true"/"0"/"false"), defaulting when unset.
fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name).as_deref() {
        Ok("1") | Ok("true") => true,
        Ok("0") | Ok("false") => false,
        _ => default,
    }
}

/// Default ledger location: ~/.local/share/magpie/processed.json
/// (falls back to the current directory when no home is available).
fn default_ledger_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("magpie"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("processed.json")
}
