// Subprocess bookmark source — spawns a configured CLI and parses its JSON.
//
// The source command is expected to support three invocations:
//   <cmd> bookmarks --limit N --json   -> JSON array of bookmarks
//   <cmd> read <id> --json             -> single bookmark object
//   <cmd> thread <id> --json           -> JSON array of bookmarks
// A non-zero exit status means failure; stderr carries the reason.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::process::Command;
use tracing::debug;

use super::models::Bookmark;
use super::BookmarkSource;

/// Bookmark source backed by an external CLI (e.g. a bird-style client).
pub struct CliBookmarkSource {
    command: String,
}

impl CliBookmarkSource {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }

    /// Run the source command with the given args and parse stdout as JSON.
    async fn invoke<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        debug!(command = %self.command, ?args, "Invoking bookmark source");

        let output = Command::new(&self.command)
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to spawn bookmark source `{}`", self.command))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Bookmark source exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }

        serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Failed to parse bookmark source output for {args:?}"))
    }
}

#[async_trait]
impl BookmarkSource for CliBookmarkSource {
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<Bookmark>> {
        let limit = limit.to_string();
        self.invoke(&["bookmarks", "--limit", &limit, "--json"])
            .await
            .context("Failed to fetch recent bookmarks")
    }

    async fn read_bookmark(&self, id: &str) -> Result<Option<Bookmark>> {
        // A missing post is reported as failure by most source CLIs; map
        // that to Ok(None) so reprocessing can fall back to the cached
        // snapshot instead of aborting.
        match self.invoke::<Bookmark>(&["read", id, "--json"]).await {
            Ok(bookmark) => Ok(Some(bookmark)),
            Err(e) => {
                debug!(id = id, error = %e, "read_bookmark failed, treating as absent");
                Ok(None)
            }
        }
    }

    async fn fetch_thread(&self, conversation_id: &str) -> Result<Vec<Bookmark>> {
        self.invoke(&["thread", conversation_id, "--json"])
            .await
            .with_context(|| format!("Failed to fetch thread {conversation_id}"))
    }
}
