// Bookmark source — the process boundary to wherever bookmarks live.

pub mod cli;
pub mod models;

use anyhow::Result;
use async_trait::async_trait;

use models::Bookmark;

/// The bookmark source contract.
///
/// `fetch_recent` failure is fatal to a run (there is nothing to process).
/// `read_bookmark` and `fetch_thread` are used inside best-effort enrichment
/// and reprocessing paths — callers treat their errors as soft.
#[async_trait]
pub trait BookmarkSource: Send + Sync {
    /// Fetch the N most recent bookmarks, newest first.
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<Bookmark>>;

    /// Read a single bookmark by id. Ok(None) when the source no longer
    /// has it (deleted post, expired bookmark).
    async fn read_bookmark(&self, id: &str) -> Result<Option<Bookmark>>;

    /// Fetch the full conversation a post belongs to, in thread order.
    async fn fetch_thread(&self, conversation_id: &str) -> Result<Vec<Bookmark>>;
}
