// Bookmark data model — Rust structs that map to the source CLI's JSON.
//
// These are the types that flow through the pipeline. They're kept separate
// from the source client so other modules can use them without caring where
// a bookmark came from (live fetch vs. cached ledger snapshot).

use serde::{Deserialize, Serialize};

/// A saved post pulled from the user's bookmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Opaque identifier, globally unique per source.
    pub id: String,
    pub text: String,
    pub author: Author,
    /// Creation timestamp as reported by the source (ISO-8601).
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Engagement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaRef>,
    /// Conversation this post belongs to. Differs from `id` for replies
    /// and later posts in a thread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_id: Option<String>,
    /// A bookmark may quote exactly one other post. The source should never
    /// produce cycles here, but traversal is depth-guarded anyway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted: Option<Box<Bookmark>>,
}

impl Bookmark {
    /// Canonical web URL for this post, built from author + id.
    pub fn source_url(&self) -> String {
        format!("https://x.com/{}/status/{}", self.author.username, self.id)
    }

    /// Whether this bookmark is a reply to another post.
    pub fn is_reply(&self) -> bool {
        self.in_reply_to_id.is_some()
    }
}

/// Post author. `username` is the handle (no leading @), `name` the
/// display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub username: String,
    pub name: String,
}

/// Engagement counters at bookmark time. All optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub retweets: u64,
    #[serde(default)]
    pub replies: u64,
}

/// Reference to an attached media item (photo, video, gif).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    #[serde(rename = "type")]
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
