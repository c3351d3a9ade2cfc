// Enrichment data model — what a bookmark looks like after enrichment.
//
// Separate from the fetchers so the agent/routing layers can consume these
// types without depending on reqwest or scraper.

use serde::{Deserialize, Serialize};

use crate::source::models::Bookmark;

/// What kind of content a resolved URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkCategory {
    Article,
    Youtube,
    Twitter,
    Image,
    Unknown,
}

impl LinkCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkCategory::Article => "article",
            LinkCategory::Youtube => "youtube",
            LinkCategory::Twitter => "twitter",
            LinkCategory::Image => "image",
            LinkCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything learned about one discovered URL.
///
/// Absent content fields are valid (a platform or image link carries no
/// content). `error` is set only when a fetch actually failed — expected
/// absence (no transcript available) leaves it empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInfo {
    /// Final URL after shortener resolution.
    pub url: String,
    pub category: LinkCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Fetched content, already truncated to the configured limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LinkInfo {
    /// A bare LinkInfo with just a URL and category — the starting point
    /// for every per-category fetch.
    pub fn bare(url: &str, category: LinkCategory) -> Self {
        Self {
            url: url.to_string(),
            category,
            title: None,
            author: None,
            published: None,
            duration: None,
            content: None,
            error: None,
        }
    }
}

/// Derived flags describing a bookmark at a glance. Computed from the
/// enrichment output, never fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkMetadata {
    pub has_links: bool,
    pub has_media: bool,
    pub is_thread: bool,
    pub is_quote: bool,
    /// Distinct link categories present, in discovery order.
    pub link_categories: Vec<LinkCategory>,
}

/// A bookmark plus everything the enrichment pipeline learned about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedBookmark {
    pub bookmark: Bookmark,
    /// One entry per discovered URL, in discovery order. Duplicate URLs in
    /// the text each get their own entry.
    pub links: Vec<LinkInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_context: Option<String>,
    pub metadata: BookmarkMetadata,
    pub source_url: String,
}

impl EnrichedBookmark {
    /// The degraded form used when enrichment fails wholesale: the bare
    /// bookmark with empty links, no context, and all-false metadata.
    /// A failed enrichment must never drop the bookmark from the run.
    pub fn minimal(bookmark: Bookmark) -> Self {
        let source_url = bookmark.source_url();
        Self {
            bookmark,
            links: Vec::new(),
            thread_context: None,
            quoted_context: None,
            metadata: BookmarkMetadata::default(),
            source_url,
        }
    }
}

/// Tagged outcome of a soft-failing fetch.
///
/// Expected absence (transcripts disabled, no transcript published, page
/// with no extractable article) is `Absent`, not an error — only genuine
/// failures carry a message, and that message ends up in `LinkInfo::error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Content(T),
    Absent,
    Failed(String),
}
