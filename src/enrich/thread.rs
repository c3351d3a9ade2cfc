// Thread and quote context — the non-link half of enrichment.
//
// Thread expansion is a soft concern: a failed or single-post conversation
// fetch just means no thread context, never an error on the bookmark.

use std::sync::OnceLock;

use regex_lite::Regex;
use tracing::debug;

use crate::source::models::Bookmark;
use crate::source::BookmarkSource;

/// Nested quotes deeper than this are cut off. The source should never
/// produce cycles, but we don't trust external data to be acyclic.
const MAX_QUOTE_DEPTH: usize = 3;

fn counter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "1/7"-style thread counters
    RE.get_or_init(|| Regex::new(r"\b\d+/\d+\b").expect("counter regex"))
}

/// Heuristic: is this bookmark probably part of a thread?
///
/// True when it's a reply, when its conversation id differs from its own
/// id, or when the text carries a thread indicator (an "i/n" counter,
/// "thread:", the thread emoji, or "a thread").
pub fn is_likely_thread(bookmark: &Bookmark) -> bool {
    if bookmark.is_reply() {
        return true;
    }
    if let Some(conv) = &bookmark.conversation_id {
        if *conv != bookmark.id {
            return true;
        }
    }
    has_thread_indicator(&bookmark.text)
}

/// Text-only thread indicator check (exposed for tests).
pub fn has_thread_indicator(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("thread:")
        || lower.contains("a thread")
        || text.contains('\u{1F9F5}')
        || counter_regex().is_match(text)
}

/// Fetch the conversation and flatten it into a transcript.
///
/// Returns None for a failed fetch or a conversation of one post — a
/// single-item "thread" adds nothing over the bookmark text itself.
pub async fn build_thread_context(
    source: &dyn BookmarkSource,
    bookmark: &Bookmark,
) -> Option<String> {
    let conversation_id = bookmark
        .conversation_id
        .as_deref()
        .unwrap_or(&bookmark.id);

    let posts = match source.fetch_thread(conversation_id).await {
        Ok(posts) => posts,
        Err(e) => {
            debug!(
                conversation_id = conversation_id,
                error = %e,
                "Thread fetch failed, continuing without context"
            );
            return None;
        }
    };

    if posts.len() <= 1 {
        return None;
    }

    let transcript = posts
        .iter()
        .map(|p| format!("@{}: {}", p.author.username, p.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    Some(transcript)
}

/// Format a quoted bookmark into a short attributed summary. No fetch
/// required — everything needed rides along on the bookmark itself.
///
/// Nested quotes are followed up to MAX_QUOTE_DEPTH, then cut off.
pub fn format_quoted(quoted: &Bookmark) -> String {
    format_quoted_at(quoted, 0)
}

fn format_quoted_at(quoted: &Bookmark, depth: usize) -> String {
    let mut out = format!(
        "Quoting @{} ({}): {}",
        quoted.author.username, quoted.created_at, quoted.text
    );

    if let Some(inner) = &quoted.quoted {
        if depth + 1 < MAX_QUOTE_DEPTH {
            out.push_str("\n  ");
            out.push_str(&format_quoted_at(inner, depth + 1));
        } else {
            out.push_str("\n  [nested quote omitted]");
        }
    }

    out
}
