// Bookmark description building — what the decision agent actually reads.
//
// The description is plain text, section by section. Everything the
// enrichment pipeline learned goes in; the agent decides what matters.

use crate::enrich::models::{EnrichedBookmark, LinkInfo};

/// System instruction handed to the agent alongside every description.
pub const SYSTEM_PROMPT: &str = "\
You triage saved bookmarks. For each bookmark description you receive, \
choose exactly one action and emit it as a tool call:\n\
- create_task: the bookmark describes something the user should act on. \
Input: title (required), notes, project, tags.\n\
- save_for_later: a long-form read or video worth the user's time later. \
Input: url (required), title, tags.\n\
- save_reference: evergreen material worth keeping findable. \
Input: url (required), title, notes, tags.\n\
- skip: none of the above. Input: reason (required).\n\
Prefer skip over a forced fit. Emit exactly one tool call.";

/// Render an enriched bookmark into the agent-facing description.
pub fn build_description(enriched: &EnrichedBookmark) -> String {
    let bookmark = &enriched.bookmark;
    let mut out = String::new();

    out.push_str(&format!(
        "Bookmark by @{} ({}) at {}\n{}\n\n{}\n",
        bookmark.author.username,
        bookmark.author.name,
        bookmark.created_at,
        enriched.source_url,
        bookmark.text,
    ));

    if let Some(metrics) = &bookmark.metrics {
        out.push_str(&format!(
            "\nEngagement: {} likes, {} retweets, {} replies\n",
            metrics.likes, metrics.retweets, metrics.replies
        ));
    }

    if enriched.metadata.has_media {
        let kinds: Vec<&str> = bookmark
            .media
            .iter()
            .map(|m| m.media_type.as_str())
            .collect();
        out.push_str(&format!("\nAttached media: {}\n", kinds.join(", ")));
    }

    for (i, link) in enriched.links.iter().enumerate() {
        out.push_str(&format!("\nLink {} ", i + 1));
        out.push_str(&describe_link(link));
    }

    if let Some(thread) = &enriched.thread_context {
        out.push_str("\nThread context:\n");
        out.push_str(thread);
        out.push('\n');
    }

    if let Some(quoted) = &enriched.quoted_context {
        out.push('\n');
        out.push_str(quoted);
        out.push('\n');
    }

    out
}

fn describe_link(link: &LinkInfo) -> String {
    let mut out = format!("[{}]: {}\n", link.category, link.url);

    if let Some(title) = &link.title {
        out.push_str(&format!("  Title: {title}\n"));
    }
    if let Some(author) = &link.author {
        out.push_str(&format!("  Author: {author}\n"));
    }
    if let Some(published) = &link.published {
        out.push_str(&format!("  Published: {published}\n"));
    }
    if let Some(duration) = &link.duration {
        out.push_str(&format!("  Duration: {duration}\n"));
    }
    if let Some(content) = &link.content {
        out.push_str(&format!("  Content:\n{content}\n"));
    }
    if let Some(error) = &link.error {
        out.push_str(&format!("  (fetch failed: {error})\n"));
    }

    out
}
