// Content truncation with readable break points.
//
// A hard character cut mid-sentence reads badly in the agent prompt, so the
// cut backs up to the last sentence end or newline — but only when that
// break keeps at least 70% of the budget, so we never sacrifice much
// content for readability.

/// Minimum fraction of `max_chars` a soft break point must preserve.
const MIN_BREAK_FRACTION: f64 = 0.7;

/// Truncate `content` to at most `max_chars` characters (plus a trailing
/// "..." marker when cut).
///
/// Content at or under the limit is returned unchanged. Otherwise the text
/// is cut at the limit, then the cut backs up to the later of the last
/// ". " (keeping the period) or the last newline, provided that break sits
/// past 70% of the limit. Counts characters, not bytes, so multi-byte text
/// never panics.
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }

    let cut: String = content.chars().take(max_chars).collect();

    // Byte offsets into `cut`; both land on char boundaries.
    let sentence_end = cut.rfind(". ").map(|i| i + 1);
    let newline = cut.rfind('\n');
    let break_at = match (sentence_end, newline) {
        (Some(s), Some(n)) => Some(s.max(n)),
        (Some(s), None) => Some(s),
        (None, Some(n)) => Some(n),
        (None, None) => None,
    };

    if let Some(at) = break_at {
        let kept_chars = cut[..at].chars().count();
        if (kept_chars as f64) > (max_chars as f64) * MIN_BREAK_FRACTION {
            return format!("{}...", cut[..at].trim_end());
        }
    }

    format!("{cut}...")
}
