// Unit tests for the pure enrichment leaves: URL discovery, classification,
// truncation, and thread/quote heuristics. No network, no filesystem.

use magpie::enrich::thread::{format_quoted, has_thread_indicator, is_likely_thread};
use magpie::enrich::truncate::truncate_content;
use magpie::enrich::urls::{classify, extract_urls, extract_video_id, is_shortener, Classified};
use magpie::source::models::{Author, Bookmark};

fn bookmark(id: &str, text: &str) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        text: text.to_string(),
        author: Author {
            username: "someone".to_string(),
            name: "Some One".to_string(),
        },
        created_at: "2026-01-15T12:00:00Z".to_string(),
        metrics: None,
        media: Vec::new(),
        conversation_id: None,
        in_reply_to_id: None,
        quoted: None,
    }
}

// ============================================================
// extract_urls — discovery and trailing punctuation
// ============================================================

#[test]
fn extract_strips_trailing_period() {
    assert_eq!(
        extract_urls("check http://a.com/x."),
        vec!["http://a.com/x".to_string()]
    );
}

#[test]
fn extract_strips_stacked_punctuation() {
    assert_eq!(
        extract_urls("wow https://a.com/x!?."),
        vec!["https://a.com/x".to_string()]
    );
}

#[test]
fn extract_strips_percent_encoded_punctuation() {
    assert_eq!(
        extract_urls("see https://b.com/y%2C now"),
        vec!["https://b.com/y".to_string()]
    );
    // lowercase hex too
    assert_eq!(
        extract_urls("see https://b.com/y%2c"),
        vec!["https://b.com/y".to_string()]
    );
}

#[test]
fn extract_strips_quotes() {
    assert_eq!(
        extract_urls("\"https://a.com/z\""),
        vec!["https://a.com/z".to_string()]
    );
}

#[test]
fn extract_preserves_discovery_order() {
    assert_eq!(
        extract_urls("first https://one.com then https://two.com"),
        vec!["https://one.com".to_string(), "https://two.com".to_string()]
    );
}

#[test]
fn extract_keeps_duplicates() {
    // Duplicate URLs are deliberately not de-duplicated; each occurrence
    // is enriched on its own.
    assert_eq!(
        extract_urls("go https://a.com and again https://a.com"),
        vec!["https://a.com".to_string(), "https://a.com".to_string()]
    );
}

#[test]
fn extract_keeps_multibyte_tail_intact() {
    // Emoji glued straight onto a link stays part of the token.
    assert_eq!(
        extract_urls("check https://a.com/x🧵"),
        vec!["https://a.com/x🧵".to_string()]
    );
    // Punctuation after the emoji is still stripped.
    assert_eq!(
        extract_urls("read https://a.com/x🧵."),
        vec!["https://a.com/x🧵".to_string()]
    );
}

#[test]
fn extract_no_urls_yields_empty() {
    assert!(extract_urls("no links here, just words").is_empty());
}

#[test]
fn extract_keeps_query_strings_intact() {
    assert_eq!(
        extract_urls("https://a.com/p?x=1&y=2"),
        vec!["https://a.com/p?x=1&y=2".to_string()]
    );
}

// ============================================================
// is_shortener
// ============================================================

#[test]
fn shortener_hosts_detected() {
    assert!(is_shortener("https://t.co/abc123"));
    assert!(is_shortener("https://bit.ly/xyz"));
    assert!(!is_shortener("https://example.com/t.co"));
    assert!(!is_shortener("not a url"));
}

// ============================================================
// classification — strict priority order
// ============================================================

#[test]
fn youtube_watch_url_classifies_video() {
    match classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ", true) {
        Classified::Video { video_id } => assert_eq!(video_id, "dQw4w9WgXcQ"),
        other => panic!("expected video, got {other:?}"),
    }
}

#[test]
fn video_url_with_transcripts_disabled_falls_through() {
    // Not platform, not image, so it becomes an article candidate.
    assert_eq!(
        classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ", false),
        Classified::Candidate
    );
}

#[test]
fn platform_urls_classify_twitter() {
    assert_eq!(
        classify("https://x.com/user/status/123", true),
        Classified::Platform
    );
    assert_eq!(
        classify("https://twitter.com/user/status/123", false),
        Classified::Platform
    );
}

#[test]
fn image_extension_classifies_image() {
    assert_eq!(classify("https://a.com/pic.png", true), Classified::Image);
    assert_eq!(classify("https://a.com/pic.JPG", false), Classified::Image);
    // query string doesn't hide the extension
    assert_eq!(
        classify("https://a.com/pic.webp?w=800", true),
        Classified::Image
    );
}

#[test]
fn video_pattern_wins_over_image_extension() {
    match classify("https://youtu.be/abc.png", true) {
        Classified::Video { video_id } => assert_eq!(video_id, "abc.png"),
        other => panic!("expected video, got {other:?}"),
    }
}

#[test]
fn everything_else_is_a_candidate() {
    assert_eq!(
        classify("https://blog.example.com/post", true),
        Classified::Candidate
    );
}

// ============================================================
// extract_video_id
// ============================================================

#[test]
fn video_id_from_watch_url_with_extra_params() {
    assert_eq!(
        extract_video_id("https://youtube.com/watch?v=abc123&t=42"),
        Some("abc123".to_string())
    );
}

#[test]
fn video_id_from_short_url() {
    assert_eq!(
        extract_video_id("https://youtu.be/abc123"),
        Some("abc123".to_string())
    );
}

#[test]
fn video_id_from_shorts_url() {
    assert_eq!(
        extract_video_id("https://www.youtube.com/shorts/xyz789/"),
        Some("xyz789".to_string())
    );
}

#[test]
fn no_video_id_from_channel_url() {
    assert_eq!(extract_video_id("https://www.youtube.com/@somechannel"), None);
    assert_eq!(extract_video_id("https://example.com/watch?v=abc"), None);
}

// ============================================================
// truncation
// ============================================================

#[test]
fn truncate_under_limit_unchanged() {
    assert_eq!(truncate_content("short text", 100), "short text");
}

#[test]
fn truncate_at_limit_unchanged() {
    let text = "x".repeat(50);
    assert_eq!(truncate_content(&text, 50), text);
}

#[test]
fn truncate_hard_cut_appends_ellipsis() {
    // No sentence end or newline anywhere: hard cut at the limit.
    let text = "a".repeat(100);
    let out = truncate_content(&text, 30);
    assert_eq!(out, format!("{}...", "a".repeat(30)));
}

#[test]
fn truncate_prefers_sentence_break_past_threshold() {
    // ". " lands at 19/20 chars kept, past the 70% threshold.
    let out = truncate_content("Sentence one is ok. Sentence two continues beyond", 20);
    assert_eq!(out, "Sentence one is ok....");
}

#[test]
fn truncate_prefers_newline_break_past_threshold() {
    let out = truncate_content("Line one has stuff\nLine two continues on", 20);
    assert_eq!(out, "Line one has stuff...");
}

#[test]
fn truncate_ignores_early_break_point() {
    // The only ". " sits at 3/20 chars, well under 70%: hard cut instead.
    let out = truncate_content("Hi. abcdefghijklmnopqrstuvwxyz", 20);
    assert_eq!(out, "Hi. abcdefghijklmnop...");
}

#[test]
fn truncate_length_bound_holds() {
    let inputs = [
        "word ".repeat(100),
        "Sentence. ".repeat(40),
        "line\n".repeat(50),
        "🧵🧵🧵🧵🧵🧵🧵🧵🧵🧵".repeat(10),
    ];
    for input in &inputs {
        for limit in [10, 33, 100] {
            let out = truncate_content(input, limit);
            assert!(
                out.chars().count() <= limit + 3,
                "limit {limit} violated for {input:?}: {} chars",
                out.chars().count()
            );
        }
    }
}

#[test]
fn truncate_multibyte_never_panics() {
    let text = "émoji 🦀 content ".repeat(20);
    let out = truncate_content(&text, 25);
    assert!(out.chars().count() <= 28);
}

// ============================================================
// thread heuristics
// ============================================================

#[test]
fn thread_indicator_patterns() {
    assert!(has_thread_indicator("my thoughts 1/7"));
    assert!(has_thread_indicator("Thread: why rust"));
    assert!(has_thread_indicator("big news 🧵"));
    assert!(has_thread_indicator("A THREAD on databases"));
    assert!(!has_thread_indicator("just a normal tweet"));
    assert!(!has_thread_indicator("half of 3/ nothing"));
}

#[test]
fn reply_is_likely_thread() {
    let mut b = bookmark("1", "plain text");
    assert!(!is_likely_thread(&b));
    b.in_reply_to_id = Some("0".to_string());
    assert!(is_likely_thread(&b));
}

#[test]
fn foreign_conversation_id_is_likely_thread() {
    let mut b = bookmark("5", "plain text");
    b.conversation_id = Some("5".to_string());
    assert!(!is_likely_thread(&b));
    b.conversation_id = Some("2".to_string());
    assert!(is_likely_thread(&b));
}

// ============================================================
// quote formatting
// ============================================================

#[test]
fn quoted_bookmark_formats_with_attribution() {
    let quoted = bookmark("9", "the original insight");
    let out = format_quoted(&quoted);
    assert!(out.contains("@someone"));
    assert!(out.contains("2026-01-15T12:00:00Z"));
    assert!(out.contains("the original insight"));
}

#[test]
fn deeply_nested_quotes_are_cut_off() {
    // Four levels deep; the source promises no cycles but we don't rely on it.
    let mut b = bookmark("d", "level d");
    for (id, text) in [("c", "level c"), ("b", "level b"), ("a", "level a")] {
        let mut outer = bookmark(id, text);
        outer.quoted = Some(Box::new(b));
        b = outer;
    }
    let out = format_quoted(&b);
    assert!(out.contains("level a"));
    assert!(out.contains("level c"));
    assert!(out.contains("[nested quote omitted]"));
    assert!(!out.contains("level d"));
}
