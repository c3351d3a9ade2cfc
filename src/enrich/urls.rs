// URL discovery and classification — the pure leaf functions of the
// enrichment pipeline. No network access happens here.

use std::sync::OnceLock;

use regex_lite::Regex;
use url::Url;

/// Trailing characters that are punctuation artifacts, not part of a URL.
const TRAILING_PUNCT: &[char] = &['.', ',', ';', ':', '!', '?', '`', '"', '\''];

/// Percent-encoded forms of the same artifacts (uppercase hex).
const TRAILING_ENCODED: &[&str] = &[
    "%2E", "%2C", "%3B", "%3A", "%21", "%3F", "%60", "%22", "%27",
];

/// Known link-shortener hosts. Links through these get a redirect
/// resolution pass; everything else passes through unresolved.
const SHORTENER_HOSTS: &[&str] = &[
    "t.co",
    "bit.ly",
    "buff.ly",
    "tinyurl.com",
    "ow.ly",
    "goo.gl",
    "is.gd",
    "j.mp",
];

/// Social-platform hosts we never content-fetch (the bookmark itself came
/// from there — fetching would be redundant and self-referential).
const PLATFORM_HOSTS: &[&str] = &["twitter.com", "x.com", "mobile.twitter.com"];

/// File extensions classified as images without any fetch.
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp"];

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://[^\s]+").expect("url regex"))
}

/// Extract URL-like tokens from free text, in discovery order.
///
/// Trailing punctuation (and its percent-encoded form) that tweet authors
/// glue onto links is stripped. Duplicate URLs are deliberately NOT
/// de-duplicated — each occurrence is enriched independently.
pub fn extract_urls(text: &str) -> Vec<String> {
    url_regex()
        .find_iter(text)
        .map(|m| strip_trailing_punct(m.as_str()).to_string())
        .filter(|u| !u.is_empty())
        .collect()
}

/// Strip trailing punctuation artifacts from a URL token.
fn strip_trailing_punct(token: &str) -> &str {
    let mut s = token;
    loop {
        if let Some(stripped) = s.strip_suffix(TRAILING_PUNCT) {
            s = stripped;
            continue;
        }
        // Tweet text glues emoji straight onto links, so len - 3 can land
        // mid-character; such a tail cannot be an ASCII percent escape.
        let tail_start = s.len().saturating_sub(3);
        if s.len() < 3 || !s.is_char_boundary(tail_start) {
            return s;
        }
        if TRAILING_ENCODED
            .iter()
            .any(|enc| s[tail_start..].eq_ignore_ascii_case(enc))
        {
            s = &s[..tail_start];
        } else {
            return s;
        }
    }
}

/// Whether this URL goes through a known link shortener.
pub fn is_shortener(url: &str) -> bool {
    host_of(url).is_some_and(|h| SHORTENER_HOSTS.iter().any(|s| h == *s))
}

/// What a resolved URL classified as, before any fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// Video-hosting URL with its extracted video id.
    Video { video_id: String },
    /// The social platform itself — category only, never fetched.
    Platform,
    /// Image by file extension — category only, never fetched.
    Image,
    /// Anything else: a candidate for article extraction.
    Candidate,
}

/// Classify a resolved URL in strict priority order (first match wins):
/// video patterns, platform domains, image extensions, article candidate.
///
/// Video classification only applies when transcript fetching is enabled —
/// otherwise the URL falls through to the remaining steps, so a YouTube
/// link can still be article-extracted or end up unknown.
pub fn classify(url: &str, transcripts_enabled: bool) -> Classified {
    if transcripts_enabled {
        if let Some(video_id) = extract_video_id(url) {
            return Classified::Video { video_id };
        }
    }

    if let Some(host) = host_of(url) {
        if PLATFORM_HOSTS.iter().any(|p| host == *p) {
            return Classified::Platform;
        }
    }

    if is_image_url(url) {
        return Classified::Image;
    }

    Classified::Candidate
}

/// Extract a video id from known video-hosting URL shapes:
/// youtube.com/watch?v=ID, youtu.be/ID, youtube.com/shorts/ID.
pub fn extract_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.trim_start_matches("www.");

    match host {
        "youtube.com" | "m.youtube.com" => {
            let path = parsed.path();
            if path == "/watch" {
                parsed
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned())
            } else {
                path.strip_prefix("/shorts/")
                    .or_else(|| path.strip_prefix("/live/"))
                    .map(|id| id.trim_end_matches('/').to_string())
                    .filter(|id| !id.is_empty())
            }
        }
        "youtu.be" => {
            let id = parsed.path().trim_start_matches('/').trim_end_matches('/');
            (!id.is_empty()).then(|| id.to_string())
        }
        _ => None,
    }
}

/// Whether the URL's path ends in an image extension (query ignored).
fn is_image_url(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(u) => u.path().to_ascii_lowercase(),
        Err(_) => return false,
    };
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
}
