// Generic article extraction — fetch a page and pull readable content.
//
// Extraction is best-effort and degrades gracefully: a page we can't parse
// yields Absent (category falls back to unknown), a network failure yields
// Failed with the message recorded on the link. Timeouts are expected noise
// and stay out of the warn log.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio::time::timeout;
use tracing::{debug, warn};

use super::models::Fetched;

/// Readable content extracted from an article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleContent {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published: Option<String>,
    pub text: String,
}

/// Fetches and extracts readable article content.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Fetched<ArticleContent>;
}

/// Article fetcher backed by reqwest + scraper, raced against a timeout.
pub struct HttpArticleFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpArticleFetcher {
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::enrich::USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to build article fetcher client")?;
        Ok(Self {
            client,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Article request failed: {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Article fetch returned {}", response.status());
        }

        response.text().await.context("Failed to read article body")
    }
}

#[async_trait]
impl ArticleFetcher for HttpArticleFetcher {
    async fn fetch(&self, url: &str) -> Fetched<ArticleContent> {
        let body = match timeout(self.timeout, self.fetch_body(url)).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                warn!(url = url, error = %e, "Article fetch failed");
                return Fetched::Failed(format!("{e:#}"));
            }
            Err(_) => {
                // Timeout is expected noise on slow sites — soft absence.
                debug!(url = url, "Article fetch timed out");
                return Fetched::Absent;
            }
        };

        match extract_article(&body) {
            Some(content) => Fetched::Content(content),
            None => {
                debug!(url = url, "No extractable article content");
                Fetched::Absent
            }
        }
    }
}

/// Pull readable content out of an HTML document.
///
/// Tries the common article containers in order, then collects paragraph
/// text. Returns None when nothing substantial is found.
fn extract_article(html: &str) -> Option<ArticleContent> {
    let doc = Html::parse_document(html);

    let container_selectors = ["article", "main", "[role=\"main\"]", "body"];
    let p_sel = Selector::parse("p").expect("p selector");

    let mut text = String::new();
    for sel_str in container_selectors {
        let sel = Selector::parse(sel_str).expect("container selector");
        if let Some(container) = doc.select(&sel).next() {
            let paragraphs: Vec<String> = container
                .select(&p_sel)
                .map(|p| p.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            if !paragraphs.is_empty() {
                text = paragraphs.join("\n\n");
                break;
            }
        }
    }

    // A couple of stray words isn't an article.
    if text.chars().count() < 80 {
        return None;
    }

    Some(ArticleContent {
        title: meta_content(&doc, "meta[property=\"og:title\"]")
            .or_else(|| element_text(&doc, "title")),
        author: meta_content(&doc, "meta[name=\"author\"]"),
        published: meta_content(&doc, "meta[property=\"article:published_time\"]"),
        text,
    })
}

fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn element_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}
