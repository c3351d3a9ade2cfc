// Enrichment pipeline — turns a raw bookmark into an EnrichedBookmark.
//
// Per-link flow: discovery -> shortener resolution -> classification ->
// per-category fetch -> truncation. Thread and quote context are resolved
// alongside the link loop. Every fetch is isolated: one link failing never
// aborts its siblings or the bookmark.

pub mod article;
pub mod models;
pub mod resolve;
pub mod thread;
pub mod transcript;
pub mod truncate;
pub mod urls;

use anyhow::Result;
use tracing::debug;

use crate::config::Config;
use crate::source::models::Bookmark;
use crate::source::BookmarkSource;

use article::{ArticleFetcher, HttpArticleFetcher};
use models::{BookmarkMetadata, EnrichedBookmark, Fetched, LinkCategory, LinkInfo};
use resolve::{HttpRedirectResolver, UrlResolver};
use transcript::{HttpTranscriptFetcher, TranscriptFetcher};
use truncate::truncate_content;
use urls::Classified;

/// User-Agent for all outbound enrichment requests.
pub const USER_AGENT: &str = concat!("magpie/", env!("CARGO_PKG_VERSION"));

/// The enrichment pipeline, wired to its fetcher collaborators.
///
/// Fetchers sit behind traits so tests can stub the network out entirely.
/// A `None` fetcher means that enrichment step is disabled: video links
/// fall through classification without a transcript fetcher, and article
/// candidates stay `unknown` without an article fetcher.
pub struct Enricher {
    resolver: Box<dyn UrlResolver>,
    transcripts: Option<Box<dyn TranscriptFetcher>>,
    articles: Option<Box<dyn ArticleFetcher>>,
    expand_threads: bool,
    max_content_length: usize,
}

impl Enricher {
    /// Build the production enricher from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transcripts: Option<Box<dyn TranscriptFetcher>> = if config.transcripts_enabled() {
            Some(Box::new(HttpTranscriptFetcher::new(
                &config.transcript_api_url,
                config.fetch_timeout_ms,
            )?))
        } else {
            None
        };

        let articles: Option<Box<dyn ArticleFetcher>> = if config.fetch_articles {
            Some(Box::new(HttpArticleFetcher::new(config.fetch_timeout_ms)?))
        } else {
            None
        };

        Ok(Self {
            resolver: Box::new(HttpRedirectResolver::new(config.fetch_timeout_ms)?),
            transcripts,
            articles,
            expand_threads: config.expand_threads,
            max_content_length: config.max_content_length,
        })
    }

    /// Build an enricher from explicit parts. Used by tests to inject
    /// stub resolvers and fetchers.
    pub fn new(
        resolver: Box<dyn UrlResolver>,
        transcripts: Option<Box<dyn TranscriptFetcher>>,
        articles: Option<Box<dyn ArticleFetcher>>,
        expand_threads: bool,
        max_content_length: usize,
    ) -> Self {
        Self {
            resolver,
            transcripts,
            articles,
            expand_threads,
            max_content_length,
        }
    }

    /// Enrich one bookmark: links, thread context, quoted context, derived
    /// metadata. All failures inside are soft; callers that still see an
    /// error here should fall back to `EnrichedBookmark::minimal`.
    pub async fn enrich(
        &self,
        source: &dyn BookmarkSource,
        bookmark: Bookmark,
    ) -> Result<EnrichedBookmark> {
        let mut links = Vec::new();
        for url in urls::extract_urls(&bookmark.text) {
            links.push(self.enrich_link(&url).await);
        }

        let is_thread = thread::is_likely_thread(&bookmark);
        let thread_context = if is_thread && self.expand_threads {
            thread::build_thread_context(source, &bookmark).await
        } else {
            None
        };

        let quoted_context = bookmark.quoted.as_deref().map(thread::format_quoted);

        let mut link_categories: Vec<LinkCategory> = Vec::new();
        for link in &links {
            if !link_categories.contains(&link.category) {
                link_categories.push(link.category);
            }
        }

        let metadata = BookmarkMetadata {
            has_links: !links.is_empty(),
            has_media: !bookmark.media.is_empty(),
            is_thread,
            is_quote: bookmark.quoted.is_some(),
            link_categories,
        };

        let source_url = bookmark.source_url();

        debug!(
            id = bookmark.id,
            links = links.len(),
            is_thread = metadata.is_thread,
            is_quote = metadata.is_quote,
            "Bookmark enriched"
        );

        Ok(EnrichedBookmark {
            bookmark,
            links,
            thread_context,
            quoted_context,
            metadata,
            source_url,
        })
    }

    /// Resolve, classify, and fetch a single discovered URL.
    async fn enrich_link(&self, url: &str) -> LinkInfo {
        let resolved = if urls::is_shortener(url) {
            self.resolver.resolve(url).await
        } else {
            url.to_string()
        };

        match urls::classify(&resolved, self.transcripts.is_some()) {
            Classified::Video { video_id } => match &self.transcripts {
                Some(fetcher) => self.enrich_video(fetcher.as_ref(), &resolved, &video_id).await,
                // classify only yields Video when a fetcher is present
                None => LinkInfo::bare(&resolved, LinkCategory::Unknown),
            },
            Classified::Platform => LinkInfo::bare(&resolved, LinkCategory::Twitter),
            Classified::Image => LinkInfo::bare(&resolved, LinkCategory::Image),
            Classified::Candidate => match &self.articles {
                Some(fetcher) => self.enrich_article(fetcher.as_ref(), &resolved).await,
                None => LinkInfo::bare(&resolved, LinkCategory::Unknown),
            },
        }
    }

    async fn enrich_video(
        &self,
        fetcher: &dyn TranscriptFetcher,
        url: &str,
        video_id: &str,
    ) -> LinkInfo {
        let mut info = LinkInfo::bare(url, LinkCategory::Youtube);
        match fetcher.fetch(video_id).await {
            Fetched::Content(transcript) => {
                info.content = Some(truncate_content(&transcript, self.max_content_length));
            }
            Fetched::Absent => {}
            Fetched::Failed(e) => info.error = Some(e),
        }
        info
    }

    async fn enrich_article(&self, fetcher: &dyn ArticleFetcher, url: &str) -> LinkInfo {
        match fetcher.fetch(url).await {
            Fetched::Content(article) => {
                let mut info = LinkInfo::bare(url, LinkCategory::Article);
                info.title = article.title;
                info.author = article.author;
                info.published = article.published;
                info.content = Some(truncate_content(&article.text, self.max_content_length));
                info
            }
            // No extractable content: the category stays unknown.
            Fetched::Absent => LinkInfo::bare(url, LinkCategory::Unknown),
            Fetched::Failed(e) => {
                let mut info = LinkInfo::bare(url, LinkCategory::Unknown);
                info.error = Some(e);
                info
            }
        }
    }
}
