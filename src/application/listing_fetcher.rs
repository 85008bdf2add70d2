//! Listing fetcher
//!
//! Fetches one diary document at a time and hands it to the parser. Every
//! failure on the way (no response, unusable body) ends as an empty result.

use scraper::Html;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::DiaryPageSource;
use crate::infrastructure::config::utils;
use crate::infrastructure::parsing::{ContextualParser, DiaryListParser, DiaryListing, ParseContext};

/// Retrieves and parses diary listing and per-date pages
pub struct ListingFetcher {
    source: Arc<dyn DiaryPageSource>,
    parser: DiaryListParser,
    base_url: String,
}

impl ListingFetcher {
    pub fn new(
        source: Arc<dyn DiaryPageSource>,
        parser: DiaryListParser,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            source,
            parser,
            base_url: base_url.into(),
        }
    }

    /// Fetch and parse one page of the diary listing (1-based)
    pub async fn fetch_page(&self, username: &str, page: u32) -> DiaryListing {
        let url = utils::diary_page_url(&self.base_url, username, page);

        match self.source.fetch_document(&url).await {
            Some(body) => self.parse_listing(&body, page),
            None => {
                warn!("No diary data for {} page {}", username, page);
                DiaryListing::default()
            }
        }
    }

    /// Fetch the per-date page and pick out the tags of one film
    ///
    /// A date that is not `YYYY-MM-DD` shaped is not fetched at all.
    pub async fn fetch_date_tags(
        &self,
        username: &str,
        date: &str,
        slug: Option<&str>,
    ) -> Vec<String> {
        let Some(url) = utils::diary_date_url(&self.base_url, username, date) else {
            debug!("Skipping malformed diary date '{}'", date);
            return Vec::new();
        };

        match self.source.fetch_document(&url).await {
            Some(body) => self.parse_date_tags(&body, date, slug),
            None => {
                warn!("No diary data for {} on {}", username, date);
                Vec::new()
            }
        }
    }

    // Html is not Send, so it never lives across an await point
    fn parse_listing(&self, body: &str, page: u32) -> DiaryListing {
        let html = Html::parse_document(body);
        self.parser.parse_with_context(&html, &ParseContext::listing(page))
    }

    fn parse_date_tags(&self, body: &str, date: &str, slug: Option<&str>) -> Vec<String> {
        let html = Html::parse_document(body);
        let tags = self.parser.find_date_tags(&html, slug);
        debug!("{}: {} tag(s) for {:?}", ParseContext::date(date), tags.len(), slug);
        tags
    }
}
