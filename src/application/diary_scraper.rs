//! Diary scraping use case
//!
//! Drives the [`ListingFetcher`] across the paginated diary listing and,
//! on request, revisits per-date pages to fill in tags the listing did not
//! show.

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::listing_fetcher::ListingFetcher;
use crate::domain::{DiaryEntry, DiaryPageSource, ProgressSink};
use crate::infrastructure::config::ScraperConfig;
use crate::infrastructure::parsing::DiaryListParser;
use crate::infrastructure::HttpClient;

/// Scrapes a user's full diary
pub struct DiaryScraper {
    fetcher: ListingFetcher,
    request_delay: Duration,
}

impl DiaryScraper {
    pub fn new(fetcher: ListingFetcher, request_delay: Duration) -> Self {
        Self { fetcher, request_delay }
    }

    /// Build a scraper that talks to the configured site over HTTP
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        config.validate().context("Invalid scraper configuration")?;
        let client = HttpClient::from_scraper_config(config)?;
        Self::with_source(Arc::new(client), config)
    }

    /// Build a scraper over any page source, using the configured selectors
    /// and delay
    pub fn with_source(source: Arc<dyn DiaryPageSource>, config: &ScraperConfig) -> Result<Self> {
        let parser = DiaryListParser::with_config(&config.selectors)
            .context("Invalid selector configuration")?;
        let fetcher = ListingFetcher::new(source, parser, config.base_url.clone());
        Ok(Self::new(fetcher, Duration::from_millis(config.request_delay_ms)))
    }

    /// Scrape every diary entry of `username`, in listing order
    ///
    /// An empty result means the profile does not exist, is private, or has
    /// an empty diary; these are not told apart. With `deep_scan`, entries
    /// that have a watched date but no tags get their tags from the per-date
    /// page.
    pub async fn scrape(
        &self,
        username: &str,
        deep_scan: bool,
        progress: &dyn ProgressSink,
    ) -> Vec<DiaryEntry> {
        info!("Scraping diary for {} (deep scan: {})", username, deep_scan);

        let mut entries = Vec::new();
        let mut page = 1;

        loop {
            progress.notify(&format!("Fetching diary page {}…", page), None);
            let listing = self.fetcher.fetch_page(username, page).await;

            if page == 1 && listing.entries.is_empty() {
                info!("No diary entries on the first page for {}", username);
                return Vec::new();
            }

            debug!(
                "Page {}: {} entries, has_next: {}",
                page,
                listing.entries.len(),
                listing.has_next
            );
            entries.extend(listing.entries);

            if !listing.has_next {
                break;
            }

            page += 1;
            self.pause().await;
        }

        info!("Collected {} diary entries from {} page(s)", entries.len(), page);

        if deep_scan {
            self.backfill_tags(username, &mut entries, progress).await;
        }

        entries
    }

    /// Replace the empty tag lists of dated entries with the per-date result
    async fn backfill_tags(
        &self,
        username: &str,
        entries: &mut [DiaryEntry],
        progress: &dyn ProgressSink,
    ) {
        let eligible: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.needs_tag_backfill())
            .map(|(index, _)| index)
            .collect();
        let total = eligible.len();

        info!("Deep scan: {} entries without tags", total);

        for (done, &index) in eligible.iter().enumerate() {
            let step = done + 1;
            self.pause().await;

            let entry = &entries[index];
            #[allow(clippy::cast_precision_loss)]
            let fraction = step as f64 / total as f64;
            progress.notify(
                &format!("Fetching tags for '{}' ({}/{})…", entry.title, step, total),
                Some(fraction),
            );

            let Some(date) = entry.watched_date.as_deref() else {
                continue;
            };
            let tags = self
                .fetcher
                .fetch_date_tags(username, date, entry.film_slug.as_deref())
                .await;

            debug!("'{}' on {}: {:?}", entry.title, date, tags);
            entries[index].tags = tags;
        }
    }

    async fn pause(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}
