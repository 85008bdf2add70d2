//! Diary scraping service traits
//!
//! Seams between the scraper and the outside world: where documents come
//! from and where progress goes.

use async_trait::async_trait;

/// Source of raw diary documents
///
/// A fetch either yields the document body or nothing. Transport errors,
/// timeouts and non-200 statuses all collapse to `None`; callers treat that
/// exactly like a page with no rows.
#[async_trait]
pub trait DiaryPageSource: Send + Sync {
    /// Fetch the document at `url`
    async fn fetch_document(&self, url: &str) -> Option<String>;
}

/// Receiver of scrape progress notifications
///
/// `fraction` is `None` while the amount of remaining work is unknown
/// (listing pages) and `Some(0.0..=1.0)` during the deep scan.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, message: &str, fraction: Option<f64>);
}

/// Progress sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn notify(&self, _message: &str, _fraction: Option<f64>) {}
}

impl<F> ProgressSink for F
where
    F: Fn(&str, Option<f64>) + Send + Sync,
{
    fn notify(&self, message: &str, fraction: Option<f64>) {
        self(message, fraction);
    }
}
