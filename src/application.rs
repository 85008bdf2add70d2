//! Application layer module
//!
//! Use cases that orchestrate fetching and parsing into a complete diary.

pub mod diary_scraper;
pub mod listing_fetcher;

pub use diary_scraper::DiaryScraper;
pub use listing_fetcher::ListingFetcher;
