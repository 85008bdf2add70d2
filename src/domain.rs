//! Domain module - Core entities and service seams
//!
//! Diary entries, the statistics computed over them, and the traits the
//! scraper talks to the outside world through.

pub mod diary_entry;
pub mod services;
pub mod tag_stats;

// Re-export commonly used items for convenience
pub use diary_entry::{DiaryEntry, Rating, RatingError};
pub use services::{DiaryPageSource, NoopProgress, ProgressSink};
pub use tag_stats::{DiarySummary, TagRow, TagStat};
