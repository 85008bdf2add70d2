//! Domain services
//!
//! Contains the interfaces the scraper depends on.

pub mod diary_services;

pub use diary_services::{DiaryPageSource, NoopProgress, ProgressSink};
