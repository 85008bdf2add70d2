//! Parsing configuration for diary extraction
//!
//! Centralized CSS selector tables. Each field has a list of selectors in
//! priority order; the first one that yields a value wins. The site's markup
//! has changed before, so new variants go here rather than into the parser.

use serde::{Deserialize, Serialize};

/// CSS selectors for diary listing and per-date pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiaryListSelectors {
    /// Selectors for diary rows
    pub row: Vec<String>,

    /// Selectors for the film title anchor (its href carries the slug)
    pub title: Vec<String>,

    /// Selectors for the release year
    pub year: Vec<String>,

    /// Selectors for the element whose class carries `rated-N`
    pub rating: Vec<String>,

    /// Selectors for the day anchor whose href carries `/for/YYYY/MM/DD/`
    pub watched_date: Vec<String>,

    /// Selectors whose presence marks a rewatch
    pub rewatch: Vec<String>,

    /// Selectors for tag anchors
    pub tags: Vec<String>,

    /// Selectors for the "next page" anchor
    pub next_page: Vec<String>,
}

impl Default for DiaryListSelectors {
    fn default() -> Self {
        Self {
            row: vec!["tr.diary-entry-row".to_string()],
            title: vec![
                ".td-film h3 a".to_string(),
                ".td-film .headline-3 a".to_string(),
            ],
            year: vec![
                ".td-released .number".to_string(),
                ".td-released span".to_string(),
            ],
            rating: vec![".td-rating .rating".to_string()],
            watched_date: vec![".td-day a".to_string()],
            rewatch: vec![
                ".td-rewatch .icon-rewatch".to_string(),
                ".td-rewatch.-active".to_string(),
            ],
            tags: vec![
                ".td-tags a".to_string(),
                ".diary-entry-row .tags a".to_string(),
                ".tags a".to_string(),
                "a[href*='/tag/']".to_string(),
            ],
            next_page: vec![".paginate-nextprev a.next".to_string()],
        }
    }
}
