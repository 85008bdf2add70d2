//! Parsing context for diary extraction
//!
//! Identifies which page a document came from, for log messages.

use std::fmt;

/// Which diary page is being parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseContext {
    /// Paginated listing, 1-based page number
    Listing { page_id: u32 },

    /// Per-date page, `YYYY-MM-DD`
    Date { date: String },
}

impl ParseContext {
    /// Context for a listing page
    pub const fn listing(page_id: u32) -> Self {
        Self::Listing { page_id }
    }

    /// Context for a per-date page
    pub fn date(date: impl Into<String>) -> Self {
        Self::Date { date: date.into() }
    }
}

impl fmt::Display for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing { page_id } => write!(f, "diary page {page_id}"),
            Self::Date { date } => write!(f, "diary date {date}"),
        }
    }
}
