//! HTML parsing infrastructure for diary pages
//!
//! Selector tables live in [`config`]; [`diary_list_parser`] applies them.
//! Parsing never fails as a whole: a field that cannot be found is left empty
//! and a page without rows yields no entries.

pub mod config;
pub mod context;
pub mod diary_list_parser;
pub mod error;

// Re-export public types
pub use config::DiaryListSelectors;
pub use context::ParseContext;
pub use diary_list_parser::{DiaryListParser, DiaryListing};
pub use error::{ParsingError, ParsingResult};

use scraper::Html;

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output;
}
