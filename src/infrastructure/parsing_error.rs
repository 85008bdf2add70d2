//! Parsing error types
//!
//! Errors that can surface while setting up diary parsing. Problems with a
//! single page or a single row never become errors: they degrade to missing
//! data instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("No valid selectors configured for '{field}'")]
    NoValidSelectors { field: String, errors: Vec<String> },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String, field: String },
}

impl ParsingError {
    /// Create an invalid selector error
    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a no valid selectors error with the individual failures
    pub fn no_valid_selectors(field: &str, errors: Vec<String>) -> Self {
        Self::NoValidSelectors {
            field: field.to_string(),
            errors,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_selector_display() {
        let err = ParsingError::invalid_selector("td[", "unexpected end");
        assert_eq!(err.to_string(), "Invalid CSS selector: td[ - unexpected end");
    }

    #[test]
    fn display_mentions_field() {
        let err = ParsingError::no_valid_selectors("rating", vec!["'x': bad".to_string()]);
        assert_eq!(err.to_string(), "No valid selectors configured for 'rating'");
    }
}
