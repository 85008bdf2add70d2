//! Letterboxd diary tag statistics
//!
//! Scrapes a public Letterboxd diary (or reads an exported one) and computes
//! how the tags on diary entries relate to their ratings.

// Module declarations
pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use commands::run;
