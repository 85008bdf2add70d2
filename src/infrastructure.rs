//! Infrastructure layer for HTTP access, parsing, configuration and logging
//!
//! Everything that touches the network, the file system or raw markup lives
//! here; the domain layer only sees `DiaryEntry` values and the service traits.

pub mod config; // Configuration constants and helpers
pub mod csv_import; // Exported diary files
pub mod logging; // Logging infrastructure
pub mod parsing; // Diary page parsing
pub mod parsing_error;
pub mod simple_http_client;

// Re-export commonly used items
pub use config::{letterboxd, AppConfig, ConfigManager, LoggingConfig, ScraperConfig};
pub use csv_import::{import_diary_csv, import_diary_file, write_diary_csv};
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{
    DiaryListParser, DiaryListSelectors, DiaryListing, ParseContext, ParsingError, ParsingResult,
};
pub use simple_http_client::{HttpClient, HttpClientConfig};
