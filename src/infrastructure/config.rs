//! Configuration infrastructure
//!
//! Contains configuration loading and management for diary scraping.
//!
//! Configuration is organized into two sections:
//! 1. Scraper settings (upstream site, politeness, selector tables)
//! 2. Logging settings

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::infrastructure::parsing::config::DiaryListSelectors;
use crate::infrastructure::parsing_error::ParsingError;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream site and request behaviour
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scraper settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root, e.g. `https://letterboxd.com`
    pub base_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Delay between consecutive requests in milliseconds
    pub request_delay_ms: u64,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// Selector fallback tables for diary rows
    pub selectors: DiaryListSelectors,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: letterboxd::BASE_URL.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            request_delay_ms: defaults::REQUEST_DELAY_MS,
            follow_redirects: true,
            selectors: DiaryListSelectors::default(),
        }
    }
}

impl ScraperConfig {
    /// Check settings that would otherwise only fail at request time
    pub fn validate(&self) -> Result<(), ParsingError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| ParsingError::ConfigurationError {
            message: format!("invalid base URL '{}': {}", self.base_url, e),
            field: "scraper.base_url".to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ParsingError::ConfigurationError {
                message: format!("unsupported scheme '{}'", parsed.scheme()),
                field: "scraper.base_url".to_string(),
            });
        }

        if self.request_timeout_seconds == 0 {
            return Err(ParsingError::ConfigurationError {
                message: "request timeout must be at least one second".to_string(),
                field: "scraper.request_timeout_seconds".to_string(),
            });
        }

        Ok(())
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs in the log file
    pub json_format: bool,

    /// Enable console output (stderr)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,

    /// Enable automatic log cleanup on startup
    pub auto_cleanup_logs: bool,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            max_files: defaults::LOG_MAX_FILES,
            auto_cleanup_logs: defaults::LOG_AUTO_CLEANUP,
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("selectors".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Create a configuration manager for the default location
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME);
        Ok(Self { config_path })
    }

    /// Create a configuration manager for an explicit file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { config_path: path.into() }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok(config)
            }
            Err(parse_error) => {
                warn!("⚠️  Configuration file is not valid: {}", parse_error);

                // Keep the broken file around for inspection
                let backup_path = self.config_path.with_extension("json.corrupted");
                if let Err(e) = fs::copy(&self.config_path, &backup_path).await {
                    warn!("Failed to create backup of corrupted config: {}", e);
                } else {
                    info!("Backed up corrupted config to: {:?}", backup_path);
                }

                self.reset_to_defaults().await
            }
        }
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Reset configuration to defaults (useful for troubleshooting)
    pub async fn reset_to_defaults(&self) -> Result<AppConfig> {
        info!("🔄 Resetting configuration to defaults");

        let default_config = AppConfig::default();
        self.save_config(&default_config)
            .await
            .context("Failed to save default configuration")?;

        Ok(default_config)
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Letterboxd site constants
pub mod letterboxd {
    /// Site root
    pub const BASE_URL: &str = "https://letterboxd.com";

    /// Paginated diary listing: `{base}/{user}/films/diary/page/{n}/`
    pub const DIARY_PAGE_PATH: &str = "films/diary/page";

    /// Per-date diary page: `{base}/{user}/films/diary/for/{YYYY}/{MM}/{DD}/`
    pub const DIARY_DATE_PATH: &str = "films/diary/for";
}

/// Default configuration values
pub mod defaults {
    /// Directory name under the user's config directory
    pub const APP_DIR_NAME: &str = "letterboxd-tag-stats";

    /// Configuration file name
    pub const CONFIG_FILE_NAME: &str = "config.json";

    /// Browser-like user agent; the site serves reduced markup to unknown clients
    pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 15;

    /// Default delay between requests in milliseconds
    pub const REQUEST_DELAY_MS: u64 = 500;

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default JSON format setting
    pub const LOG_JSON_FORMAT: bool = false;

    /// Default console output setting
    pub const LOG_CONSOLE_OUTPUT: bool = true;

    /// Default file output setting
    pub const LOG_FILE_OUTPUT: bool = false;

    /// Default maximum log files to keep
    pub const LOG_MAX_FILES: u32 = 5;

    /// Default auto cleanup logs setting
    pub const LOG_AUTO_CLEANUP: bool = true;

    /// Default minimum rated films for a tag to be listed
    pub const MIN_FILMS_PER_TAG: usize = 3;
}

/// URL building helper functions
pub mod utils {
    use super::letterboxd::{DIARY_DATE_PATH, DIARY_PAGE_PATH};

    /// Build the diary listing URL for a 1-based page number
    pub fn diary_page_url(base_url: &str, username: &str, page: u32) -> String {
        format!("{}/{}/{}/{}/", base_url.trim_end_matches('/'), username, DIARY_PAGE_PATH, page)
    }

    /// Build the per-date diary URL from a `YYYY-MM-DD` date
    ///
    /// Returns `None` if the date does not have exactly three parts.
    pub fn diary_date_url(base_url: &str, username: &str, date: &str) -> Option<String> {
        let mut parts = date.split('-');
        let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() || [year, month, day].iter().any(|p| p.is_empty()) {
            return None;
        }

        Some(format!(
            "{}/{}/{}/{}/{}/{}/",
            base_url.trim_end_matches('/'),
            username,
            DIARY_DATE_PATH,
            year,
            month,
            day
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.scraper.validate().is_ok());
        assert_eq!(config.scraper.request_delay_ms, 500);
        assert_eq!(config.scraper.request_timeout_seconds, 15);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = ScraperConfig {
            base_url: "not a url".to_string(),
            ..ScraperConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ParsingError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn listing_urls() {
        assert_eq!(
            utils::diary_page_url("https://letterboxd.com/", "dave", 3),
            "https://letterboxd.com/dave/films/diary/page/3/"
        );
    }

    #[test]
    fn date_urls() {
        assert_eq!(
            utils::diary_date_url("https://letterboxd.com", "dave", "2024-02-28").as_deref(),
            Some("https://letterboxd.com/dave/films/diary/for/2024/02/28/")
        );
        assert!(utils::diary_date_url("https://letterboxd.com", "dave", "2024-02").is_none());
        assert!(utils::diary_date_url("https://letterboxd.com", "dave", "2024-02-28-1").is_none());
    }

    #[test]
    fn partial_config_file_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"scraper": {"request_delay_ms": 0}}"#).unwrap();
        assert_eq!(config.scraper.request_delay_ms, 0);
        assert_eq!(config.scraper.base_url, letterboxd::BASE_URL);
        assert_eq!(config.logging.level, "info");
    }

    #[tokio::test]
    async fn config_manager_creates_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));

        let created = manager.load_config().await.unwrap();
        assert!(manager.config_path().exists());

        let reloaded = manager.load_config().await.unwrap();
        assert_eq!(created.scraper.base_url, reloaded.scraper.base_url);
    }

    #[tokio::test]
    async fn corrupted_config_is_backed_up_and_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let manager = ConfigManager::with_path(&path);
        let config = manager.load_config().await.unwrap();

        assert_eq!(config.scraper.request_delay_ms, defaults::REQUEST_DELAY_MS);
        assert!(path.with_extension("json.corrupted").exists());
    }
}
