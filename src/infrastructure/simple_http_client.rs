//! HTTP client for diary page retrieval
//!
//! A thin wrapper over `reqwest` with a fixed user agent and a bounded
//! timeout. Politeness delays are applied by the scraper between requests,
//! not here.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::DiaryPageSource;
use crate::infrastructure::config::ScraperConfig;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    /// Create HttpClientConfig from the scraper settings
    pub fn from_scraper_config(scraper_config: &ScraperConfig) -> Self {
        Self {
            timeout_seconds: scraper_config.request_timeout_seconds,
            user_agent: scraper_config.user_agent.clone(),
            follow_redirects: scraper_config.follow_redirects,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_scraper_config(&ScraperConfig::default())
    }
}

/// HTTP client used to fetch diary pages
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client from the scraper settings
    pub fn from_scraper_config(scraper_config: &ScraperConfig) -> Result<Self> {
        Self::with_config(HttpClientConfig::from_scraper_config(scraper_config))
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        debug!("HTTP client ready (timeout: {}s)", config.timeout_seconds);
        Ok(Self { client })
    }

    /// Fetch a URL, treating anything but 200 OK as an error
    pub async fn fetch_response(&self, url: &str) -> Result<Response> {
        info!("🌐 HTTP GET: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(anyhow!("HTTP error {}: {}", response.status(), url));
        }

        Ok(response)
    }

    /// Fetch HTML content and return it as a string
    pub async fn fetch_html_string(&self, url: &str) -> Result<String> {
        let response = self.fetch_response(url).await?;

        let html_content = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e))?;

        debug!("Fetched {} bytes from {}", html_content.len(), url);
        Ok(html_content)
    }
}

#[async_trait]
impl DiaryPageSource for HttpClient {
    async fn fetch_document(&self, url: &str) -> Option<String> {
        match self.fetch_html_string(url).await {
            Ok(html) => Some(html),
            Err(e) => {
                warn!("No data from {}: {}", url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::from_scraper_config(&ScraperConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = HttpClientConfig {
            timeout_seconds: 10,
            user_agent: "Test Agent".to_string(),
            follow_redirects: false,
        };

        assert!(HttpClient::with_config(config).is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_is_no_data() {
        let config = HttpClientConfig {
            timeout_seconds: 2,
            ..HttpClientConfig::default()
        };
        let client = HttpClient::with_config(config).unwrap();

        // Port 9 on localhost is not expected to serve HTTP
        let document = client.fetch_document("http://127.0.0.1:9/dave/films/diary/page/1/").await;
        assert!(document.is_none());
    }
}
