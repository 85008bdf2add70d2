//! Test utilities for the diary scraper
//!
//! Provides an in-memory page source and markup builders so scraper tests run
//! without the network and can assert exactly which URLs were requested.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::application::DiaryScraper;
use crate::domain::DiaryPageSource;
use crate::infrastructure::config::ScraperConfig;

/// Base URL used by scripted scrapes
pub const TEST_BASE_URL: &str = "https://diary.test";

/// Page source answering from a fixed URL → document map
///
/// URLs that are not scripted behave like failed requests.
#[derive(Debug, Default)]
pub struct ScriptedPageSource {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    /// Every URL requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DiaryPageSource for ScriptedPageSource {
    async fn fetch_document(&self, url: &str) -> Option<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.pages.get(url).cloned()
    }
}

/// Scraper configuration pointing at [`TEST_BASE_URL`] with no delay
pub fn test_scraper_config() -> ScraperConfig {
    ScraperConfig {
        base_url: TEST_BASE_URL.to_string(),
        request_delay_ms: 0,
        ..ScraperConfig::default()
    }
}

/// Scraper over a scripted source, plus the source for request assertions
pub fn scripted_scraper(
    source: ScriptedPageSource,
) -> anyhow::Result<(DiaryScraper, Arc<ScriptedPageSource>)> {
    scripted_scraper_with_delay(source, 0)
}

/// Like [`scripted_scraper`], pausing `delay_ms` between requests
pub fn scripted_scraper_with_delay(
    source: ScriptedPageSource,
    delay_ms: u64,
) -> anyhow::Result<(DiaryScraper, Arc<ScriptedPageSource>)> {
    let config = ScraperConfig {
        request_delay_ms: delay_ms,
        ..test_scraper_config()
    };
    let source = Arc::new(source);
    let scraper = DiaryScraper::with_source(source.clone(), &config)?;
    Ok((scraper, source))
}

/// Listing URL for `user` under [`TEST_BASE_URL`]
pub fn page_url(user: &str, page: u32) -> String {
    crate::infrastructure::config::utils::diary_page_url(TEST_BASE_URL, user, page)
}

/// Per-date URL for `user` under [`TEST_BASE_URL`]; `date` must be `YYYY-MM-DD`
pub fn date_url(user: &str, date: &str) -> String {
    crate::infrastructure::config::utils::diary_date_url(TEST_BASE_URL, user, date)
        .unwrap_or_default()
}

/// Markup for one diary row
#[derive(Debug, Clone, Default)]
pub struct DiaryRowHtml {
    pub title: String,
    pub slug: Option<String>,
    pub year: Option<String>,
    /// Half stars, rendered as `rated-N`
    pub half_stars: Option<u8>,
    /// `YYYY-MM-DD`, rendered as a `/for/YYYY/MM/DD/` day link
    pub date: Option<String>,
    pub rewatch: bool,
    pub tags: Vec<String>,
}

impl DiaryRowHtml {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    #[must_use]
    pub fn year(mut self, year: &str) -> Self {
        self.year = Some(year.to_string());
        self
    }

    #[must_use]
    pub const fn half_stars(mut self, half_stars: u8) -> Self {
        self.half_stars = Some(half_stars);
        self
    }

    #[must_use]
    pub fn date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    #[must_use]
    pub const fn rewatch(mut self) -> Self {
        self.rewatch = true;
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    pub fn to_html(&self) -> String {
        let day = self
            .date
            .as_deref()
            .map(|d| {
                let path = d.replace('-', "/");
                format!(r#"<a href="/u/films/diary/for/{path}/">{d}</a>"#)
            })
            .unwrap_or_default();
        let href = self
            .slug
            .as_deref()
            .map(|s| format!(r#" href="/u/film/{s}/""#))
            .unwrap_or_default();
        let year = self
            .year
            .as_deref()
            .map(|y| format!(r#"<span>{y}</span>"#))
            .unwrap_or_default();
        let rating = self
            .half_stars
            .map(|n| format!(r#"<span class="rating rated-{n}"></span>"#))
            .unwrap_or_default();
        let rewatch = if self.rewatch {
            r#"<span class="icon-rewatch"></span>"#
        } else {
            ""
        };
        let tags: String = self
            .tags
            .iter()
            .map(|t| format!(r#"<a href="/u/tag/{t}/">{t}</a>"#))
            .collect();

        format!(
            r#"<tr class="diary-entry-row">
<td class="td-day">{day}</td>
<td class="td-film"><h3 class="headline-3"><a{href}>{title}</a></h3></td>
<td class="td-released">{year}</td>
<td class="td-rating">{rating}</td>
<td class="td-rewatch">{rewatch}</td>
<td class="td-tags">{tags}</td>
</tr>"#,
            title = self.title,
        )
    }
}

/// A diary page holding `rows`, with a next-page link when `has_next`
pub fn diary_page_html(rows: &[DiaryRowHtml], has_next: bool) -> String {
    let body: String = rows.iter().map(DiaryRowHtml::to_html).collect();
    let next = if has_next {
        r#"<a class="next" href="/u/films/diary/page/2/">Older</a>"#
    } else {
        ""
    };
    format!(
        r#"<html><body><table class="diary-table"><tbody>{body}</tbody></table>
<div class="paginate-nextprev">{next}</div></body></html>"#
    )
}
