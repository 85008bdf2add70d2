//! Diary list parser
//!
//! Turns a diary listing page (or a per-date diary page, which uses the same
//! row markup) into [`DiaryEntry`] values. Every field is looked up through
//! its own selector fallback list; a field nothing matches is left empty and
//! a row without a title is dropped.

#![allow(clippy::uninlined_format_args)]

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::config::DiaryListSelectors;
use super::{ContextualParser, ParseContext, ParsingError, ParsingResult};
use crate::domain::{DiaryEntry, Rating};

lazy_static! {
    /// Whole class token `rated-N`
    static ref RATING_CLASS: Regex = Regex::new(r"^rated-(\d+)$").expect("rating class pattern");
    /// Day link `/…/for/YYYY/MM/DD/`
    static ref DIARY_DATE_HREF: Regex =
        Regex::new(r"/for/(\d{4})/(\d{2})/(\d{2})/").expect("diary date pattern");
    /// Film link `/…/film/{slug}/`
    static ref FILM_SLUG_HREF: Regex = Regex::new(r"/film/([^/]+)/").expect("film slug pattern");
}

/// Rows parsed from one diary page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiaryListing {
    pub entries: Vec<DiaryEntry>,
    pub has_next: bool,
}

/// Parser for diary listing and per-date pages
pub struct DiaryListParser {
    row_selectors: Vec<Selector>,
    title_selectors: Vec<Selector>,
    year_selectors: Vec<Selector>,
    rating_selectors: Vec<Selector>,
    date_selectors: Vec<Selector>,
    rewatch_selectors: Vec<Selector>,
    tag_selectors: Vec<Selector>,
    next_page_selectors: Vec<Selector>,
}

impl DiaryListParser {
    /// Create a parser with the default selector tables
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&DiaryListSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &DiaryListSelectors) -> ParsingResult<Self> {
        Ok(Self {
            row_selectors: Self::compile_selectors("row", &selectors.row)?,
            title_selectors: Self::compile_selectors("title", &selectors.title)?,
            year_selectors: Self::compile_selectors("year", &selectors.year)?,
            rating_selectors: Self::compile_selectors("rating", &selectors.rating)?,
            date_selectors: Self::compile_selectors("watched_date", &selectors.watched_date)?,
            rewatch_selectors: Self::compile_selectors("rewatch", &selectors.rewatch)?,
            tag_selectors: Self::compile_selectors("tags", &selectors.tags)?,
            next_page_selectors: Self::compile_selectors("next_page", &selectors.next_page)?,
        })
    }

    /// Compile a fallback list, skipping selectors that fail to parse
    fn compile_selectors(field: &str, selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
        let mut selectors = Vec::new();
        let mut errors = Vec::new();

        for selector_str in selector_strings {
            match Selector::parse(selector_str) {
                Ok(selector) => selectors.push(selector),
                Err(e) => {
                    let err = ParsingError::invalid_selector(selector_str, &e.to_string());
                    warn!("Skipping selector for '{}': {}", field, err);
                    errors.push(err.to_string());
                }
            }
        }

        if selectors.is_empty() {
            return Err(ParsingError::no_valid_selectors(field, errors));
        }

        Ok(selectors)
    }

    /// Parse every diary row of a document
    pub fn parse_entries(&self, html: &Html) -> Vec<DiaryEntry> {
        self.rows(html)
            .into_iter()
            .filter_map(|row| self.parse_row(row))
            .collect()
    }

    /// Check whether the page links to a next page
    pub fn has_next_page(&self, html: &Html) -> bool {
        self.next_page_selectors
            .iter()
            .any(|selector| html.select(selector).next().is_some())
    }

    /// Pick the tags for one film out of a per-date page
    ///
    /// With a slug, rows whose title link does not mention it are skipped and
    /// the first remaining row decides, even when it has no tags. Without a
    /// slug, the first row that has any tags wins.
    pub fn find_date_tags(&self, html: &Html, slug: Option<&str>) -> Vec<String> {
        for row in self.rows(html) {
            if let Some(slug) = slug {
                // A row without a title link is taken as the match; a link
                // without an href never contains the slug
                if let Some(anchor) = self.title_anchor(row) {
                    let href = anchor.value().attr("href").unwrap_or_default();
                    if !href.contains(slug) {
                        continue;
                    }
                }
                return self.extract_tags(row);
            }

            let tags = self.extract_tags(row);
            if !tags.is_empty() {
                return tags;
            }
        }

        Vec::new()
    }

    /// Rows from the first row selector that matches anything
    fn rows<'a>(&self, html: &'a Html) -> Vec<ElementRef<'a>> {
        for selector in &self.row_selectors {
            let rows: Vec<ElementRef<'a>> = html.select(selector).collect();
            if !rows.is_empty() {
                return rows;
            }
        }
        Vec::new()
    }

    /// Extract one entry; `None` when the row has no title
    fn parse_row(&self, row: ElementRef<'_>) -> Option<DiaryEntry> {
        let (title, film_slug) = first_match(row, &self.title_selectors, |anchor| {
            let title = element_text(anchor)?;
            let slug = anchor
                .value()
                .attr("href")
                .and_then(|href| FILM_SLUG_HREF.captures(href))
                .map(|caps| caps[1].to_string());
            Some((title, slug))
        })?;

        Some(DiaryEntry {
            year: first_match(row, &self.year_selectors, element_text),
            rating: first_match(row, &self.rating_selectors, |el| {
                el.value().classes().find_map(decode_rating_class)
            }),
            watched_date: first_match(row, &self.date_selectors, |anchor| {
                anchor.value().attr("href").and_then(decode_diary_date)
            }),
            is_rewatch: self
                .rewatch_selectors
                .iter()
                .any(|selector| row.select(selector).next().is_some()),
            tags: self.extract_tags(row),
            title,
            film_slug,
        })
    }

    /// Tag texts from the first tag selector that yields any
    fn extract_tags(&self, row: ElementRef<'_>) -> Vec<String> {
        for selector in &self.tag_selectors {
            let tags: Vec<String> = row.select(selector).filter_map(element_text).collect();
            if !tags.is_empty() {
                return tags;
            }
        }
        Vec::new()
    }

    fn title_anchor<'a>(&self, row: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.title_selectors
            .iter()
            .find_map(|selector| row.select(selector).next())
    }
}

impl ContextualParser for DiaryListParser {
    type Output = DiaryListing;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        let entries = self.parse_entries(html);
        let has_next = self.has_next_page(html);

        debug!(
            "Parsed {} diary entries from {} (has_next: {})",
            entries.len(),
            context,
            has_next
        );

        DiaryListing { entries, has_next }
    }
}

/// Apply `extract` to the first element of each selector in order and return
/// the first value produced
fn first_match<'a, T>(
    element: ElementRef<'a>,
    selectors: &[Selector],
    extract: impl Fn(ElementRef<'a>) -> Option<T>,
) -> Option<T> {
    selectors
        .iter()
        .find_map(|selector| element.select(selector).next().and_then(&extract))
}

/// Whitespace-normalized text of an element, `None` when blank
fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(text).filter(|t| !t.is_empty())
}

/// Decode a `rated-N` class token into a rating of N/2 stars
pub fn decode_rating_class(token: &str) -> Option<Rating> {
    let caps = RATING_CLASS.captures(token)?;
    let half_stars: u8 = caps[1].parse().ok()?;
    Rating::from_half_stars(half_stars)
}

/// Decode a `/for/YYYY/MM/DD/` link into `YYYY-MM-DD`
pub fn decode_diary_date(href: &str) -> Option<String> {
    let caps = DIARY_DATE_HREF.captures(href)?;
    Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LISTING: &str = r#"
        <html><body><table><tbody>
        <tr class="diary-entry-row">
            <td class="td-day"><a href="/dave/films/diary/for/2024/02/28/">28</a></td>
            <td class="td-film"><h3 class="headline-3">
                <a href="/dave/film/heat-1995/">  Heat </a>
            </h3></td>
            <td class="td-released"><span>1995</span></td>
            <td class="td-rating"><span class="rating rated-8">★★★★</span></td>
            <td class="td-rewatch"><span class="icon-rewatch"></span></td>
            <td class="td-tags">
                <a href="/dave/tag/cinema/">cinema</a><a href="/dave/tag/x/">  </a>
            </td>
        </tr>
        <tr class="diary-entry-row">
            <td class="td-day"><a href="/dave/films/diary/2024-02-27">27</a></td>
            <td class="td-film"><h3><a href="/dave/film/alien/">Alien</a></h3></td>
            <td class="td-rating"><span class="rating">—</span></td>
            <td class="td-rewatch"></td>
        </tr>
        <tr class="diary-entry-row">
            <td class="td-film"><h3><a href="/dave/film/ghost/"></a></h3></td>
        </tr>
        </tbody></table>
        <div class="paginate-nextprev">
            <a class="next" href="/dave/films/diary/page/2/">Older</a>
        </div>
        </body></html>
    "#;

    #[test]
    fn default_selectors_compile() {
        assert!(DiaryListParser::new().is_ok());
    }

    #[test]
    fn invalid_selector_is_skipped_when_others_compile() {
        let selectors = DiaryListSelectors {
            year: vec!["td[".to_string(), ".td-released span".to_string()],
            ..DiaryListSelectors::default()
        };
        assert!(DiaryListParser::with_config(&selectors).is_ok());
    }

    #[test]
    fn all_invalid_selectors_is_an_error() {
        let selectors = DiaryListSelectors {
            rating: vec!["td[".to_string()],
            ..DiaryListSelectors::default()
        };
        let err = DiaryListParser::with_config(&selectors).err().unwrap();
        assert!(matches!(
            err,
            ParsingError::NoValidSelectors { ref field, .. } if field == "rating"
        ));
    }

    #[test]
    fn parses_listing_rows() {
        let parser = DiaryListParser::new().unwrap();
        let html = Html::parse_document(LISTING);
        let listing = parser.parse_with_context(&html, &ParseContext::listing(1));

        assert!(listing.has_next);
        assert_eq!(listing.entries.len(), 2, "row without a title is dropped");

        let heat = &listing.entries[0];
        assert_eq!(heat.title, "Heat");
        assert_eq!(heat.film_slug.as_deref(), Some("heat-1995"));
        assert_eq!(heat.year.as_deref(), Some("1995"));
        assert_eq!(heat.rating.map(Rating::half_stars), Some(8));
        assert_eq!(heat.watched_date.as_deref(), Some("2024-02-28"));
        assert!(heat.is_rewatch);
        assert_eq!(heat.tags, vec!["cinema".to_string()]);

        let alien = &listing.entries[1];
        assert_eq!(alien.title, "Alien");
        assert_eq!(alien.year, None);
        assert_eq!(alien.rating, None);
        assert_eq!(alien.watched_date, None, "only /for/YYYY/MM/DD/ links are dates");
        assert!(!alien.is_rewatch);
        assert!(alien.tags.is_empty());
    }

    #[test]
    fn no_next_marker_means_last_page() {
        let parser = DiaryListParser::new().unwrap();
        let html = Html::parse_document(
            r#"<div class="paginate-nextprev"><a class="previous">Newer</a></div>"#,
        );
        assert!(!parser.has_next_page(&html));
        assert!(parser.parse_entries(&html).is_empty());
    }

    #[rstest]
    #[case("rated-1", Some(1))]
    #[case("rated-7", Some(7))]
    #[case("rated-10", Some(10))]
    #[case("rated-0", None)]
    #[case("rated-11", None)]
    #[case("rated-", None)]
    #[case("rated-4x", None)]
    #[case("xrated-4", None)]
    #[case("rated-999", None)]
    fn rating_tokens(#[case] token: &str, #[case] expected: Option<u8>) {
        assert_eq!(decode_rating_class(token).map(Rating::half_stars), expected);
    }

    #[rstest]
    #[case("/dave/films/diary/for/2024/02/28/", Some("2024-02-28"))]
    #[case("https://letterboxd.com/dave/films/diary/for/1999/12/01/", Some("1999-12-01"))]
    #[case("/dave/films/diary/for/2024/2/28/", None)]
    #[case("/dave/films/diary/2024-02-28/", None)]
    fn diary_dates(#[case] href: &str, #[case] expected: Option<&str>) {
        assert_eq!(decode_diary_date(href).as_deref(), expected);
    }

    #[test]
    fn tag_selectors_fall_back_in_order() {
        let parser = DiaryListParser::new().unwrap();
        let html = Html::parse_document(
            r#"<table><tr class="diary-entry-row">
                <td class="td-film"><h3><a href="/u/film/a/">A</a></h3></td>
                <td class="td-tags"></td>
                <td><ul class="tags"><li><a href="/u/tag/rainy-day/">rainy-day</a></li></ul></td>
            </tr></table>"#,
        );
        let entries = parser.parse_entries(&html);
        assert_eq!(entries[0].tags, vec!["rainy-day".to_string()]);
    }

    #[test]
    fn date_tags_match_by_slug() {
        let parser = DiaryListParser::new().unwrap();
        let html = Html::parse_document(
            r#"<table>
            <tr class="diary-entry-row">
                <td class="td-film"><h3><a href="/u/film/first/">First</a></h3></td>
                <td class="td-tags"><a>solo</a></td>
            </tr>
            <tr class="diary-entry-row">
                <td class="td-film"><h3><a href="/u/film/second/">Second</a></h3></td>
            </tr>
            </table>"#,
        );

        assert_eq!(parser.find_date_tags(&html, Some("first")), vec!["solo".to_string()]);
        assert!(
            parser.find_date_tags(&html, Some("second")).is_empty(),
            "matched row without tags"
        );
        assert!(parser.find_date_tags(&html, Some("third")).is_empty(), "no matching row");
        assert_eq!(parser.find_date_tags(&html, None), vec!["solo".to_string()]);
    }

    #[test]
    fn date_tags_skip_title_links_without_href() {
        let parser = DiaryListParser::new().unwrap();
        let html = Html::parse_document(
            r#"<table>
            <tr class="diary-entry-row">
                <td class="td-film"><h3><a>Unlinked</a></h3></td>
                <td class="td-tags"><a>wrong</a></td>
            </tr>
            <tr class="diary-entry-row">
                <td class="td-tags"><a>no-title</a></td>
            </tr>
            </table>"#,
        );

        // The href-less link is skipped; the row with no title link at all matches
        assert_eq!(parser.find_date_tags(&html, Some("heat")), vec!["no-title".to_string()]);
    }
}
