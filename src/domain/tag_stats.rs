//! # Tag statistics
//!
//! Descriptive statistics correlating diary tags with ratings. Everything here
//! is a pure function over an already-built entry list, so the same numbers
//! come out whether the entries were scraped or imported.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use super::diary_entry::{DiaryEntry, Rating};

/// One (entry, tag) pair; entries without tags appear once with `tag: None`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagRow<'a> {
    pub entry: &'a DiaryEntry,
    pub tag: Option<&'a str>,
}

/// Headline numbers for a diary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiarySummary {
    pub entry_count: usize,
    /// Distinct titles with at least one rated entry
    pub rated_titles: usize,
    /// Mean rating over rated (entry, tag) rows; `None` when nothing is rated
    pub average_rating: Option<f64>,
    pub unique_tags: usize,
}

/// Rating statistics for a single tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagStat {
    pub tag: String,
    /// Rated entries carrying the tag
    pub films: usize,
    pub average: f64,
    pub median: f64,
    /// `average` minus the diary's overall average
    pub vs_average: f64,
}

/// Explode entries into one row per tag
#[must_use]
pub fn explode_by_tag(entries: &[DiaryEntry]) -> Vec<TagRow<'_>> {
    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.tags.is_empty() {
            rows.push(TagRow { entry, tag: None });
        } else {
            rows.extend(entry.tags.iter().map(|tag| TagRow {
                entry,
                tag: Some(tag.trim()),
            }));
        }
    }
    rows
}

/// Compute the headline numbers for a diary
#[must_use]
pub fn summarize(entries: &[DiaryEntry]) -> DiarySummary {
    // Averaged over (entry, tag) rows, so an entry counts once per tag
    let ratings: Vec<f64> = explode_by_tag(entries)
        .iter()
        .filter_map(|row| row.entry.rating.map(Rating::stars))
        .collect();

    let rated_titles: HashSet<&str> = entries
        .iter()
        .filter(|e| e.rating.is_some())
        .map(|e| e.title.as_str())
        .collect();

    let unique_tags: HashSet<&str> = entries
        .iter()
        .flat_map(|e| e.tags.iter().map(|t| t.trim()))
        .filter(|t| !t.is_empty())
        .collect();

    DiarySummary {
        entry_count: entries.len(),
        rated_titles: rated_titles.len(),
        average_rating: mean(&ratings),
        unique_tags: unique_tags.len(),
    }
}

/// Per-tag rating statistics, most-used tags first
///
/// Only rated entries count. Tags used on fewer than `min_films` rated
/// entries are left out. Returns an empty list when nothing is rated.
#[must_use]
pub fn compute_tag_stats(entries: &[DiaryEntry], min_films: usize) -> Vec<TagStat> {
    let Some(overall) = summarize(entries).average_rating else {
        return Vec::new();
    };

    let mut by_tag: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in explode_by_tag(entries) {
        if let (Some(tag), Some(rating)) = (row.tag, row.entry.rating) {
            by_tag.entry(tag).or_default().push(rating.stars());
        }
    }

    let mut stats: Vec<TagStat> = by_tag
        .into_iter()
        .filter(|(_, ratings)| ratings.len() >= min_films.max(1))
        .filter_map(|(tag, mut ratings)| {
            let average = mean(&ratings)?;
            let median = median(&mut ratings)?;
            Some(TagStat {
                tag: tag.to_string(),
                films: ratings.len(),
                average: round2(average),
                median: round2(median),
                vs_average: round2(average - overall),
            })
        })
        .collect();

    // BTreeMap already yields tags alphabetically; the stable sort keeps that
    // order among equal counts.
    stats.sort_by(|a, b| b.films.cmp(&a.films));
    stats
}

/// Histogram of ratings over the ten half-star buckets
///
/// Index 0 counts 0.5 ★, index 9 counts 5.0 ★. Counts (entry, tag) rows, the
/// same rows the overall average is taken over; with `tag: None` every rated
/// row is counted.
#[must_use]
pub fn rating_distribution(entries: &[DiaryEntry], tag: Option<&str>) -> [usize; 10] {
    let mut buckets = [0usize; 10];
    for row in explode_by_tag(entries) {
        if tag.is_some_and(|t| row.tag != Some(t)) {
            continue;
        }
        if let Some(rating) = row.entry.rating {
            buckets[usize::from(rating.half_stars() - 1)] += 1;
        }
    }
    buckets
}

/// Entries carrying `tag`, one per title, best rated first
///
/// The first entry of each title is kept; unrated entries sort last.
#[must_use]
pub fn films_with_tag<'a>(entries: &'a [DiaryEntry], tag: &str) -> Vec<&'a DiaryEntry> {
    let mut seen = BTreeSet::new();
    let mut films: Vec<&DiaryEntry> = entries
        .iter()
        .filter(|e| e.has_tag(tag))
        .filter(|e| seen.insert(e.title.as_str()))
        .collect();
    films.sort_by(|a, b| b.rating.cmp(&a.rating));
    films
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
