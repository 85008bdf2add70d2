//! Diary CSV import and export
//!
//! Reads the diary file from a Letterboxd data export into the same
//! [`DiaryEntry`] shape the scraper produces, and writes entries back out in
//! that layout.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::domain::{DiaryEntry, Rating};

/// One row of the exported diary file; unknown columns are ignored
#[derive(Debug, Default, Deserialize, Serialize)]
struct DiaryCsvRow {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Rating", default)]
    rating: Option<String>,
    #[serde(rename = "Watched Date", default)]
    watched_date: Option<String>,
    #[serde(rename = "Rewatch", default)]
    rewatch: Option<String>,
    #[serde(rename = "Tags", default)]
    tags: Option<String>,
}

impl DiaryCsvRow {
    fn into_entry(self) -> Option<DiaryEntry> {
        let title = self.name.trim();
        if title.is_empty() {
            return None;
        }

        Some(DiaryEntry {
            title: title.to_string(),
            year: non_blank(self.year),
            rating: non_blank(self.rating)
                .and_then(|r| r.parse::<f64>().ok())
                .and_then(Rating::from_stars),
            watched_date: non_blank(self.watched_date).filter(|d| is_iso_date(d)),
            tags: self.tags.as_deref().map(split_tags).unwrap_or_default(),
            is_rewatch: self.rewatch.as_deref().is_some_and(parse_rewatch),
            film_slug: None,
        })
    }

    fn from_entry(entry: &DiaryEntry) -> Self {
        Self {
            name: entry.title.clone(),
            year: entry.year.clone(),
            rating: entry.rating.map(|r| r.to_string()),
            watched_date: entry.watched_date.clone(),
            rewatch: entry.is_rewatch.then(|| "Yes".to_string()),
            tags: Some(entry.tags.join(", ")).filter(|t| !t.is_empty()),
        }
    }
}

/// Split a comma-separated tag field: trim each tag, drop empties
pub fn split_tags(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rewatch flag: "yes" in any case
pub fn parse_rewatch(field: &str) -> bool {
    field.trim().eq_ignore_ascii_case("yes")
}

fn is_iso_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read diary entries from CSV data
///
/// Rows without a film name are skipped; malformed optional fields are left
/// empty.
pub fn import_diary_csv<R: Read>(reader: R) -> Result<Vec<DiaryEntry>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Vec::new();
    for (index, row) in csv_reader.deserialize::<DiaryCsvRow>().enumerate() {
        // Header is line 1
        let row = row.with_context(|| format!("Malformed diary row at line {}", index + 2))?;
        match row.into_entry() {
            Some(entry) => entries.push(entry),
            None => debug!("Skipping diary row at line {} without a film name", index + 2),
        }
    }

    Ok(entries)
}

/// Read diary entries from an exported `diary.csv`
pub fn import_diary_file(path: &Path) -> Result<Vec<DiaryEntry>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open diary file {}", path.display()))?;
    let entries = import_diary_csv(file)?;
    info!("Imported {} diary entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Write entries in the export layout
pub fn write_diary_csv<W: Write>(writer: W, entries: &[DiaryEntry]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in entries {
        csv_writer
            .serialize(DiaryCsvRow::from_entry(entry))
            .context("Failed to write diary row")?;
    }
    csv_writer.flush().context("Failed to flush diary CSV")?;
    Ok(())
}
