//! # Diary entry model
//!
//! One logged viewing of a film, as scraped from the diary listing or
//! imported from an exported diary file.

use serde::{Deserialize, Serialize};

/// Star rating on Letterboxd's half-star scale (0.5 ★ – 5.0 ★).
///
/// Stored as a count of half stars, so only the ten valid values exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(u8);

impl Rating {
    /// Smallest half-star count (0.5 ★)
    pub const MIN_HALF_STARS: u8 = 1;
    /// Largest half-star count (5.0 ★)
    pub const MAX_HALF_STARS: u8 = 10;

    /// Creates a rating from a half-star count (`rated-N` on the site)
    #[must_use]
    pub const fn from_half_stars(half_stars: u8) -> Option<Self> {
        if half_stars >= Self::MIN_HALF_STARS && half_stars <= Self::MAX_HALF_STARS {
            Some(Self(half_stars))
        } else {
            None
        }
    }

    /// Creates a rating from a star value such as `3.5`
    ///
    /// Values that are not an exact multiple of 0.5 inside the scale are rejected.
    #[must_use]
    pub fn from_stars(stars: f64) -> Option<Self> {
        let doubled = stars * 2.0;
        if !doubled.is_finite() || doubled.fract() != 0.0 {
            return None;
        }
        if doubled < f64::from(Self::MIN_HALF_STARS) || doubled > f64::from(Self::MAX_HALF_STARS) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self::from_half_stars(doubled as u8)
    }

    /// Returns the number of half stars (1–10)
    #[must_use]
    pub const fn half_stars(self) -> u8 {
        self.0
    }

    /// Returns the star value (0.5–5.0)
    #[must_use]
    pub fn stars(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = RatingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_stars(value).ok_or(RatingError::OutOfScale(value))
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.stars()
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.stars())
    }
}

/// Rating conversion errors
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("rating {0} is not a half-star value between 0.5 and 5.0")]
    OutOfScale(f64),
}

/// A single diary entry (one watched-film event)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub title: String,
    /// Release year of the film, not the year it was watched
    pub year: Option<String>,
    pub rating: Option<Rating>,
    /// `YYYY-MM-DD`
    pub watched_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_rewatch: bool,
    /// Film URL slug, only used to pick the right row on a per-date page
    #[serde(skip)]
    pub film_slug: Option<String>,
}

impl DiaryEntry {
    /// Creates an entry with only a title set
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            rating: None,
            watched_date: None,
            tags: Vec::new(),
            is_rewatch: false,
            film_slug: None,
        }
    }

    /// True when the deep scan should revisit this entry's per-date page
    #[must_use]
    pub fn needs_tag_backfill(&self) -> bool {
        self.tags.is_empty() && self.watched_date.is_some()
    }

    /// True when the entry carries the given tag
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_only_half_star_values() {
        assert_eq!(Rating::from_stars(4.0).map(Rating::half_stars), Some(8));
        assert_eq!(Rating::from_stars(0.5).map(Rating::half_stars), Some(1));
        assert_eq!(Rating::from_stars(5.0).map(Rating::half_stars), Some(10));
        assert!(Rating::from_stars(0.0).is_none());
        assert!(Rating::from_stars(3.3).is_none());
        assert!(Rating::from_stars(5.5).is_none());
        assert!(Rating::from_stars(-1.0).is_none());
        assert!(Rating::from_stars(f64::NAN).is_none());
    }

    #[test]
    fn rating_half_star_bounds() {
        assert!(Rating::from_half_stars(0).is_none());
        assert!(Rating::from_half_stars(11).is_none());
        assert!((Rating::from_half_stars(7).unwrap().stars() - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rating_serializes_as_star_value() {
        let json = serde_json::to_string(&Rating::from_half_stars(9).unwrap()).unwrap();
        assert_eq!(json, "4.5");

        let back: Rating = serde_json::from_str("2.5").unwrap();
        assert_eq!(back.half_stars(), 5);
        assert!(serde_json::from_str::<Rating>("2.2").is_err());
    }

    #[test]
    fn backfill_eligibility() {
        let mut entry = DiaryEntry::new("Heat");
        assert!(!entry.needs_tag_backfill());

        entry.watched_date = Some("2024-02-28".to_string());
        assert!(entry.needs_tag_backfill());

        entry.tags.push("cinema".to_string());
        assert!(!entry.needs_tag_backfill());
    }

    #[test]
    fn slug_is_not_serialized() {
        let mut entry = DiaryEntry::new("Heat");
        entry.film_slug = Some("heat-1995".to_string());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("heat-1995"));
    }
}
