//! Maps source-specific items onto [`SeriesRecord`].
//!
//! Normalization never fails: anything missing or malformed falls back to
//! [`NOT_AVAILABLE`], an empty genre list, or a rating of `0.0`.

use crate::domain::model::{Record, ScrapedRow, SeriesRecord, NOT_AVAILABLE};
use serde_json::Value;

/// First four characters of a date-like string, or `N/A` when empty.
pub fn year_from(text: Option<&str>) -> String {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => t.chars().take(4).collect(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn clamp_rating(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parses rating text such as `8.7` or `8,7`. Anything else is `0.0`.
pub fn parse_rating_text(text: &str) -> f64 {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .map(clamp_rating)
        .unwrap_or(0.0)
}

fn rating_from_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(clamp_rating).unwrap_or(0.0),
        Some(Value::String(s)) => parse_rating_text(s),
        _ => 0.0,
    }
}

fn join_genres<'a>(genres: impl Iterator<Item = &'a str>) -> String {
    genres
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Normalizes one API item (`name`, `premiered`, `rating.average`, `genres`, `url`).
pub fn normalize_api(record: &Record) -> SeriesRecord {
    let field = |key: &str| record.data.get(key);
    let text = |key: &str| field(key).and_then(Value::as_str);

    let genres = match field("genres") {
        Some(Value::Array(items)) => join_genres(items.iter().filter_map(Value::as_str)),
        _ => String::new(),
    };

    SeriesRecord {
        title: text("name").unwrap_or(NOT_AVAILABLE).to_string(),
        year: year_from(text("premiered")),
        rating: rating_from_value(field("rating").and_then(|r| r.get("average"))),
        genres,
        url: text("url").unwrap_or(NOT_AVAILABLE).to_string(),
    }
}

/// Normalizes one scraped chart row.
pub fn normalize_scraped(row: &ScrapedRow) -> SeriesRecord {
    let title = row.title.trim();
    let url = row.url.as_deref().map(str::trim).filter(|u| !u.is_empty());

    SeriesRecord {
        title: if title.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            title.to_string()
        },
        year: year_from(Some(row.year.as_str())),
        rating: parse_rating_text(&row.rating),
        genres: join_genres(row.genres.iter().map(String::as_str)),
        url: url.unwrap_or(NOT_AVAILABLE).to_string(),
    }
}

/// Sorts by rating, highest first. Ties keep their input order.
pub fn sort_by_rating(records: &mut [SeriesRecord]) {
    records.sort_by(|a, b| b.rating.total_cmp(&a.rating));
}

/// Sorts already-normalized records by rating and keeps the first `n`.
pub fn top_n(mut records: Vec<SeriesRecord>, n: usize) -> Vec<SeriesRecord> {
    sort_by_rating(&mut records);
    records.truncate(n);
    records
}

/// Normalizes every item, sorts by rating and keeps the first `n`.
pub fn rank(items: &[Record], n: usize) -> Vec<SeriesRecord> {
    top_n(items.iter().map(normalize_api).collect(), n)
}
