use chrono::{DateTime, Datelike, Utc};

const PREFIX: &str = "SNBP";

/// Derives the public registration number: `SNBP-<year>-<id padded to 4 digits>`.
///
/// The number is never stored. It depends only on the immutable id and creation time, so it is
/// stable for the lifetime of the record.
#[must_use]
pub fn registration_number(id: i64, created_at: &DateTime<Utc>) -> String {
    format!("{PREFIX}-{}-{id:04}", created_at.year())
}

/// Extracts the id from the last dash-separated segment of a registration number.
/// Only the shape is checked here; the caller regenerates and compares the full number.
pub fn parse_registration_id(number: &str) -> Option<i64> {
    let last = number.trim().rsplit('-').next()?;
    if last.is_empty() || !last.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    last.parse().ok()
}
