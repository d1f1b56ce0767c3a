use chrono::NaiveDate;

use super::number::registration_number;
use crate::types::{Registration, StudentProfile};

/// Parses a birth date given either as `YYYY-MM-DD` or as an RFC3339 timestamp (date part kept).
pub fn parse_birth_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(input)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

/// True only when the supplied number regenerates exactly and the birth date matches the
/// profile. Callers must not reveal which of the two checks failed.
#[must_use]
pub fn matches_announcement(
    reg: &Registration,
    profile: &StudentProfile,
    number: &str,
    birth_date: NaiveDate,
) -> bool {
    let expected = registration_number(reg.id, &reg.created_at);
    expected == number.trim() && profile.tanggal_lahir == Some(birth_date)
}
