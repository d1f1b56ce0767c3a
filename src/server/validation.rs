use crate::server::response::ApiError;
use crate::workflow::scoring::SEMESTERS;

const MAX_EMAIL_LEN: usize = 254;
const MAX_TEXT_LEN: usize = 255;
const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 100.0;

/// Returns the trimmed value or a "<field> is required" error.
pub fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    let value = value.as_deref().map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required")));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ApiError::bad_request(format!(
            "{field} cannot exceed {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(value.to_string())
}

/// Trims; empty strings become `None`.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Emails are compared case-insensitively; they are stored trimmed and lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.len() > MAX_EMAIL_LEN {
        return Err(ApiError::bad_request(format!(
            "Email cannot exceed {MAX_EMAIL_LEN} characters"
        )));
    }
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err(ApiError::bad_request("Email is not valid")),
    }
}

pub fn validate_semester(semester: i64) -> Result<(), ApiError> {
    if SEMESTERS.contains(&semester) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "semester must be between {} and {}",
            SEMESTERS[0],
            SEMESTERS[SEMESTERS.len() - 1]
        )))
    }
}

pub fn validate_score(score: f64) -> Result<(), ApiError> {
    if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "nilai must be between {MIN_SCORE} and {MAX_SCORE}"
        )))
    }
}

/// Parses a required status field with one of the type's wire names.
pub fn parse_status<T: Copy + PartialEq + std::fmt::Display>(
    value: Option<&str>,
    field: &str,
    allowed: &[T],
    parse: fn(&str) -> Option<T>,
) -> Result<T, ApiError> {
    let raw = value.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required")));
    }
    match parse(raw) {
        Some(status) if allowed.contains(&status) => Ok(status),
        _ => {
            let names: Vec<String> = allowed.iter().map(ToString::to_string).collect();
            Err(ApiError::bad_request(format!(
                "{field} must be one of {}",
                names.join(", ")
            )))
        }
    }
}
