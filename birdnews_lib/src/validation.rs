//! Input checks for query dates and regions, plus date range helpers.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::BirdNewsError;

/// Longest range a single query may cover, in days.
pub const MAX_RANGE_DAYS: i64 = 62;

pub const MAX_REGION_LENGTH: usize = 40;

/// Validate an ISO date (YYYY-MM-DD).
pub fn validate_date(input: &str) -> Result<NaiveDate, BirdNewsError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(BirdNewsError::InvalidInput(
            "missing date. Expected format: YYYY-MM-DD (e.g., 2020-02-20)".to_string(),
        ));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        BirdNewsError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2020-02-20)",
            trimmed
        ))
    })
}

/// Validate a from/to pair: both parse, `from <= to`, and the range spans
/// at most [`MAX_RANGE_DAYS`] days (inclusive).
pub fn validate_range(from: &str, to: &str) -> Result<(NaiveDate, NaiveDate), BirdNewsError> {
    let from_date = validate_date(from)?;
    let to_date = validate_date(to)?;
    if from_date > to_date {
        return Err(BirdNewsError::InvalidInput(format!(
            "from date {} is after to date {}",
            from_date, to_date
        )));
    }
    let days = (to_date - from_date).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(BirdNewsError::InvalidInput(format!(
            "date range covers {} days, maximum is {}",
            days, MAX_RANGE_DAYS
        )));
    }
    Ok((from_date, to_date))
}

/// Validate a county section name: lowercase ASCII letters, digits, and hyphens.
pub fn validate_region(input: &str) -> Result<String, BirdNewsError> {
    let trimmed = input.trim().to_ascii_lowercase();
    if trimmed.is_empty() || trimmed.len() > MAX_REGION_LENGTH {
        return Err(BirdNewsError::InvalidInput(format!(
            "region must be 1-{} characters",
            MAX_REGION_LENGTH
        )));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(BirdNewsError::InvalidInput(format!(
            "invalid region '{}'. Use letters, digits, and hyphens only",
            trimmed
        )));
    }
    Ok(trimmed)
}

/// First and last day of the calendar month before `today`.
pub fn previous_month_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_of_month = today.with_day(1).unwrap_or(today);
    let last_of_previous = first_of_month - Duration::days(1);
    let first_of_previous = last_of_previous.with_day(1).unwrap_or(last_of_previous);
    (first_of_previous, last_of_previous)
}

/// Every day from `from` to `to`, inclusive.
pub fn days_in_range(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |day| *day <= to)
}
