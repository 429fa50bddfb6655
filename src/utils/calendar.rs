use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::AdvisorError;

#[inline]
fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Number of Monday–Friday days in the inclusive range `start..=end`.
///
/// Weekends are skipped; public holidays are not modelled, so a range that
/// covers one still counts it. A single weekend day yields `0`.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Result<u32, AdvisorError> {
    if end < start {
        return Err(AdvisorError::InvalidRange { start, end });
    }

    let count = start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !is_weekend(*day))
        .count();

    u32::try_from(count).map_err(|_| {
        AdvisorError::Validation(format!("date range {start}..{end} is too long"))
    })
}

/// Parse a `YYYY-MM-DD` boundary date.
pub fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, AdvisorError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        AdvisorError::Validation(format!("{field} must be a YYYY-MM-DD date, got '{value}': {e}"))
    })
}
