//! Utility functions for burrow_report
//!
//! This module contains helpers for formatting numbers and millisecond
//! timestamps the way they appear in report cells.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use std::fmt::Display;

/// Cell value used when a timestamp cannot be rendered
const INVALID: &str = "?";

/// Layout of absolute dates in reports; fractional seconds only when non-zero
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const SECONDS_PER_DAY: i64 = 86_400;

/// Formats an integer, optionally grouping thousands with commas
///
/// # Examples
/// ```
/// # use burrow_report::utils::format_number;
/// assert_eq!(format_number(1234567, true), "1,234,567");
/// assert_eq!(format_number(1234567, false), "1234567");
/// ```
pub fn format_number(number: i64, decimal: bool) -> String {
    let digits = number.unsigned_abs().to_string();
    if !decimal {
        return number.to_string();
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if number < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Converts a millisecond timestamp to a local date string, `?` if the
/// instant is out of range
pub fn timestamp_to_date(timestamp: i64) -> String {
    format_date(timestamp, &Local)
}

/// Renders a millisecond timestamp as a date in the given time zone
pub fn format_date<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_millis_opt(timestamp)
        .earliest()
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| INVALID.to_string())
}

/// Time elapsed between a millisecond timestamp and `now`, `?` if the
/// instant is out of range
pub fn age_at(timestamp: i64, now: DateTime<Utc>) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp) {
        Some(then) => format_age(now.signed_duration_since(then)),
        None => INVALID.to_string(),
    }
}

/// Formats a duration as `[N day(s), ]H:MM:SS`
///
/// Sub-second precision is dropped. Negative durations (timestamps in the
/// future) get a leading `-`.
pub fn format_age(delta: TimeDelta) -> String {
    let total = delta.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs() as i64;

    let days = total / SECONDS_PER_DAY;
    let rest = total % SECONDS_PER_DAY;
    let clock = format!("{}:{:02}:{:02}", rest / 3600, rest % 3600 / 60, rest % 60);

    match days {
        0 => format!("{}{}", sign, clock),
        1 => format!("{}1 day, {}", sign, clock),
        _ => format!("{}{} days, {}", sign, days, clock),
    }
}
