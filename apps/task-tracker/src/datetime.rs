//! Date/time parsing for user input and the canonical storage format.
//!
//! Users may type any of a handful of loose formats; tasks are always
//! rendered and persisted with [`STORAGE_FORMAT`].

use crate::error::{TaskError, TaskResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Canonical rendering, e.g. `Aug 30 2023 01:00AM`.
pub const STORAGE_FORMAT: &str = "%b %d %Y %I:%M%p";

/// Accepted date formats as (pattern shown to users, chrono format), tried in order.
const DATE_FORMATS: [(&str, &str); 4] = [
    ("dd-MM-yyyy", "%d-%m-%Y"),
    ("yyyy-MM-dd", "%Y-%m-%d"),
    ("dd/MM/yyyy", "%d/%m/%Y"),
    ("yyyy/MM/dd", "%Y/%m/%d"),
];
/// Accepted time formats, same layout as [`DATE_FORMATS`].
const TIME_FORMATS: [(&str, &str); 2] = [("HHmm", "%H%M"), ("HH:mm", "%H:%M")];

/// Parse free-text user input, trying every date format against every time
/// format (date outer, time inner) and returning the first match.
///
/// The date and time must be separate whitespace-delimited words.
pub fn parse_user_input(input: &str) -> TaskResult<NaiveDateTime> {
    let input = input.trim();
    let mut words = input.split_whitespace();
    let (Some(date_word), Some(time_word), None) = (words.next(), words.next(), words.next())
    else {
        return Err(bad_format(input));
    };

    for (date_pattern, date_fmt) in DATE_FORMATS {
        let Ok(date) = NaiveDate::parse_from_str(date_word, date_fmt) else {
            continue;
        };
        for (time_pattern, time_fmt) in TIME_FORMATS {
            if let Ok(time) = NaiveTime::parse_from_str(time_word, time_fmt) {
                tracing::debug!(input, date_pattern, time_pattern, "parsed date/time");
                return Ok(date.and_time(time));
            }
        }
    }
    Err(bad_format(input))
}

fn bad_format(input: &str) -> TaskError {
    TaskError::BadDateTimeFormat {
        input: input.to_string(),
        dates: DATE_FORMATS.iter().map(|(pattern, _)| *pattern).collect(),
        times: TIME_FORMATS.iter().map(|(pattern, _)| *pattern).collect(),
    }
}

/// Render a date-time in the storage format.
pub fn format_stored(dt: &NaiveDateTime) -> String {
    dt.format(STORAGE_FORMAT).to_string()
}

/// Parse a date-time written by [`format_stored`].
pub fn parse_stored(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), STORAGE_FORMAT).ok()
}
