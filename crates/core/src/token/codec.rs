//! Decoding and formatting of the 6-digit `DDMMYY` best-before token.
//!
//! Tokens are always read as dates in the 2000s (`"311224"` is 31 Dec 2024).
//! A token that is not exactly six ASCII digits, or that names a day the
//! calendar does not have, decodes to `None`. That is the ordinary "no MHD"
//! outcome, not an error.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Storage layout for the structured date custom field (timestamp at midnight).
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const DISPLAY_FORMAT: &str = "%d.%m.%y";
const DESCRIPTION_FORMAT: &str = "%d.%m.%Y";
const TOKEN_FORMAT: &str = "%d%m%y";

/// A validated best-before date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MhdDate(NaiveDate);

impl MhdDate {
    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// The date as a timestamp at midnight.
    pub fn midnight(self) -> NaiveDateTime {
        self.0.and_time(chrono::NaiveTime::MIN)
    }
}

impl From<MhdDate> for NaiveDate {
    fn from(value: MhdDate) -> Self {
        value.0
    }
}

impl fmt::Display for MhdDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_for_display(*self))
    }
}

/// Check that a (trimmed) token has the `DDMMYY` shape: exactly six ASCII digits.
pub fn is_valid_token_format(token: &str) -> bool {
    token.len() == 6 && token.bytes().all(|b| b.is_ascii_digit())
}

/// Decode a `DDMMYY` token into a calendar date.
///
/// Leading and trailing whitespace is ignored. Returns `None` for anything
/// that is not six digits or not a real date (`"300229"`, `"290225"`, `"000000"`).
pub fn decode(token: &str) -> Option<MhdDate> {
    let token = token.trim();
    if !is_valid_token_format(token) {
        return None;
    }

    let day: u32 = token[0..2].parse().ok()?;
    let month: u32 = token[2..4].parse().ok()?;
    let year2: i32 = token[4..6].parse().ok()?;

    NaiveDate::from_ymd_opt(2000 + year2, month, day).map(MhdDate)
}

/// Short form used in the title suffix: `DD.MM.YY`.
pub fn format_for_display(date: MhdDate) -> String {
    date.0.format(DISPLAY_FORMAT).to_string()
}

/// Long form used inside the description marker: `DD.MM.YYYY`.
pub fn format_for_description(date: MhdDate) -> String {
    date.0.format(DESCRIPTION_FORMAT).to_string()
}

/// Timestamp written to the structured date field, e.g. `2024-12-31 00:00:00.000`.
pub fn format_for_storage(date: MhdDate) -> String {
    date.midnight().format(STORAGE_FORMAT).to_string()
}

/// Inverse of [`decode`].
pub fn format_to_token(date: MhdDate) -> String {
    date.0.format(TOKEN_FORMAT).to_string()
}

/// Whole days from `today` until `date`. Negative once the date has passed.
pub fn days_until(date: MhdDate, today: NaiveDate) -> i64 {
    date.0.signed_duration_since(today).num_days()
}

/// Parse a stored date value back into a calendar date.
///
/// Accepts the storage timestamp, RFC 3339, and plain `YYYY-MM-DD`.
pub fn parse_storage_value(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, STORAGE_FORMAT) {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
