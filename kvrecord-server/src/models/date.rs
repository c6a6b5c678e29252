//! Day-granularity dates in `dd-mm-yyyy` form
//!
//! One strict policy for every date the API accepts: two-digit day, two-digit
//! month, four-digit year, and a real calendar date.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Input format accepted from clients
pub const INPUT_FORMAT: &str = "%d-%m-%Y";

/// Output format for `created_at` in responses
pub const OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Last second of a day, relative to midnight
const LAST_SECOND_OF_DAY: i64 = 86_399;

/// chrono accepts unpadded fields, so the shape is checked first
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("invalid date regex"));

/// A calendar day parsed from client input
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordDate(NaiveDate);

impl RecordDate {
    /// Parse a strict `dd-mm-yyyy` date.
    ///
    /// Returns `None` for anything else, including ISO dates, unpadded fields
    /// and impossible days such as `31-02-2024`.
    ///
    /// # Example
    /// ```
    /// use kvrecord_server::models::RecordDate;
    ///
    /// assert!(RecordDate::parse("05-05-2024").is_some());
    /// assert!(RecordDate::parse("2024-05-05").is_none());
    /// assert!(RecordDate::parse("5-5-2024").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        if !DATE_RE.is_match(s) {
            return None;
        }
        NaiveDate::parse_from_str(s, INPUT_FORMAT).ok().map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// 00:00:00 of this day.
    pub fn start_of_day(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// 23:59:59 of this day.
    pub fn end_of_day(&self) -> NaiveDateTime {
        self.start_of_day() + Duration::seconds(LAST_SECOND_OF_DAY)
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(OUTPUT_FORMAT))
    }
}

/// Inclusive creation-time window covering whole days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DayRange {
    /// Build a range from raw query bounds.
    ///
    /// Missing or blank bounds are reported before any parsing happens.
    pub fn from_bounds(start: Option<&str>, end: Option<&str>) -> Result<Self, ValidationError> {
        let (start, end) = match (non_blank(start), non_blank(end)) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(ValidationError::MissingRange),
        };

        let start = RecordDate::parse(start).ok_or(ValidationError::InvalidDate)?;
        let end = RecordDate::parse(end).ok_or(ValidationError::InvalidDate)?;

        Ok(Self::days(start, end))
    }

    /// From the start of `first` through the end of `last`.
    pub fn days(first: RecordDate, last: RecordDate) -> Self {
        Self {
            start: first.start_of_day(),
            end: last.end_of_day(),
        }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
