//! Date handling: normalizing result date labels and computing the search
//! window.
//!
//! Result pages label each article either relatively (`"3h ago"`) or with a
//! month and day (`"May 14"`), occasionally followed by a year for older
//! results (`"Dec. 20, 2022"`). [`normalize`] turns any of these into an
//! absolute timestamp relative to a caller-supplied `now`.

use crate::errors::DateParseError;
use chrono::{Datelike, Duration, Month, Months, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Date format typed into the date-range picker.
pub const DATE_INPUT_FORMAT: &str = "%m/%d/%Y";
/// Date format used by the `startDate`/`endDate` search query parameters.
pub const DATE_QUERY_FORMAT: &str = "%Y%m%d";
/// Row format for normalized dates.
pub const ROW_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static HOURS_AGO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*h\s+ago$").expect("valid relative date regex"));

static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2})(?:,\s*(\d{4}))?$").expect("valid absolute date regex")
});

/// Convert a result's date label into an absolute timestamp.
///
/// - `"<N>h ago"` resolves to `now - N hours`, keeping the time of day.
/// - `"<Month> <Day>"` resolves to midnight of that day in `now`'s year. A
///   label from last December read in January therefore lands in the
///   future; that is the observed behavior and is kept as is.
/// - `"<Month> <Day>, <Year>"` resolves to midnight of that exact day.
///
/// # Arguments
///
/// * `label` - Date label as shown on the result
/// * `now` - The reference time relative labels are resolved against
///
/// # Errors
///
/// - [`DateParseError::Unrecognized`] if the label matches no known shape
/// - [`DateParseError::InvalidDate`] if it does but names no real date,
///   such as `"Feb 30"`
pub fn normalize(label: &str, now: NaiveDateTime) -> Result<NaiveDateTime, DateParseError> {
    let label = label.trim();

    if let Some(caps) = HOURS_AGO_RE.captures(label) {
        let hours: i64 = caps[1]
            .parse()
            .map_err(|_| DateParseError::InvalidDate(label.to_string()))?;
        let delta = Duration::try_hours(hours)
            .ok_or_else(|| DateParseError::InvalidDate(label.to_string()))?;
        return now
            .checked_sub_signed(delta)
            .ok_or_else(|| DateParseError::InvalidDate(label.to_string()));
    }

    if let Some(caps) = MONTH_DAY_RE.captures(label) {
        let month = caps[1]
            .parse::<Month>()
            .map_err(|_| DateParseError::Unrecognized(label.to_string()))?;
        let day: u32 = caps[2]
            .parse()
            .map_err(|_| DateParseError::InvalidDate(label.to_string()))?;
        let year = match caps.get(3) {
            Some(year) => year
                .as_str()
                .parse()
                .map_err(|_| DateParseError::InvalidDate(label.to_string()))?,
            None => now.year(),
        };
        return NaiveDate::from_ymd_opt(year, month.number_from_month(), day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| DateParseError::InvalidDate(label.to_string()));
    }

    Err(DateParseError::Unrecognized(label.to_string()))
}

/// Inclusive search window in calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Window covering the current month and the `months - 1` before it,
    /// ending today. `0` and `1` both mean "this month so far".
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let today = NaiveDate::from_ymd_opt(2023, 5, 30).unwrap();
    /// let range = DateRange::past_months(3, today);
    /// assert_eq!(range.start, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
    /// assert_eq!(range.end, today);
    /// ```
    pub fn past_months(months: u32, today: NaiveDate) -> Self {
        let first_of_month = today.with_day(1).unwrap_or(today);
        let start = first_of_month
            .checked_sub_months(Months::new(months.saturating_sub(1)))
            .unwrap_or(first_of_month);
        Self { start, end: today }
    }

    pub fn start_input(&self) -> String {
        self.start.format(DATE_INPUT_FORMAT).to_string()
    }

    pub fn end_input(&self) -> String {
        self.end.format(DATE_INPUT_FORMAT).to_string()
    }

    pub fn start_query(&self) -> String {
        self.start.format(DATE_QUERY_FORMAT).to_string()
    }

    pub fn end_query(&self) -> String {
        self.end.format(DATE_QUERY_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_input(), self.end_input())
    }
}
