//! Calendar month value type.
//!
//! A [`YearMonth`] has no day or time component. It is accepted as text in
//! two layouts, tried in a fixed order:
//!
//! 1. `MM-YYYY` (e.g. `01-2024`)
//! 2. `YYYY-MM` (e.g. `2024-01`)
//!
//! The first layout that matches wins. Both layouts require exactly two month
//! digits and four year digits.
//!
//! Output is always `YYYY-MM`, so text does not round-trip for `MM-YYYY` input.
//! The persisted form is the first day of the month at midnight UTC.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::time::Timestamp;

/// A calendar month: year plus month, nothing finer.
///
/// Ordering and equality only consider `(year, month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

/// Returned when text is neither `MM-YYYY` nor `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{input:?} is not a valid month (expected MM-YYYY or YYYY-MM)")]
pub struct YearMonthParseError {
    pub input: String,
}

impl YearMonth {
    /// Build a month from its parts, `None` when `month` is outside `1..=12`
    /// or `year` is not representable.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// `year * 100 + month`, the ordering key used by range filters.
    #[must_use]
    pub fn sort_key(self) -> i64 {
        i64::from(self.year()) * 100 + i64::from(self.month())
    }

    /// First day of the month, midnight, UTC.
    #[must_use]
    pub fn to_storage_value(self) -> Timestamp {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// Truncate a stored timestamp to its month.
    #[must_use]
    pub fn from_storage_value(value: Timestamp) -> Self {
        let date = value.date_naive();
        Self(date - Days::new(u64::from(date.day0())))
    }

    fn parse_layout(input: &str, year_first: bool) -> Option<Self> {
        let (head_len, tail_len) = if year_first { (4, 2) } else { (2, 4) };
        let (head, rest) = input.split_at_checked(head_len)?;
        let tail = rest.strip_prefix('-')?;
        if tail.len() != tail_len || !all_digits(head) || !all_digits(tail) {
            return None;
        }
        let (year, month) = if year_first { (head, tail) } else { (tail, head) };
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }
}

fn all_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for YearMonth {
    type Err = YearMonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_layout(s, false)
            .or_else(|| Self::parse_layout(s, true))
            .ok_or_else(|| YearMonthParseError {
                input: s.to_string(),
            })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
