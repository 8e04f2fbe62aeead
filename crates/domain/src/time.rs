//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp; the persisted form of a [`YearMonth`](crate::year_month::YearMonth).
pub type Timestamp = DateTime<Utc>;
