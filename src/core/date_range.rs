use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{AppError, Result};

/// Date format accepted for range bounds (YYYY-MM-DD)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive day-granularity reporting window
///
/// Construction guarantees `from <= to`, so an empty result always means
/// "no sales" rather than "inverted bounds".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Create a range from two dates, rejecting `from > to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(AppError::invalid_range(format!(
                "from_date ({}) must be before or equal to to_date ({})",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Parse both bounds from `YYYY-MM-DD` strings
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Self::new(parse_date("from_date", from)?, parse_date("to_date", to)?)
    }

    /// Single-day range
    pub fn day(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Number of calendar days covered, both bounds included
    pub fn num_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} a {}",
            self.from.format(DATE_FORMAT),
            self.to.format(DATE_FORMAT)
        )
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        AppError::invalid_range(format!("{} '{}' is not a calendar date: {}", field, value, e))
    })
}
