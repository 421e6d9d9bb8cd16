//! Attendance events and the month/year period they are bucketed into.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A month/year bucket used for monthly payroll runs, rendered `MM/YYYY`.
///
/// Ordering is chronological.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PeriodKey;
/// use chrono::NaiveDate;
///
/// let key = PeriodKey::from_date(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap());
/// assert_eq!(key.to_string(), "06/2024");
/// assert_eq!("06/2024".parse::<PeriodKey>().unwrap(), key);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    /// Creates a key, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::invalid_input(
                "period",
                format!("month {} is outside 1..=12", month),
            ));
        }
        Ok(Self { year, month })
    }

    /// Truncates a date to its month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns true if `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::from_date(date) == *self
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl FromStr for PeriodKey {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        let malformed = || {
            EngineError::invalid_input("period", format!("'{}' is not in MM/YYYY form", s))
        };
        let (month, year) = s.trim().split_once('/').ok_or_else(malformed)?;
        let month = month.parse::<u32>().map_err(|_| malformed())?;
        let year = year.parse::<i32>().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = EngineError;

    fn try_from(value: String) -> EngineResult<Self> {
        value.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}

/// One raw time-in/time-out row.
///
/// Times stay as text here; they are parsed during aggregation so that a bad
/// value costs a diagnostic instead of the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    /// The employee the row belongs to.
    pub employee_id: String,
    /// The day worked.
    pub date: NaiveDate,
    /// Log-in time of day, `H:MM` 24-hour.
    pub log_in: String,
    /// Log-out time of day, `H:MM` 24-hour.
    pub log_out: String,
}

impl AttendanceEvent {
    /// The month/year bucket this event is counted in.
    pub fn period_key(&self) -> PeriodKey {
        PeriodKey::from_date(self.date)
    }
}
