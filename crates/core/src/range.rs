use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("range ends ({end}) before it starts ({start})")]
    Reversed { start: NaiveDate, end: NaiveDate },
    #[error("date arithmetic overflowed around {0}")]
    Overflow(NaiveDate),
}

/// Inclusive range of local calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The timeline is only drawn when exactly one day is selected.
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_single_day() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

/// The ways a user can pick the analysis period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeMode {
    Day(NaiveDate),
    /// The last `n` days up to and including today (`n + 1` dates).
    LastDays(u32),
    /// Monday through Sunday of the week containing the date.
    Week(NaiveDate),
    Custom(NaiveDate, NaiveDate),
}

impl RangeMode {
    pub fn resolve(self, today: NaiveDate) -> Result<DateRange, RangeError> {
        match self {
            RangeMode::Day(date) => Ok(DateRange::single(date)),
            RangeMode::LastDays(n) => {
                let start = today
                    .checked_sub_days(Days::new(u64::from(n)))
                    .ok_or(RangeError::Overflow(today))?;
                DateRange::new(start, today)
            }
            RangeMode::Week(date) => {
                let since_monday = u64::from(date.weekday().num_days_from_monday());
                let monday = date
                    .checked_sub_days(Days::new(since_monday))
                    .ok_or(RangeError::Overflow(date))?;
                let sunday = monday
                    .checked_add_days(Days::new(6))
                    .ok_or(RangeError::Overflow(monday))?;
                DateRange::new(monday, sunday)
            }
            RangeMode::Custom(start, end) => DateRange::new(start, end),
        }
    }
}
