use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notes::Notes;

/// A single timed calendar event, immutable once fetched.
///
/// Everything downstream (lanes, layout, summary) derives positional or
/// aggregate data from events without modifying them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier from the calendar source. Uniqueness is the source's concern.
    pub id: String,
    /// Grouping key: events sharing a category are stacked into one band.
    pub category: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// Display color as `#rrggbb`.
    pub color: String,
    /// Text drawn next to the bar.
    pub label: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub notes: Notes,
}

/// An event whose end lies before its start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("event {id:?} ends before it starts ({start} > {end})")]
pub struct InvalidInterval {
    pub id: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Event {
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 3_600_000.0
    }

    /// Zero-length events are accepted; negative ones are not.
    pub fn validate(&self) -> Result<(), InvalidInterval> {
        if self.end < self.start {
            return Err(InvalidInterval {
                id: self.id.clone(),
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Local calendar date the event starts on.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// `"09:00-10:30"` in the event's own offset.
    pub fn time_span(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }

    /// `"1.50h ⏳"`.
    pub fn duration_label(&self) -> String {
        format!("{:.2}h ⏳", self.duration_hours())
    }

    /// The text the dashboard shows next to a bar: time span plus duration.
    pub fn default_label(&self) -> String {
        format!("{} ({})", self.time_span(), self.duration_label())
    }
}
