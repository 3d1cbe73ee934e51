//! Where events come from.
//!
//! The dashboard works on one pulled snapshot per refresh. A
//! [`CalendarSource`] produces that snapshot for a date range;
//! [`CachedSource`] keeps snapshots around for a TTL and is cleared
//! explicitly with [`CachedSource::invalidate`].

pub mod cache;
pub mod google;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::Config;
use crate::model::{Event, Zone};
use crate::range::DateRange;

pub use cache::CachedSource;
pub use google::{GoogleParseError, calendar_zone, parse_google_events};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("google calendar export: {0}")]
    Google(#[from] GoogleParseError),
}

/// Anything that can list the timed events starting within a date range.
pub trait CalendarSource {
    fn fetch(&self, range: &DateRange) -> Result<Vec<Event>, SourceError>;
}

/// Reads a Google Calendar `events.list` JSON export from disk on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    config: Config,
    zone: Option<Zone>,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            config,
            zone: None,
        }
    }

    /// Show all timestamps in `zone`. Dates are then judged on that zone's
    /// wall clock, which must match the window the events are drawn in.
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = Some(zone);
        self
    }

    /// The zone the export declares for its calendar, if any.
    pub fn calendar_zone(&self) -> Result<Option<Zone>, SourceError> {
        Ok(calendar_zone(&self.read()?))
    }

    fn read(&self) -> Result<Vec<u8>, SourceError> {
        std::fs::read(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CalendarSource for JsonFileSource {
    fn fetch(&self, range: &DateRange) -> Result<Vec<Event>, SourceError> {
        let data = self.read()?;
        let events = parse_google_events(&data, &self.config, self.zone)?;
        Ok(within(events, range))
    }
}

/// A fixed list of events, already normalized. Useful for tests and for
/// front ends that receive events from elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    events: Vec<Event>,
}

impl MemorySource {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl CalendarSource for MemorySource {
    fn fetch(&self, range: &DateRange) -> Result<Vec<Event>, SourceError> {
        Ok(within(self.events.clone(), range))
    }
}

/// Keep events whose local start date is in `range`, ordered by start.
fn within(mut events: Vec<Event>, range: &DateRange) -> Vec<Event> {
    events.retain(|e| range.contains(e.date()));
    events.sort_by_key(|e| e.start);
    events
}
