use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::{CalendarSource, SourceError};
use crate::model::Event;
use crate::range::DateRange;

struct CacheEntry {
    events: Vec<Event>,
    fetched_at: Instant,
}

/// Keeps one snapshot per date range for `ttl`.
///
/// Nothing is global: the cache lives as long as its owner, and
/// [`invalidate`](Self::invalidate) / [`refresh`](Self::refresh) are the
/// only ways to drop data early.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    entries: HashMap<DateRange, CacheEntry>,
}

impl<S: CalendarSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Cached events for `range`, fetching when missing or older than the TTL.
    pub fn fetch(&mut self, range: &DateRange) -> Result<Vec<Event>, SourceError> {
        if let Some(entry) = self.entries.get(range)
            && entry.fetched_at.elapsed() < self.ttl
        {
            debug!(%range, events = entry.events.len(), "calendar cache hit");
            return Ok(entry.events.clone());
        }

        debug!(%range, "calendar cache miss");
        let events = self.inner.fetch(range)?;
        self.entries.insert(
            *range,
            CacheEntry {
                events: events.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(events)
    }

    /// Drop every cached snapshot.
    pub fn invalidate(&mut self) {
        info!(ranges = self.entries.len(), "calendar cache invalidated");
        self.entries.clear();
    }

    /// Drop everything and pull `range` again.
    pub fn refresh(&mut self, range: &DateRange) -> Result<Vec<Event>, SourceError> {
        self.invalidate();
        self.fetch(range)
    }

    /// When `range` was last pulled, if it is cached.
    pub fn fetched_at(&self, range: &DateRange) -> Option<Instant> {
        self.entries.get(range).map(|e| e.fetched_at)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}
