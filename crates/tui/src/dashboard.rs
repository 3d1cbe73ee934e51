//! Dashboard state: what is loaded, which tab is open, and how the log is
//! sorted. Rendering lives in `renderer`; this module never touches the
//! terminal.

use anyhow::{Context, Result};
use daylens_core::config::Config;
use daylens_core::layout::{Layout, build_layout, group_by_category};
use daylens_core::model::{DisplayWindow, Event, Zone};
use daylens_core::range::DateRange;
use daylens_core::source::{CachedSource, CalendarSource};
use daylens_core::summary::{Summary, summarize};
use daylens_core::table::{SortColumn, SortState, sorted_log};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Timeline,
    Summary,
    Log,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::Timeline => "Timeline",
            Tab::Summary => "Summary",
            Tab::Log => "Log",
        }
    }
}

/// Timeline data for a single-day range.
pub struct DayView {
    pub window: DisplayWindow,
    pub layout: Layout,
}

pub struct Dashboard<S> {
    source: CachedSource<S>,
    config: Config,
    zone: Zone,
    pub range: DateRange,
    pub events: Vec<Event>,
    pub day: Option<DayView>,
    pub summary: Summary,
    pub sort: SortState,
    pub tab: Tab,
    pub selected: usize,
    pub show_detail: bool,
    /// Why the last reload failed; cleared by the next good one.
    pub error: Option<String>,
}

impl<S: CalendarSource> Dashboard<S> {
    pub fn new(source: S, config: Config, range: DateRange, zone: Zone) -> Result<Self> {
        let source = CachedSource::new(source, config.cache_ttl());
        let mut dashboard = Self {
            source,
            config,
            zone,
            range,
            events: Vec::new(),
            day: None,
            summary: Summary::default(),
            sort: SortState::default(),
            tab: Tab::Summary,
            selected: 0,
            show_detail: false,
            error: None,
        };
        let events = dashboard
            .source
            .fetch(&range)
            .with_context(|| format!("failed to load events for {range}"))?;
        dashboard.apply(events)?;
        dashboard.tab = dashboard.tabs()[0];
        Ok(dashboard)
    }

    /// Drop cached data and pull the range again.
    pub fn refresh(&mut self) -> Result<()> {
        let events = self
            .source
            .refresh(&self.range)
            .with_context(|| format!("failed to reload events for {}", self.range))?;
        self.apply(events)
    }

    /// Refresh from the interactive loop: on failure keep showing the
    /// previous snapshot and remember the error for the status line.
    pub fn reload(&mut self) {
        match self.refresh() {
            Ok(()) => self.error = None,
            Err(err) => {
                let message = format!("{err:#}");
                warn!(error = %message, "refresh failed, keeping previous events");
                self.error = Some(message);
            }
        }
    }

    fn apply(&mut self, events: Vec<Event>) -> Result<()> {
        self.day = if self.range.is_single_day() {
            let window = DisplayWindow::local_day(self.range.start, &self.zone);
            let layout = build_layout(&group_by_category(&events), &window, &self.config.layout)?;
            Some(DayView { window, layout })
        } else {
            None
        };
        self.summary = summarize(&events);
        self.events = events;
        self.selected = self.selected.min(self.events.len().saturating_sub(1));
        info!(range = %self.range, events = self.events.len(), "dashboard loaded");
        Ok(())
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// The timeline tab only exists for single-day ranges.
    pub fn tabs(&self) -> &'static [Tab] {
        if self.day.is_some() {
            &[Tab::Timeline, Tab::Summary, Tab::Log]
        } else {
            &[Tab::Summary, Tab::Log]
        }
    }

    pub fn next_tab(&mut self) {
        let tabs = self.tabs();
        let pos = tabs.iter().position(|&t| t == self.tab).unwrap_or(0);
        self.tab = tabs[(pos + 1) % tabs.len()];
        self.show_detail = false;
    }

    pub fn log_rows(&self) -> Vec<&Event> {
        sorted_log(&self.events, &self.sort)
    }

    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = self.sort.toggle(column);
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.events.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.log_rows().get(self.selected).copied()
    }
}
