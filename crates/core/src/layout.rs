//! Timeline layout: turns per-category lane assignments into coordinates.
//!
//! Vertical units are abstract (one lane is [`LayoutConfig::lane_height`]
//! tall); horizontal units are hours since the display window start. View
//! transforms in [`crate::views`] scale both into pixels.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lanes::{OVERLAP_BUFFER_SECS, assign_lanes_with_buffer};
use crate::model::{DisplayWindow, Event, InvalidInterval};

/// Horizontal nudge, in pixels, applied to labels anchored at a bar edge.
pub const LABEL_X_SHIFT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub lane_height: f64,
    /// Blank space between consecutive category bands.
    pub category_gap: f64,
    pub overlap_buffer_secs: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            lane_height: 0.4,
            category_gap: 0.5,
            overlap_buffer_secs: OVERLAP_BUFFER_SECS,
        }
    }
}

impl LayoutConfig {
    pub fn overlap_buffer(&self) -> TimeDelta {
        TimeDelta::seconds(self.overlap_buffer_secs)
    }
}

/// Which side of the label text touches its anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelAnchor {
    Center,
    /// Text extends to the right of the anchor.
    Left,
    /// Text extends to the left of the anchor.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub anchor: LabelAnchor,
    /// Anchor position in layout x units (hours).
    pub x: f64,
    /// Extra pixel offset applied by the renderer.
    pub x_shift: f64,
}

impl LabelPlacement {
    /// Rotate label positions through middle, end, start so that labels of
    /// neighbouring bars are less likely to collide.
    fn cycle(rank: usize, x_start: f64, x_end: f64, clipped: bool) -> Self {
        match rank % 3 {
            0 => Self {
                anchor: LabelAnchor::Center,
                x: x_start + (x_end - x_start) / 2.0,
                x_shift: 0.0,
            },
            // A clipped bar ends at the window edge, so the text goes inside.
            1 if clipped => Self {
                anchor: LabelAnchor::Right,
                x: x_end,
                x_shift: -LABEL_X_SHIFT,
            },
            1 => Self {
                anchor: LabelAnchor::Left,
                x: x_end,
                x_shift: LABEL_X_SHIFT,
            },
            _ => Self {
                anchor: LabelAnchor::Right,
                x: x_start,
                x_shift: -LABEL_X_SHIFT,
            },
        }
    }
}

/// Where one event's bar goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPosition {
    pub event_id: String,
    pub category: String,
    pub lane_index: usize,
    /// Center of the category band (the row label position).
    pub y_center: f64,
    /// Top of this event's lane.
    pub y_offset: f64,
    pub x_start: f64,
    pub x_end: f64,
    pub label: LabelPlacement,
    /// The true end lies past the window end and `x_end` was clamped.
    pub clipped: bool,
    pub color: String,
    pub label_text: String,
}

/// One category band, used for axis tick labels and band backgrounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub name: String,
    pub y_top: f64,
    pub y_center: f64,
    pub height: f64,
    pub lane_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub bars: Vec<LayoutPosition>,
    pub rows: Vec<CategoryRow>,
    /// Vertical extent of all bands and the gaps between them.
    pub total_height: f64,
    /// Horizontal extent (window width in hours).
    pub width: f64,
    pub lane_height: f64,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn bar(&self, event_id: &str) -> Option<&LayoutPosition> {
        self.bars.iter().find(|b| b.event_id == event_id)
    }
}

/// Group events by category, keeping input order within each group.
pub fn group_by_category(events: &[Event]) -> BTreeMap<String, Vec<Event>> {
    let mut groups: BTreeMap<String, Vec<Event>> = BTreeMap::new();
    for event in events {
        groups
            .entry(event.category.clone())
            .or_default()
            .push(event.clone());
    }
    groups
}

/// Lay out every category against `window`.
///
/// Categories are stacked in reverse-lexicographic order starting at
/// `y = 0`; empty categories take no space. Bars are clamped to the window
/// horizontally. Fails on the first event whose end precedes its start.
pub fn build_layout(
    events_by_category: &BTreeMap<String, Vec<Event>>,
    window: &DisplayWindow,
    config: &LayoutConfig,
) -> Result<Layout, InvalidInterval> {
    let width = window.hours();
    let buffer = config.overlap_buffer();

    let mut bars = Vec::new();
    let mut rows: Vec<CategoryRow> = Vec::new();
    let mut current_y = 0.0;

    for (name, events) in events_by_category.iter().rev() {
        if events.is_empty() {
            continue;
        }
        if !rows.is_empty() {
            current_y += config.category_gap;
        }

        let assignment = assign_lanes_with_buffer(events, buffer)?;
        debug!(
            category = %name,
            events = events.len(),
            lanes = assignment.lane_count,
            "packed category"
        );

        let height = assignment.lane_count as f64 * config.lane_height;
        let y_top = current_y;
        let y_center = y_top + height / 2.0;
        rows.push(CategoryRow {
            name: name.clone(),
            y_top,
            y_center,
            height,
            lane_count: assignment.lane_count,
        });

        for (rank, &idx) in assignment.order.iter().enumerate() {
            let event = &events[idx];
            let lane_index = assignment.lanes[idx];

            let x_start = window.offset_hours(event.start).max(0.0).min(width);
            let x_end = window.offset_hours(event.end).max(x_start).min(width);
            let clipped = event.end > window.end;

            bars.push(LayoutPosition {
                event_id: event.id.clone(),
                category: name.clone(),
                lane_index,
                y_center,
                y_offset: y_top + lane_index as f64 * config.lane_height,
                x_start,
                x_end,
                label: LabelPlacement::cycle(rank, x_start, x_end, clipped),
                clipped,
                color: event.color.clone(),
                label_text: event.label.clone(),
            });
        }

        current_y += height;
    }

    Ok(Layout {
        bars,
        rows,
        total_height: current_y,
        width,
        lane_height: config.lane_height,
    })
}
