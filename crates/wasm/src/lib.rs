//! Browser bindings. Every call is stateless: events come in as JSON and
//! results go back as JSON strings.

use chrono::{FixedOffset, NaiveDate};
use daylens_core::layout::{Layout, LayoutConfig, build_layout, group_by_category};
use daylens_core::model::{DisplayWindow, Event};
use daylens_core::summary::summarize;
use daylens_core::views::timeline::render_timeline;
use daylens_protocol::Viewport;
use wasm_bindgen::prelude::*;

/// Lay out the events that start on `date` (`YYYY-MM-DD`, local to the
/// offset). Returns the layout as JSON.
#[wasm_bindgen]
pub fn layout_day(
    events_json: &str,
    date: &str,
    utc_offset_minutes: i32,
) -> Result<String, JsError> {
    let (layout, _) = day_layout(events_json, date, utc_offset_minutes).map_err(js)?;
    serde_json::to_string(&layout).map_err(|e| JsError::new(&e.to_string()))
}

/// Time per category over all given events, as JSON.
#[wasm_bindgen]
pub fn summarize_events(events_json: &str) -> Result<String, JsError> {
    let events = parse_events(events_json).map_err(js)?;
    serde_json::to_string(&summarize(&events)).map_err(|e| JsError::new(&e.to_string()))
}

/// Render the day's timeline into a viewport, returning render commands as
/// JSON.
#[wasm_bindgen]
pub fn render_day(
    events_json: &str,
    date: &str,
    utc_offset_minutes: i32,
    width: f64,
    height: f64,
    dpr: f64,
) -> Result<String, JsError> {
    let (layout, window) = day_layout(events_json, date, utc_offset_minutes).map_err(js)?;
    let viewport = Viewport {
        dpr,
        ..Viewport::sized(width, height)
    };
    let commands = render_timeline(&layout, &window, &viewport);
    serde_json::to_string(&commands).map_err(|e| JsError::new(&e.to_string()))
}

fn js(message: String) -> JsError {
    JsError::new(&message)
}

fn parse_events(events_json: &str) -> Result<Vec<Event>, String> {
    serde_json::from_str(events_json).map_err(|e| format!("invalid events: {e}"))
}

fn day_layout(
    events_json: &str,
    date: &str,
    utc_offset_minutes: i32,
) -> Result<(Layout, DisplayWindow), String> {
    let date: NaiveDate = date.parse().map_err(|e| format!("invalid date {date:?}: {e}"))?;
    let offset = utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| format!("invalid utc offset: {utc_offset_minutes} minutes"))?;

    let mut events = parse_events(events_json)?;
    events.retain(|e| e.start.with_timezone(&offset).date_naive() == date);

    let window = DisplayWindow::day(date, offset);
    let layout = build_layout(&group_by_category(&events), &window, &LayoutConfig::default())
        .map_err(|e| e.to_string())?;
    Ok((layout, window))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: &str = r##"[
        {"id": "a", "category": "Work", "start": "2024-03-01T09:00:00+01:00",
         "end": "2024-03-01T10:00:00+01:00", "color": "#039be5", "label": "a"},
        {"id": "b", "category": "Work", "start": "2024-03-01T09:30:00+01:00",
         "end": "2024-03-01T11:00:00+01:00", "color": "#039be5", "label": "b"},
        {"id": "c", "category": "Gym", "start": "2024-03-02T07:00:00+01:00",
         "end": "2024-03-02T08:00:00+01:00", "color": "#0b8043", "label": "c"}
    ]"##;

    #[test]
    fn day_layout_filters_by_local_date() {
        let (layout, window) = day_layout(EVENTS, "2024-03-01", 60).expect("lays out");
        assert_eq!(layout.bars.len(), 2);
        assert_eq!(layout.rows.len(), 1);
        assert_eq!(layout.rows[0].lane_count, 2);
        assert_eq!(window.hours(), 24.0);
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(day_layout(EVENTS, "March 1st", 0).is_err());
        assert!(day_layout(EVENTS, "2024-03-01", 24 * 60).is_err());
        assert!(day_layout("{}", "2024-03-01", 0).is_err());
    }

    #[test]
    fn events_parse_without_optional_fields() {
        let events = parse_events(EVENTS).expect("parses");
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.emoji.is_empty()));
        assert_eq!(summarize(&events).total_hours, 3.5);
    }
}
