//! Google Calendar `events.list` export parser.
//!
//! Accepts either the full API response (`{"timeZone": ..., "items": [...]}`)
//! or a bare array of event resources. Only timed events are kept: all-day
//! entries (which carry `date` instead of `dateTime`) and cancelled events
//! are skipped, and items with unparseable or reversed times are dropped
//! with a warning rather than failing the whole export.
//!
//! Times are shown in the requested [`Zone`], falling back to the listing's
//! `timeZone` and then to each event's exported offset.

use chrono::DateTime;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::{Event, Zone};
use crate::notes::parse_description;

const UNTITLED: &str = "Untitled";

#[derive(Debug, Error)]
pub enum GoogleParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExport {
    Listing(RawListing),
    Items(Vec<RawItem>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListing {
    #[serde(default)]
    time_zone: Option<String>,
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    color_id: Option<String>,
    #[serde(default)]
    start: RawTime,
    #[serde(default)]
    end: RawTime,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawZone {
    #[serde(default)]
    time_zone: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawTime {
    #[serde(default)]
    date_time: Option<String>,
}

/// The calendar's own zone from a listing's `timeZone`, if it has a
/// recognizable one. Bare item arrays carry none.
pub fn calendar_zone(data: &[u8]) -> Option<Zone> {
    let name = serde_json::from_slice::<RawZone>(data).ok()?.time_zone?;
    match name.parse::<chrono_tz::Tz>() {
        Ok(tz) => Some(Zone::Named(tz)),
        Err(_) => {
            warn!(time_zone = %name, "unknown calendar time zone");
            None
        }
    }
}

/// Parse an export into events, ordered by start.
///
/// Timestamps are re-expressed in `zone`, or in the listing's `timeZone`
/// when `zone` is `None`. Without either, each event keeps the offset it
/// was exported with.
pub fn parse_google_events(
    data: &[u8],
    config: &Config,
    zone: Option<Zone>,
) -> Result<Vec<Event>, GoogleParseError> {
    let (items, zone) = match serde_json::from_slice::<RawExport>(data)? {
        RawExport::Listing(listing) => {
            let zone = zone.or_else(|| calendar_zone(data));
            debug!(
                time_zone = ?listing.time_zone,
                shown_in = ?zone.map(|z| z.to_string()),
                items = listing.items.len(),
                "parsing calendar listing"
            );
            (listing.items, zone)
        }
        RawExport::Items(items) => (items, zone),
    };

    let mut events = Vec::with_capacity(items.len());
    for item in items {
        if item.status.as_deref() == Some("cancelled") {
            continue;
        }
        let (Some(start_raw), Some(end_raw)) = (&item.start.date_time, &item.end.date_time) else {
            continue;
        };
        let (start, end) = match (
            DateTime::parse_from_rfc3339(start_raw),
            DateTime::parse_from_rfc3339(end_raw),
        ) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(err), _) | (_, Err(err)) => {
                warn!(id = ?item.id, %err, "skipping event with unparseable time");
                continue;
            }
        };
        let (start, end) = match &zone {
            Some(zone) => (zone.convert(start), zone.convert(end)),
            None => (start, end),
        };
        if end < start {
            warn!(id = ?item.id, %start, %end, "skipping event that ends before it starts");
            continue;
        }

        let style = config.palette.resolve(item.color_id.as_deref());
        let category = item
            .summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNTITLED)
            .to_string();
        let id = item.id.unwrap_or_else(|| {
            start
                .timestamp_nanos_opt()
                .unwrap_or_else(|| start.timestamp())
                .to_string()
        });

        let mut event = Event {
            id,
            category,
            start,
            end,
            color: style.hex,
            label: String::new(),
            emoji: style.emoji,
            notes: parse_description(
                item.description.as_deref().unwrap_or_default(),
                config.notes_preview_chars,
            ),
        };
        event.label = event.default_label();
        events.push(event);
    }

    events.sort_by_key(|e| e.start);
    Ok(events)
}
