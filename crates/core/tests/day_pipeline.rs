//! Integration test: read a Google Calendar export, lay out one day, and
//! render it to SVG, checking the pieces line up end to end.

use std::path::PathBuf;

use chrono::{FixedOffset, NaiveDate};
use daylens_core::config::Config;
use daylens_core::layout::{LayoutConfig, build_layout, group_by_category};
use daylens_core::model::{DisplayWindow, Zone};
use daylens_core::range::{DateRange, RangeMode};
use daylens_core::source::{CachedSource, CalendarSource, JsonFileSource, parse_google_events};
use daylens_core::summary::summarize;
use daylens_core::svg::render_svg;
use daylens_core::views::timeline::{canvas_height, render_timeline};
use daylens_protocol::Viewport;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/calendar-day.json")
}

fn march_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
}

fn shanghai() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).expect("valid offset")
}

#[test]
fn file_source_filters_to_range() {
    let source = JsonFileSource::new(fixture_path(), Config::default());
    let events = source
        .fetch(&DateRange::single(march_first()))
        .expect("fixture parses");

    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    // The previous night's sleep starts on Feb 29 and the all-day offsite
    // has no time; both are excluded, as is the next day's work.
    assert_eq!(
        ids,
        vec!["standup", "review", "deep-work", "lunch", "reading", "sleep"]
    );
}

#[test]
fn week_range_includes_neighbouring_days() {
    let range = RangeMode::Week(march_first())
        .resolve(march_first())
        .expect("valid range");
    let source = JsonFileSource::new(fixture_path(), Config::default());
    let events = source.fetch(&range).expect("fixture parses");
    assert_eq!(events.len(), 8);
}

#[test]
fn day_layout_matches_expected_lanes() {
    let source = JsonFileSource::new(fixture_path(), Config::default());
    let events = source
        .fetch(&DateRange::single(march_first()))
        .expect("fixture parses");

    let window = DisplayWindow::day(march_first(), shanghai());
    let config = LayoutConfig::default();
    let layout = build_layout(&group_by_category(&events), &window, &config).expect("valid");

    let rows: Vec<(&str, usize)> = layout
        .rows
        .iter()
        .map(|r| (r.name.as_str(), r.lane_count))
        .collect();
    assert_eq!(
        rows,
        vec![("Work", 2), ("Sleep", 1), ("Reading", 1), ("Lunch", 1)]
    );

    let lane = |id: &str| layout.bar(id).map(|b| b.lane_index);
    assert_eq!(lane("standup"), Some(0));
    assert_eq!(lane("review"), Some(1));
    assert_eq!(lane("deep-work"), Some(0));

    let sleep = layout.bar("sleep").expect("sleep bar");
    assert!(sleep.clipped);
    assert_eq!(sleep.x_start, 23.0);
    assert_eq!(sleep.x_end, 24.0);

    let expected_height = 5.0 * config.lane_height + 3.0 * config.category_gap;
    assert!((layout.total_height - expected_height).abs() < 1e-9);
}

#[test]
fn day_renders_to_svg() {
    let data = std::fs::read(fixture_path()).expect("fixture readable");
    let zone = Zone::Fixed(shanghai());
    let events: Vec<_> = parse_google_events(&data, &Config::default(), Some(zone))
        .expect("fixture parses")
        .into_iter()
        .filter(|e| e.date() == march_first())
        .collect();

    let window = DisplayWindow::day(march_first(), shanghai());
    let layout = build_layout(&group_by_category(&events), &window, &LayoutConfig::default())
        .expect("valid");
    let viewport = Viewport::sized(1200.0, canvas_height(&layout));
    let commands = render_timeline(&layout, &window, &viewport);
    let svg = render_svg(&commands, viewport.width, viewport.height, false);

    assert!(svg.contains("#d50000"), "deep work bar uses Tomato");
    assert!(svg.contains(">Reading</text>"));
    assert!(svg.contains("23:00-07:00 (8.00h ⏳)"));
}

#[test]
fn summary_totals_hours() {
    let source = JsonFileSource::new(fixture_path(), Config::default());
    let events = source
        .fetch(&DateRange::single(march_first()))
        .expect("fixture parses");
    let summary = summarize(&events);

    // 1 + 1.5 + 1 + 0.75 + 1 + 8 hours.
    assert!((summary.total_hours - 13.25).abs() < 1e-9);
    let work_hours: f64 = summary
        .slices
        .iter()
        .filter(|s| s.category == "Work")
        .map(|s| s.hours)
        .sum();
    assert!((work_hours - 3.5).abs() < 1e-9);
    // Work appears under three colors.
    assert_eq!(summary.slices.iter().filter(|s| s.category == "Work").count(), 3);
}

#[test]
fn cached_file_source_survives_refresh() {
    let source = JsonFileSource::new(fixture_path(), Config::default());
    let mut cache = CachedSource::new(source, Config::default().cache_ttl());
    let range = DateRange::single(march_first());

    let first = cache.fetch(&range).expect("fetch");
    let refreshed = cache.refresh(&range).expect("refresh");
    assert_eq!(first, refreshed);
}

#[test]
fn display_zone_differs_from_export_offset() {
    let utc = Zone::Fixed(FixedOffset::east_opt(0).expect("valid offset"));
    let source = JsonFileSource::new(fixture_path(), Config::default()).with_zone(utc);
    let events = source
        .fetch(&DateRange::single(march_first()))
        .expect("fixture parses");

    // In UTC the previous night's sleep falls on Feb 29 and tonight's sleep
    // ends before midnight.
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["standup", "review", "deep-work", "lunch", "reading", "sleep"]
    );

    let window = DisplayWindow::local_day(march_first(), &utc);
    let layout = build_layout(&group_by_category(&events), &window, &LayoutConfig::default())
        .expect("valid");
    for bar in &layout.bars {
        assert!(
            bar.x_start < bar.x_end && bar.x_end <= 24.0,
            "{} drawn at {}..{}",
            bar.event_id,
            bar.x_start,
            bar.x_end
        );
        assert!(!bar.clipped, "{} clipped", bar.event_id);
    }

    let standup = layout.bar("standup").expect("standup bar");
    assert_eq!(standup.x_start, 1.0);
    assert_eq!(standup.label_text, "01:00-02:00 (1.00h ⏳)");
    let sleep = layout.bar("sleep").expect("sleep bar");
    assert_eq!((sleep.x_start, sleep.x_end), (15.0, 23.0));
}
