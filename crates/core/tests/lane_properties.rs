//! Property tests for lane packing and layout.
//!
//! Intervals are generated on a minute grid within one day so that exact
//! boundary cases (back-to-back events, shared starts) come up often.

use chrono::{DateTime, FixedOffset, TimeDelta};
use daylens_core::lanes::{assign_lanes_with_buffer, default_buffer, max_overlap};
use daylens_core::layout::{LayoutConfig, build_layout, group_by_category};
use daylens_core::model::{DisplayWindow, Event};
use daylens_core::notes::Notes;
use proptest::prelude::*;

fn day_start() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z").expect("valid timestamp")
}

fn make_event(i: usize, category: &str, start_min: i64, len_min: i64) -> Event {
    let start = day_start() + TimeDelta::minutes(start_min);
    Event {
        id: format!("e{i}"),
        category: category.into(),
        start,
        end: start + TimeDelta::minutes(len_min),
        color: "#039be5".into(),
        label: format!("e{i}"),
        emoji: String::new(),
        notes: Notes::default(),
    }
}

/// Up to 40 events, starting anywhere in the day, 1 minute to 4 hours long.
fn positive_events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec((0i64..1440, 1i64..240), 0..40).prop_map(|spans| {
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (start, len))| make_event(i, "Work", start, len))
            .collect()
    })
}

/// Like `positive_events` but allowing zero-length events and a few categories.
fn mixed_events() -> impl Strategy<Value = Vec<Event>> {
    let categories = prop::sample::select(vec!["Work", "Sleep", "Gym"]);
    prop::collection::vec((categories, 0i64..1440, 0i64..600), 0..40).prop_map(|spans| {
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (category, start, len))| make_event(i, category, start, len))
            .collect()
    })
}

proptest! {
    #[test]
    fn lane_count_equals_max_overlap(events in positive_events()) {
        let a = assign_lanes_with_buffer(&events, TimeDelta::zero()).expect("valid events");
        prop_assert_eq!(a.lane_count, max_overlap(&events));
    }

    #[test]
    fn same_lane_events_never_overlap_beyond_buffer(events in mixed_events()) {
        let buffer = default_buffer();
        let a = assign_lanes_with_buffer(&events, buffer).expect("valid events");
        prop_assert_eq!(a.lanes.len(), events.len());

        for (pos, &i) in a.order.iter().enumerate() {
            for &j in &a.order[pos + 1..] {
                if a.lanes[i] == a.lanes[j] {
                    // j was packed after i, so it must start after i ends (less the buffer).
                    prop_assert!(events[j].start >= events[i].end - buffer,
                        "{} and {} collide in lane {}", events[i].id, events[j].id, a.lanes[i]);
                }
            }
        }
        prop_assert!(a.lanes.iter().all(|&lane| lane < a.lane_count.max(1)));
    }

    #[test]
    fn packing_ignores_input_permutation(
        events in positive_events(),
        seed in any::<u64>(),
    ) {
        // Distinct starts make the sorted order unique, so any shuffle must
        // give every event the same lane.
        let mut events = events;
        for (i, e) in events.iter_mut().enumerate() {
            e.start += TimeDelta::seconds(i as i64);
            e.end += TimeDelta::seconds(i as i64);
        }
        let base = assign_lanes_with_buffer(&events, default_buffer()).expect("valid events");

        let mut shuffled: Vec<(usize, Event)> = events.iter().cloned().enumerate().collect();
        let n = shuffled.len().max(1) as u64;
        shuffled.rotate_left((seed % n) as usize);
        shuffled.reverse();

        let only: Vec<Event> = shuffled.iter().map(|(_, e)| e.clone()).collect();
        let other = assign_lanes_with_buffer(&only, default_buffer()).expect("valid events");
        for (pos, (original, _)) in shuffled.iter().enumerate() {
            prop_assert_eq!(other.lanes[pos], base.lanes[*original]);
        }
        prop_assert_eq!(other.lane_count, base.lane_count);
    }

    #[test]
    fn layout_is_idempotent_and_bounded(events in mixed_events()) {
        let window = DisplayWindow::new(day_start(), day_start() + TimeDelta::days(1))
            .expect("non-empty window");
        let groups = group_by_category(&events);
        let config = LayoutConfig::default();

        let first = build_layout(&groups, &window, &config).expect("valid events");
        let second = build_layout(&groups, &window, &config).expect("valid events");
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(first.bars.len(), events.len());
        for bar in &first.bars {
            prop_assert!(bar.x_start >= 0.0 && bar.x_start <= bar.x_end && bar.x_end <= 24.0);
            prop_assert!(bar.y_offset >= 0.0 && bar.y_offset < first.total_height);
            let event = events.iter().find(|e| e.id == bar.event_id).expect("bar maps to event");
            prop_assert_eq!(bar.clipped, event.end > window.end);
        }
    }
}
