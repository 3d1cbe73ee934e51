//! Swimlane packing for events that share a category.
//!
//! Events are visited in start order and each goes into the first lane whose
//! last event has ended (minus a small grace buffer), opening a new lane when
//! none qualifies. Because the visit order is by start time, first-fit uses
//! exactly as many lanes as the largest number of events running at once.

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::model::{Event, InvalidInterval};

/// Events that start within this many seconds before a lane frees up may
/// still share it; the gap would not be visible anyway.
pub const OVERLAP_BUFFER_SECS: i64 = 5 * 60;

pub fn default_buffer() -> TimeDelta {
    TimeDelta::seconds(OVERLAP_BUFFER_SECS)
}

/// Result of packing one category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaneAssignment {
    /// Lane index per event, in the caller's input order.
    pub lanes: Vec<usize>,
    /// Number of lanes opened. Zero only for empty input.
    pub lane_count: usize,
    /// Input indices in the order events were packed (start time, ties kept
    /// in input order).
    pub order: Vec<usize>,
}

impl LaneAssignment {
    pub fn lane_of(&self, index: usize) -> Option<usize> {
        self.lanes.get(index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

/// Pack `events` with the standard five-minute buffer.
pub fn assign_lanes(events: &[Event]) -> Result<LaneAssignment, InvalidInterval> {
    assign_lanes_with_buffer(events, default_buffer())
}

/// Pack `events`, letting an event join a lane if it starts no earlier than
/// `buffer` before that lane's current end.
///
/// Input does not need to be sorted. Any event with `end < start` rejects
/// the whole batch.
pub fn assign_lanes_with_buffer(
    events: &[Event],
    buffer: TimeDelta,
) -> Result<LaneAssignment, InvalidInterval> {
    for event in events {
        event.validate()?;
    }

    // `sort_by_key` is stable, so equal starts keep their input order.
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by_key(|&i| events[i].start);

    let mut lane_ends: Vec<DateTime<FixedOffset>> = Vec::new();
    let mut lanes = vec![0; events.len()];

    for &idx in &order {
        let event = &events[idx];
        let lane = match lane_ends
            .iter()
            .position(|&lane_end| event.start >= lane_end - buffer)
        {
            Some(lane) => {
                lane_ends[lane] = event.end;
                lane
            }
            None => {
                lane_ends.push(event.end);
                lane_ends.len() - 1
            }
        };
        lanes[idx] = lane;
    }

    Ok(LaneAssignment {
        lanes,
        lane_count: lane_ends.len(),
        order,
    })
}

/// Largest number of events covering a single instant, treating events as
/// half-open `[start, end)`. Zero-length events cover no instant.
pub fn max_overlap(events: &[Event]) -> usize {
    let mut edges: Vec<(DateTime<FixedOffset>, i32)> = Vec::with_capacity(events.len() * 2);
    for event in events.iter().filter(|e| e.end > e.start) {
        edges.push((event.start, 1));
        edges.push((event.end, -1));
    }
    // Ends sort before starts at the same instant: back-to-back is not overlap.
    edges.sort();

    let mut current = 0i32;
    let mut peak = 0i32;
    for (_, delta) in edges {
        current += delta;
        peak = peak.max(current);
    }
    peak as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{at, event};

    fn work(id: &str, start: (u32, u32), end: (u32, u32)) -> Event {
        event(id, "Work", &at(start.0, start.1), &at(end.0, end.1))
    }

    #[test]
    fn three_event_scenario_uses_two_lanes() {
        let events = vec![
            work("1", (9, 0), (10, 0)),
            work("2", (9, 30), (11, 0)),
            work("3", (10, 30), (11, 30)),
        ];
        let a = assign_lanes_with_buffer(&events, TimeDelta::zero()).expect("valid events");
        assert_eq!(a.lanes, vec![0, 1, 0]);
        assert_eq!(a.lane_count, 2);
        assert_eq!(max_overlap(&events), 2);
    }

    #[test]
    fn single_event_gets_lane_zero() {
        let events = vec![work("1", (13, 0), (14, 0))];
        let a = assign_lanes(&events).expect("valid events");
        assert_eq!(a.lanes, vec![0]);
        assert_eq!(a.lane_count, 1);
    }

    #[test]
    fn empty_input_has_no_lanes() {
        let a = assign_lanes(&[]).expect("empty is valid");
        assert!(a.is_empty());
        assert_eq!(a.lane_count, 0);
        assert_eq!(a.lane_of(0), None);
    }

    #[test]
    fn lanes_map_back_to_input_order() {
        // Same intervals as the scenario, shuffled.
        let events = vec![
            work("3", (10, 30), (11, 30)),
            work("1", (9, 0), (10, 0)),
            work("2", (9, 30), (11, 0)),
        ];
        let a = assign_lanes_with_buffer(&events, TimeDelta::zero()).expect("valid events");
        assert_eq!(a.lanes, vec![0, 0, 1]);
        assert_eq!(a.order, vec![1, 2, 0]);
    }

    #[test]
    fn back_to_back_shares_lane() {
        let events = vec![work("1", (9, 0), (10, 0)), work("2", (10, 0), (11, 0))];
        let a = assign_lanes(&events).expect("valid events");
        assert_eq!(a.lanes, vec![0, 0]);
    }

    #[test]
    fn buffer_boundary_is_inclusive() {
        // Second event starts exactly five minutes before the first ends.
        let events = vec![work("1", (9, 0), (10, 0)), work("2", (9, 55), (10, 30))];
        let a = assign_lanes(&events).expect("valid events");
        assert_eq!(a.lanes, vec![0, 0]);
    }

    #[test]
    fn overlap_beyond_buffer_opens_lane() {
        let first = work("1", (9, 0), (10, 0));
        let mut second = work("2", (9, 55), (10, 30));
        second.start -= TimeDelta::seconds(1);
        let a = assign_lanes(&[first, second]).expect("valid events");
        assert_eq!(a.lanes, vec![0, 1]);
        assert_eq!(a.lane_count, 2);
    }

    #[test]
    fn first_fit_prefers_lowest_lane() {
        let events = vec![
            work("a", (9, 0), (12, 0)),
            work("b", (9, 0), (10, 0)),
            work("c", (9, 0), (10, 0)),
            work("d", (10, 30), (11, 0)),
        ];
        let a = assign_lanes_with_buffer(&events, TimeDelta::zero()).expect("valid events");
        // Lanes 1 and 2 are both free at 10:30; first-fit picks 1.
        assert_eq!(a.lanes, vec![0, 1, 2, 1]);
        assert_eq!(a.lane_count, 3);
    }

    #[test]
    fn equal_starts_keep_input_order() {
        let events = vec![work("x", (9, 0), (9, 30)), work("y", (9, 0), (11, 0))];
        let a = assign_lanes_with_buffer(&events, TimeDelta::zero()).expect("valid events");
        assert_eq!(a.lanes, vec![0, 1]);
        assert_eq!(a.order, vec![0, 1]);
    }

    #[test]
    fn zero_length_event_participates() {
        let events = vec![work("1", (9, 0), (10, 0)), work("2", (9, 30), (9, 30))];
        let a = assign_lanes_with_buffer(&events, TimeDelta::zero()).expect("valid events");
        assert_eq!(a.lanes, vec![0, 1]);
        assert_eq!(max_overlap(&events), 1);
    }

    #[test]
    fn negative_interval_is_rejected() {
        let events = vec![work("ok", (9, 0), (10, 0)), work("bad", (11, 0), (10, 0))];
        let err = assign_lanes(&events).err().map(|e| e.id);
        assert_eq!(err.as_deref(), Some("bad"));
    }
}
