use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::Zone;

/// The half-open time range `[start, end)` that horizontal coordinates are
/// measured against and that bars are clipped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DisplayWindow {
    /// Returns `None` unless `end` is strictly after `start`.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    /// Local midnight to the following midnight of `date` at `offset`.
    pub fn day(date: NaiveDate, offset: FixedOffset) -> Self {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let utc = local_midnight - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
        let start = DateTime::from_naive_utc_and_offset(utc, offset);
        Self {
            start,
            end: start + TimeDelta::days(1),
        }
    }

    /// One calendar day on `zone`'s wall clock. Across a DST change the
    /// window is 23 or 25 hours wide.
    pub fn local_day(date: NaiveDate, zone: &Zone) -> Self {
        let start = zone.start_of_day(date);
        let end = date
            .checked_add_days(Days::new(1))
            .map_or(start + TimeDelta::days(1), |next| zone.start_of_day(next));
        Self { start, end }
    }

    /// Width of the window in hours.
    pub fn hours(&self) -> f64 {
        self.offset_hours(self.end)
    }

    /// Hours from the window start to `t`, unclamped (negative before the window).
    pub fn offset_hours(&self, t: DateTime<FixedOffset>) -> f64 {
        (t - self.start).num_milliseconds() as f64 / 3_600_000.0
    }

    pub fn contains(&self, t: DateTime<FixedOffset>) -> bool {
        t >= self.start && t < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).expect("valid timestamp")
    }

    #[test]
    fn day_window_is_local_midnight_to_midnight() {
        let offset = FixedOffset::east_opt(8 * 3600).expect("valid offset");
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        let w = DisplayWindow::day(date, offset);
        assert_eq!(w.start, ts("2024-03-01T00:00:00+08:00"));
        assert_eq!(w.end, ts("2024-03-02T00:00:00+08:00"));
        assert!((w.hours() - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn local_day_spans_dst_change() {
        let ny = Zone::Named(chrono_tz::America::New_York);
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid date");
        let w = DisplayWindow::local_day(date, &ny);
        assert_eq!(w.start, ts("2024-03-10T00:00:00-05:00"));
        assert_eq!(w.end, ts("2024-03-11T00:00:00-04:00"));
        assert!((w.hours() - 23.0).abs() < f64::EPSILON);

        let utc = FixedOffset::east_opt(0).expect("valid offset");
        assert_eq!(
            DisplayWindow::local_day(date, &Zone::Fixed(utc)),
            DisplayWindow::day(date, utc)
        );
    }

    #[test]
    fn offsets_and_containment() {
        let w = DisplayWindow::new(ts("2024-03-01T00:00:00Z"), ts("2024-03-02T00:00:00Z"))
            .expect("non-empty window");
        assert!((w.offset_hours(ts("2024-03-01T09:30:00Z")) - 9.5).abs() < f64::EPSILON);
        assert!(w.offset_hours(ts("2024-02-29T23:00:00Z")) < 0.0);
        assert!(w.contains(w.start));
        assert!(!w.contains(w.end));
    }

    #[test]
    fn rejects_empty_window() {
        let t = ts("2024-03-01T00:00:00Z");
        assert!(DisplayWindow::new(t, t).is_none());
    }
}
