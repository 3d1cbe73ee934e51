use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time zone {0:?} (expected an offset like +08:00, an IANA name, or \"local\")")]
pub struct UnknownZone(pub String);

/// The zone wall-clock times are shown in. Event filtering, labels and the
/// day window must all use the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// The host zone, with whatever offset is in force on each date.
    Local,
    Fixed(FixedOffset),
    /// An IANA zone, e.g. a calendar's `timeZone`.
    Named(Tz),
}

impl Zone {
    /// Re-express `t` in this zone. DST is resolved per instant.
    pub fn convert(&self, t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            Zone::Local => t.with_timezone(&Local).fixed_offset(),
            Zone::Fixed(offset) => t.with_timezone(offset),
            Zone::Named(tz) => t.with_timezone(tz).fixed_offset(),
        }
    }

    /// First instant of `date` on this zone's wall clock.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<FixedOffset> {
        let midnight = date.and_time(NaiveTime::MIN);
        match self {
            Zone::Local => first_instant(&Local, midnight),
            Zone::Fixed(offset) => first_instant(offset, midnight),
            Zone::Named(tz) => first_instant(tz, midnight),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.convert(Utc::now().fixed_offset()).date_naive()
    }
}

/// A few zones skip midnight on DST days; the day then starts at the first
/// wall-clock time that exists.
fn first_instant<T: TimeZone>(tz: &T, local: NaiveDateTime) -> DateTime<FixedOffset> {
    (0..=2)
        .map(|h| local + TimeDelta::hours(h))
        .find_map(|t| tz.from_local_datetime(&t).earliest())
        .map_or_else(|| tz.from_utc_datetime(&local).fixed_offset(), |t| t.fixed_offset())
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Fixed(offset) => write!(f, "{offset}"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for Zone {
    type Err = UnknownZone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Zone::Local);
        }
        if let Ok(offset) = s.parse::<FixedOffset>() {
            return Ok(Zone::Fixed(offset));
        }
        s.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| UnknownZone(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).expect("valid timestamp")
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    #[test]
    fn parses_offsets_names_and_local() {
        assert_eq!("local".parse::<Zone>(), Ok(Zone::Local));
        assert_eq!(
            "+08:00".parse::<Zone>(),
            Ok(Zone::Fixed(FixedOffset::east_opt(8 * 3600).expect("valid offset")))
        );
        assert_eq!(
            "America/New_York".parse::<Zone>(),
            Ok(Zone::Named(chrono_tz::America::New_York))
        );
        assert!("Mars/Olympus".parse::<Zone>().is_err());
    }

    #[test]
    fn named_zone_follows_dst_per_date() {
        let ny = Zone::Named(chrono_tz::America::New_York);
        assert_eq!(ny.start_of_day(d("2024-01-15")), ts("2024-01-15T00:00:00-05:00"));
        assert_eq!(ny.start_of_day(d("2024-07-01")), ts("2024-07-01T00:00:00-04:00"));

        let summer = ny.convert(ts("2024-07-01T12:00:00Z"));
        assert_eq!(summer.to_rfc3339(), "2024-07-01T08:00:00-04:00");
    }

    #[test]
    fn display_round_trips_through_parse() {
        for text in ["local", "+05:30", "Asia/Shanghai"] {
            let zone: Zone = text.parse().expect("valid zone");
            assert_eq!(zone.to_string(), text);
        }
    }
}
