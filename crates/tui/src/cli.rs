use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use daylens_core::model::Zone;
use daylens_core::range::RangeMode;

/// Daily schedule analyzer for Google Calendar exports.
///
/// Without --svg/--json an interactive dashboard opens. With no range flag
/// the current day is shown.
#[derive(Debug, Parser)]
#[command(name = "daylens", version, about)]
pub struct Cli {
    /// Google Calendar `events.list` JSON export.
    pub events: PathBuf,

    /// Show a single day.
    #[arg(long, value_name = "DATE", conflicts_with_all = ["last", "week", "from"])]
    pub day: Option<NaiveDate>,

    /// Show the last N days up to today.
    #[arg(long, value_name = "N", conflicts_with_all = ["week", "from"])]
    pub last: Option<u32>,

    /// Show the Monday-Sunday week containing DATE.
    #[arg(long, value_name = "DATE", conflicts_with = "from")]
    pub week: Option<NaiveDate>,

    /// First day of a custom range.
    #[arg(long, value_name = "DATE", requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last day of a custom range.
    #[arg(long, value_name = "DATE", requires = "from")]
    pub to: Option<NaiveDate>,

    /// Zone to show times in: an offset (`+08:00`), an IANA name
    /// (`Asia/Shanghai`) or `local`. Defaults to the export's `timeZone`,
    /// then the local zone.
    #[arg(long, visible_alias = "offset", value_name = "ZONE", allow_hyphen_values = true)]
    pub tz: Option<Zone>,

    /// TOML config file (palette, layout, cache TTL).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the timeline (single day) or summary as SVG and exit.
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Write layout and summary as JSON and exit.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Dark palette for SVG output.
    #[arg(long)]
    pub dark: bool,
}

impl Cli {
    pub fn range_mode(&self, today: NaiveDate) -> RangeMode {
        match (self.day, self.last, self.week, self.from.zip(self.to)) {
            (Some(day), ..) => RangeMode::Day(day),
            (_, Some(n), ..) => RangeMode::LastDays(n),
            (_, _, Some(date), _) => RangeMode::Week(date),
            (_, _, _, Some((from, to))) => RangeMode::Custom(from, to),
            _ => RangeMode::Day(today),
        }
    }

    pub fn is_headless(&self) -> bool {
        self.svg.is_some() || self.json.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("daylens").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    #[test]
    fn defaults_to_today() {
        let cli = parse(&["events.json"]);
        assert_eq!(cli.range_mode(d("2024-03-01")), RangeMode::Day(d("2024-03-01")));
        assert!(!cli.is_headless());
    }

    #[test]
    fn range_flags_map_to_modes() {
        assert_eq!(
            parse(&["e.json", "--last", "7"]).range_mode(d("2024-03-01")),
            RangeMode::LastDays(7)
        );
        assert_eq!(
            parse(&["e.json", "--week", "2024-03-06"]).range_mode(d("2024-03-01")),
            RangeMode::Week(d("2024-03-06"))
        );
        assert_eq!(
            parse(&["e.json", "--from", "2024-02-01", "--to", "2024-02-03"])
                .range_mode(d("2024-03-01")),
            RangeMode::Custom(d("2024-02-01"), d("2024-02-03"))
        );
    }

    #[test]
    fn conflicting_ranges_are_rejected() {
        let err = Cli::try_parse_from(["daylens", "e.json", "--day", "2024-03-01", "--last", "3"]);
        assert!(err.is_err());
        let err = Cli::try_parse_from(["daylens", "e.json", "--from", "2024-03-01"]);
        assert!(err.is_err());
    }

    #[test]
    fn parses_offset_and_outputs() {
        let cli = parse(&["e.json", "--offset", "-05:00", "--svg", "out.svg"]);
        assert_eq!(cli.tz, Some("-05:00".parse().expect("valid zone")));
        assert!(cli.is_headless());

        let cli = parse(&["e.json", "--tz", "Europe/Berlin"]);
        assert_eq!(cli.tz, Some(Zone::Named(chrono_tz::Europe::Berlin)));
        assert!(Cli::try_parse_from(["daylens", "e.json", "--tz", "Atlantis"]).is_err());
    }
}
