mod cli;
mod dashboard;
mod renderer;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use daylens_core::config::{Config, load_config};
use daylens_core::model::Zone;
use daylens_core::source::{CalendarSource, JsonFileSource};
use daylens_core::svg::render_svg;
use daylens_core::views::summary::{render_summary, summary_height};
use daylens_core::views::timeline::{canvas_height, render_timeline};
use daylens_protocol::Viewport;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::dashboard::Dashboard;

const EXPORT_WIDTH: f64 = 1200.0;
const LOG_ENV: &str = "DAYLENS_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.is_headless())?;

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    let (source, zone) = open_source(&cli.events, config.clone(), cli.tz)?;
    let today = zone.today();
    let range = cli.range_mode(today).resolve(today)?;
    info!(%range, %zone, events = %cli.events.display(), "starting");

    let mut dash = Dashboard::new(source, config, range, zone)?;

    if cli.is_headless() {
        if let Some(path) = &cli.svg {
            write_svg(&dash, path, cli.dark)?;
        }
        if let Some(path) = &cli.json {
            write_json(&dash, path)?;
        }
        return Ok(());
    }

    renderer::run_tui(&mut dash)
}

/// Pick the display zone (requested, else the export's calendar zone, else
/// local) and bind the source to it, so events are filtered and labelled in
/// the same zone the day window is drawn in.
fn open_source(
    path: &Path,
    config: Config,
    requested: Option<Zone>,
) -> Result<(JsonFileSource, Zone)> {
    let source = JsonFileSource::new(path, config);
    let zone = match requested {
        Some(zone) => zone,
        None => source.calendar_zone()?.unwrap_or(Zone::Local),
    };
    Ok((source.with_zone(zone), zone))
}

/// Interactive runs log to a file so output does not corrupt the terminal.
fn init_tracing(headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if headless {
        builder.with_writer(std::io::stderr).init();
    } else {
        let path = std::env::temp_dir().join("daylens.log");
        let file = File::create(&path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }
    Ok(())
}

fn write_svg<S: CalendarSource>(dash: &Dashboard<S>, path: &Path, dark: bool) -> Result<()> {
    let (commands, height) = match &dash.day {
        Some(day) => {
            let height = canvas_height(&day.layout);
            let viewport = Viewport::sized(EXPORT_WIDTH, height);
            (render_timeline(&day.layout, &day.window, &viewport), height)
        }
        None => {
            let height = summary_height(&dash.summary);
            let viewport = Viewport::sized(EXPORT_WIDTH, height);
            (render_summary(&dash.summary, &viewport), height)
        }
    };
    let svg = render_svg(&commands, EXPORT_WIDTH, height, dark);
    std::fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), commands = commands.len(), "svg written");
    Ok(())
}

#[derive(Serialize)]
struct Export<'a> {
    range: &'a daylens_core::range::DateRange,
    time_zone: String,
    layout: Option<&'a daylens_core::layout::Layout>,
    summary: &'a daylens_core::summary::Summary,
}

fn write_json<S: CalendarSource>(dash: &Dashboard<S>, path: &Path) -> Result<()> {
    let export = Export {
        range: &dash.range,
        time_zone: dash.zone().to_string(),
        layout: dash.day.as_ref().map(|day| &day.layout),
        summary: &dash.summary,
    };
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, &export)?;
    info!(path = %path.display(), "json written");
    Ok(())
}
