use chrono::Timelike;
use daylens_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::model::DisplayWindow;

pub const AXIS_HEIGHT: f64 = 24.0;
const MAJOR_TICK_HEIGHT: f64 = 10.0;
const MINOR_TICK_HEIGHT: f64 = 4.0;
const FONT_SIZE: f64 = 10.0;
const LABEL_Y: f64 = 12.0;
const MIN_MAJOR_SPACING_PX: f64 = 60.0;

/// Render an hour ruler across `[origin_x, viewport.width]` for `window`.
///
/// Major ticks carry `HH:MM` wall-clock labels and, when `grid_height > 0`,
/// a vertical gridline running below the axis.
pub fn render_time_axis(
    viewport: &Viewport,
    origin_x: f64,
    window: &DisplayWindow,
    grid_height: f64,
) -> Vec<RenderCommand> {
    let hours = window.hours();
    let plot_width = viewport.width - origin_x;
    if hours <= 0.0 || plot_width <= 0.0 {
        return Vec::new();
    }

    let x_scale = plot_width / hours;
    let (major, subdivisions) = nice_interval(hours, plot_width);
    let minor = major / f64::from(subdivisions);
    let start_hour = hour_of_day(window);

    let mut commands = Vec::with_capacity(64);
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(origin_x, 0.0, plot_width, AXIS_HEIGHT),
        fill: ThemeToken::AxisBackground.into(),
        border_color: Some(ThemeToken::Border),
        label: None,
        event_id: None,
    });

    // Ticks are aligned to wall-clock multiples of the interval, not to the
    // window start, so a window starting at 07:30 still ticks on the hour.
    let first = ((start_hour / minor).ceil() * minor) - start_hour;
    let mut step = 0u32;
    loop {
        let t = first + f64::from(step) * minor;
        if t > hours + 1e-9 {
            break;
        }
        step += 1;

        let x = origin_x + t * x_scale;
        let wall = start_hour + t;
        if is_aligned(wall, major) {
            commands.push(RenderCommand::DrawLine {
                from: Point::new(x, AXIS_HEIGHT - MAJOR_TICK_HEIGHT),
                to: Point::new(x, AXIS_HEIGHT),
                color: ThemeToken::AxisTick,
                width: 1.0,
            });
            commands.push(RenderCommand::DrawText {
                position: Point::new(x, LABEL_Y),
                text: format_hour(wall),
                color: ThemeToken::TextPrimary,
                font_size: FONT_SIZE,
                align: TextAlign::Center,
            });
            if grid_height > 0.0 {
                commands.push(RenderCommand::DrawLine {
                    from: Point::new(x, AXIS_HEIGHT),
                    to: Point::new(x, AXIS_HEIGHT + grid_height),
                    color: ThemeToken::Gridline,
                    width: 0.5,
                });
            }
        } else {
            commands.push(RenderCommand::DrawLine {
                from: Point::new(x, AXIS_HEIGHT - MINOR_TICK_HEIGHT),
                to: Point::new(x, AXIS_HEIGHT),
                color: ThemeToken::TextMuted,
                width: 0.5,
            });
        }
    }

    commands
}

fn hour_of_day(window: &DisplayWindow) -> f64 {
    let t = window.start.time();
    f64::from(t.num_seconds_from_midnight()) / 3600.0
}

fn is_aligned(t: f64, interval: f64) -> bool {
    let offset = t / interval;
    (offset - offset.round()).abs() < 0.001
}

/// Pick a major tick interval in hours, and how many minor steps split it.
fn nice_interval(hours: f64, width_px: f64) -> (f64, u32) {
    let target_count = (width_px / MIN_MAJOR_SPACING_PX).max(1.0);
    let raw = hours / target_count;

    let nice_values: &[(f64, u32)] = &[
        (0.25, 1),
        (0.5, 2),
        (1.0, 2),
        (2.0, 2),
        (3.0, 3),
        (6.0, 2),
        (12.0, 2),
        (24.0, 4),
    ];
    for &(interval, subs) in nice_values {
        if interval >= raw {
            return (interval, subs);
        }
    }
    (24.0 * (raw / 24.0).ceil(), 4)
}

/// `HH:MM` on a 24-hour clock, wrapping past midnight.
fn format_hour(hours: f64) -> String {
    let minutes = (hours * 60.0).round() as i64;
    let minutes = minutes.rem_euclid(24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
