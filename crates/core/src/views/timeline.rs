use daylens_protocol::{Color, Fill, Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use super::time_axis::{AXIS_HEIGHT, render_time_axis};
use crate::layout::{LabelAnchor, Layout};
use crate::model::DisplayWindow;

/// Width reserved left of the plot for category names.
pub const LABEL_GUTTER: f64 = 120.0;
/// Pixels per layout unit when there is room for it.
pub const UNIT_PX: f64 = 50.0;
const MIN_CANVAS_HEIGHT: f64 = 400.0;
const PLOT_PAD: f64 = 8.0;
const BAR_THICKNESS: f64 = 15.0;
const MIN_BAR_WIDTH: f64 = 1.0;
const FONT_SIZE: f64 = 10.0;
const CATEGORY_FONT_SIZE: f64 = 12.0;

/// Canvas height that shows `layout` at full scale.
pub fn canvas_height(layout: &Layout) -> f64 {
    (AXIS_HEIGHT + 2.0 * PLOT_PAD + layout.total_height * UNIT_PX).max(MIN_CANVAS_HEIGHT)
}

/// Render a swimlane timeline: hour axis on top, one shaded band per
/// category, and a bar per event in its calendar color.
///
/// Vertical scale shrinks below [`UNIT_PX`] if the viewport is too short.
/// Returns nothing for an empty layout; the caller decides how to show
/// "no data".
pub fn render_timeline(
    layout: &Layout,
    window: &DisplayWindow,
    viewport: &Viewport,
) -> Vec<RenderCommand> {
    let plot_width = viewport.width - LABEL_GUTTER;
    let plot_height = viewport.height - AXIS_HEIGHT - 2.0 * PLOT_PAD;
    if layout.is_empty() || layout.width <= 0.0 || plot_width <= 0.0 || plot_height <= 0.0 {
        return Vec::new();
    }

    let x_scale = plot_width / layout.width;
    let y_scale = if layout.total_height > 0.0 {
        (plot_height / layout.total_height).min(UNIT_PX)
    } else {
        UNIT_PX
    };
    let to_x = |hours: f64| LABEL_GUTTER + hours * x_scale;
    let to_y = |units: f64| AXIS_HEIGHT + PLOT_PAD + units * y_scale;
    let lane_px = layout.lane_height * y_scale;
    let thickness = BAR_THICKNESS.min(lane_px * 0.8);

    let mut commands = Vec::with_capacity(layout.bars.len() * 3 + layout.rows.len() * 4 + 64);
    commands.push(RenderCommand::BeginGroup {
        id: "timeline".into(),
        label: Some("Timeline".into()),
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, viewport.width, viewport.height),
        fill: ThemeToken::Background.into(),
        border_color: None,
        label: None,
        event_id: None,
    });

    commands.extend(render_time_axis(
        viewport,
        LABEL_GUTTER,
        window,
        layout.total_height * y_scale + 2.0 * PLOT_PAD,
    ));

    for row in &layout.rows {
        commands.push(RenderCommand::BeginGroup {
            id: format!("category:{}", row.name),
            label: Some(row.name.clone()),
        });
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(
                LABEL_GUTTER,
                to_y(row.y_top),
                plot_width,
                row.height * y_scale,
            ),
            fill: ThemeToken::CategoryBand.into(),
            border_color: None,
            label: None,
            event_id: None,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(
                LABEL_GUTTER - 8.0,
                to_y(row.y_center) + CATEGORY_FONT_SIZE * 0.35,
            ),
            text: row.name.clone(),
            color: ThemeToken::CategoryLabel,
            font_size: CATEGORY_FONT_SIZE,
            align: TextAlign::Right,
        });
        commands.push(RenderCommand::EndGroup);
    }

    commands.push(RenderCommand::SetClip {
        rect: Rect::new(LABEL_GUTTER, AXIS_HEIGHT, plot_width, plot_height + 2.0 * PLOT_PAD),
    });

    for bar in &layout.bars {
        let x = to_x(bar.x_start);
        let w = ((bar.x_end - bar.x_start) * x_scale).max(MIN_BAR_WIDTH);
        let top = to_y(bar.y_offset) + (lane_px - thickness) / 2.0;
        let center_y = top + thickness / 2.0;

        let fill = Color::from_hex(&bar.color)
            .map(Fill::Solid)
            .unwrap_or(Fill::Theme(ThemeToken::TextMuted));
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x, top, w, thickness),
            fill,
            border_color: Some(ThemeToken::BarBorder),
            label: Some(bar.label_text.clone()),
            event_id: Some(bar.event_id.clone()),
        });

        if bar.clipped {
            commands.push(RenderCommand::DrawLine {
                from: Point::new(x + w, top),
                to: Point::new(x + w, top + thickness),
                color: ThemeToken::ClipMarker,
                width: 2.0,
            });
        }

        commands.push(RenderCommand::DrawText {
            position: Point::new(
                to_x(bar.label.x) + bar.label.x_shift,
                center_y + FONT_SIZE * 0.35,
            ),
            text: bar.label_text.clone(),
            color: ThemeToken::TextPrimary,
            font_size: FONT_SIZE,
            align: text_align(bar.label.anchor),
        });
    }

    commands.push(RenderCommand::ClearClip);
    commands.push(RenderCommand::EndGroup);
    commands
}

fn text_align(anchor: LabelAnchor) -> TextAlign {
    match anchor {
        LabelAnchor::Center => TextAlign::Center,
        LabelAnchor::Left => TextAlign::Left,
        LabelAnchor::Right => TextAlign::Right,
    }
}
