use daylens_protocol::{Color, Fill, Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::summary::Summary;

const HEADER_HEIGHT: f64 = 32.0;
const ROW_HEIGHT: f64 = 24.0;
const SWATCH: f64 = 12.0;
const FONT_SIZE: f64 = 11.0;

/// Canvas height that fits every slice of `summary`.
pub fn summary_height(summary: &Summary) -> f64 {
    HEADER_HEIGHT + summary.slices.len() as f64 * ROW_HEIGHT + 8.0
}

/// Render the time breakdown as a ranked bar table, largest share first.
///
/// Columns: color swatch + category | share bar | `pct% (h)` label.
pub fn render_summary(summary: &Summary, viewport: &Viewport) -> Vec<RenderCommand> {
    if summary.is_empty() {
        return Vec::new();
    }

    let mut slices: Vec<_> = summary.slices.iter().collect();
    slices.sort_by(|a, b| b.hours.total_cmp(&a.hours));

    let col_bar_x = viewport.width * 0.35;
    let col_label_x = viewport.width * 0.78;
    let bar_max_w = col_label_x - col_bar_x - 8.0;

    let mut commands = Vec::with_capacity(slices.len() * 5 + 4);
    commands.push(RenderCommand::BeginGroup {
        id: "summary".into(),
        label: Some("Aggregated Stats".into()),
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, viewport.width, HEADER_HEIGHT),
        fill: ThemeToken::TableHeaderBackground.into(),
        border_color: Some(ThemeToken::Border),
        label: None,
        event_id: None,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(viewport.width / 2.0, HEADER_HEIGHT / 2.0 + 5.0),
        text: summary.title(),
        color: ThemeToken::TextPrimary,
        font_size: 13.0,
        align: TextAlign::Center,
    });

    for (i, slice) in slices.iter().enumerate() {
        let y = HEADER_HEIGHT + i as f64 * ROW_HEIGHT;
        if y > viewport.y + viewport.height {
            break;
        }
        let text_y = y + ROW_HEIGHT / 2.0 + 4.0;
        let fill = Color::from_hex(&slice.color)
            .map(Fill::Solid)
            .unwrap_or(Fill::Theme(ThemeToken::TextMuted));

        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(0.0, y, viewport.width, ROW_HEIGHT),
            fill: if i % 2 == 0 {
                ThemeToken::TableRowEven.into()
            } else {
                ThemeToken::TableRowOdd.into()
            },
            border_color: None,
            label: None,
            event_id: None,
        });
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(8.0, y + (ROW_HEIGHT - SWATCH) / 2.0, SWATCH, SWATCH),
            fill,
            border_color: None,
            label: None,
            event_id: None,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(8.0 + SWATCH + 6.0, text_y),
            text: slice.category.clone(),
            color: ThemeToken::TextPrimary,
            font_size: FONT_SIZE,
            align: TextAlign::Left,
        });
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(
                col_bar_x,
                y + 6.0,
                (bar_max_w * slice.percent / 100.0).max(0.0),
                ROW_HEIGHT - 12.0,
            ),
            fill,
            border_color: Some(ThemeToken::SummaryTrack),
            label: Some(slice.label()),
            event_id: None,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(col_label_x, text_y),
            text: slice.label(),
            color: ThemeToken::TextSecondary,
            font_size: FONT_SIZE,
            align: TextAlign::Left,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
