//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write as _;

use daylens_protocol::{Fill, RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette for theme tokens; calendar colors are
/// drawn as-is.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:11px">"#,
    );
    let bg = if dark { "#1a1a2e" } else { "#ffffff" };
    let _ = write!(svg, r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#);

    let mut clip_count = 0usize;
    let mut clip_open = false;

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                fill,
                border_color,
                label,
                ..
            } => {
                let (fill, opacity) = resolve_fill(*fill, dark);
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" fill-opacity="{opacity}" rx="2""#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                if let Some(border) = border_color {
                    let _ = write!(
                        svg,
                        r#" stroke="{}" stroke-width="0.5""#,
                        resolve_color(*border, dark)
                    );
                }
                svg.push('>');
                if let Some(label) = label {
                    let _ = write!(svg, "<title>{}</title>", escape_xml(label));
                }
                svg.push_str("</rect>");
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{line_width}"/>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    resolve_color(*color, dark),
                );
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    resolve_color(*color, dark),
                    escape_xml(text),
                );
            }
            RenderCommand::SetClip { rect } => {
                if clip_open {
                    svg.push_str("</g>");
                }
                clip_count += 1;
                let _ = write!(
                    svg,
                    r#"<clipPath id="clip{clip_count}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath><g clip-path="url(#clip{clip_count})">"#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                clip_open = true;
            }
            RenderCommand::ClearClip => {
                if clip_open {
                    svg.push_str("</g>");
                    clip_open = false;
                }
            }
            // Groups carry no visual meaning in a static document.
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }

    if clip_open {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    svg
}

fn resolve_fill(fill: Fill, dark: bool) -> (String, f32) {
    match fill {
        Fill::Solid(color) => (color.to_hex(), color.a),
        // Bands are a faint wash over the background.
        Fill::Theme(ThemeToken::CategoryBand) => {
            (resolve_color(ThemeToken::CategoryBand, dark).into(), 0.08)
        }
        Fill::Theme(token) => (resolve_color(token, dark).into(), 1.0),
    }
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background | ThemeToken::TableRowEven => "#181818",
            ThemeToken::Surface | ThemeToken::TableRowOdd => "#202024",
            ThemeToken::AxisBackground | ThemeToken::TableHeaderBackground => "#26262e",
            ThemeToken::Border | ThemeToken::BarBorder | ThemeToken::SummaryTrack => "#303030",
            ThemeToken::TextPrimary | ThemeToken::CategoryLabel => "#ececec",
            ThemeToken::TextSecondary | ThemeToken::AxisTick => "#bdbdbd",
            ThemeToken::TextMuted | ThemeToken::Gridline => "#616161",
            ThemeToken::CategoryBand => "#9e9e9e",
            ThemeToken::ClipMarker => "#ffd600",
            ThemeToken::SelectionHighlight => "#448aff",
        }
    } else {
        match token {
            ThemeToken::Background | ThemeToken::TableRowEven => "#ffffff",
            ThemeToken::Surface | ThemeToken::TableRowOdd => "#f8f9fa",
            ThemeToken::AxisBackground | ThemeToken::TableHeaderBackground => "#f1f3f5",
            ThemeToken::Border | ThemeToken::BarBorder | ThemeToken::SummaryTrack => "#dee2e6",
            ThemeToken::TextPrimary | ThemeToken::CategoryLabel => "#1a1a2e",
            ThemeToken::TextSecondary | ThemeToken::AxisTick => "#495057",
            ThemeToken::TextMuted | ThemeToken::Gridline => "#adb5bd",
            ThemeToken::CategoryBand => "#808080",
            ThemeToken::ClipMarker => "#e67e22",
            ThemeToken::SelectionHighlight => "#0078d4",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
