use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Color, Point, Rect};

/// How a shape is filled: either a semantic theme token resolved by the
/// renderer, or a concrete color carried by the data (calendar colors).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Fill {
    Theme(ThemeToken),
    Solid(Color),
}

impl From<ThemeToken> for Fill {
    fn from(token: ThemeToken) -> Self {
        Fill::Theme(token)
    }
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Fill::Solid(color)
    }
}

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for each view. Renderers consume
/// this list sequentially and every command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a hover label and the id of
    /// the calendar event it represents (for hit-testing / detail popups).
    DrawRect {
        rect: Rect,
        fill: Fill,
        border_color: Option<ThemeToken>,
        label: Option<String>,
        event_id: Option<String>,
    },

    /// Draw a text string anchored at a position.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    /// Remove the active clip region.
    ClearClip,

    /// Begin a logical group (a category band, the axis, ...).
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

/// Which side of the text sits on the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
