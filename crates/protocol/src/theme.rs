use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
///
/// Event bars are not themed: they carry their calendar color as a
/// [`Fill::Solid`](crate::Fill::Solid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Surface,
    Border,

    TextPrimary,
    TextSecondary,
    TextMuted,

    // Timeline
    CategoryBand,
    CategoryLabel,
    BarBorder,
    ClipMarker,

    // Time axis
    AxisBackground,
    AxisTick,
    Gridline,

    // Summary / log table
    SummaryTrack,
    TableRowEven,
    TableRowOdd,
    TableHeaderBackground,
    SelectionHighlight,
}
