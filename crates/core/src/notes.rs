//! Cleaning of calendar event descriptions.
//!
//! Calendar descriptions arrive as loose HTML (`<br>`, `<ul><li>`, `<p>`).
//! [`parse_description`] flattens that into the three variants the
//! dashboard shows: an HTML tooltip, a Markdown detail body, and a short
//! one-line preview for the log table.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PREVIEW_CHARS: usize = 50;

const EMPTY_TOOLTIP: &str = "<i>(No notes)</i>";
const EMPTY_MARKDOWN: &str = "_No additional notes_";

#[allow(clippy::expect_used)]
static BLOCK_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</li>|<br>|<br/>|</p>|</div>|</ul>").expect("valid block regex"));
#[allow(clippy::expect_used)]
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("valid tag regex"));

/// Cleaned variants of an event description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notes {
    /// Lines joined with `<br>`, for hover tooltips.
    pub tooltip: String,
    /// Lines joined with newlines, for the detail view.
    pub markdown: String,
    /// Single-line preview, truncated with `...`. Empty when there are no notes.
    pub short: String,
}

impl Notes {
    /// Whether the description carried any text at all.
    pub fn is_empty(&self) -> bool {
        self.short.is_empty()
    }
}

impl Default for Notes {
    fn default() -> Self {
        Self {
            tooltip: EMPTY_TOOLTIP.into(),
            markdown: EMPTY_MARKDOWN.into(),
            short: String::new(),
        }
    }
}

/// Flatten an HTML description.
///
/// List items become `- ` bullets, block ends become line breaks, all other
/// tags are dropped, and blank lines are removed.
pub fn parse_description(raw: &str, preview_chars: usize) -> Notes {
    if raw.is_empty() {
        return Notes::default();
    }

    let text = raw.replace("<li>", "\n- ");
    let text = BLOCK_END.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, "");

    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Notes::default();
    }

    let full = lines.join(" ");
    let short = if full.chars().count() > preview_chars {
        let head: String = full.chars().take(preview_chars).collect();
        format!("{head}...")
    } else {
        full
    };

    Notes {
        tooltip: lines.join("<br>"),
        markdown: lines.join("\n"),
        short,
    }
}
