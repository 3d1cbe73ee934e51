//! User configuration, loaded from an optional TOML file.
//!
//! Every field has a default, so a missing file or a partial file both work.
//! Palette entries given in the file override the built-in entry with the
//! same color id; built-in ids that the file omits are kept.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::LayoutConfig;
use crate::notes::DEFAULT_PREVIEW_CHARS;

/// Palette key used for events without (or with an unknown) color id.
pub const DEFAULT_COLOR_ID: &str = "Default";

/// Cached calendar pulls are reused for this long.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// How events of one calendar color are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub label: String,
    /// `#rrggbb`.
    pub hex: String,
    #[serde(default)]
    pub emoji: String,
}

impl CategoryStyle {
    fn new(label: &str, hex: &str, emoji: &str) -> Self {
        Self {
            label: label.into(),
            hex: hex.into(),
            emoji: emoji.into(),
        }
    }
}

/// Calendar color id → display style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(BTreeMap<String, CategoryStyle>);

impl Palette {
    /// Style for `color_id`, falling back to the `Default` entry.
    pub fn resolve(&self, color_id: Option<&str>) -> CategoryStyle {
        color_id
            .and_then(|id| self.0.get(id))
            .or_else(|| self.0.get(DEFAULT_COLOR_ID))
            .cloned()
            .unwrap_or_else(|| CategoryStyle::new("Default", "#039be5", "🗓️"))
    }

    pub fn insert(&mut self, color_id: impl Into<String>, style: CategoryStyle) {
        self.0.insert(color_id.into(), style);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add built-in entries for any ids this palette does not define.
    fn fill_defaults(&mut self) {
        for (id, style) in Palette::default().0 {
            self.0.entry(id).or_insert(style);
        }
    }
}

impl Default for Palette {
    /// The eleven Google Calendar event colors plus a fallback.
    fn default() -> Self {
        let entries = [
            ("1", CategoryStyle::new("Lavender", "#7986cb", "☕")),
            ("2", CategoryStyle::new("Sage", "#33b679", "😴💤")),
            ("3", CategoryStyle::new("Grape", "#8e24aa", "☕")),
            ("4", CategoryStyle::new("Flamingo", "#e67c73", "🧠")),
            ("5", CategoryStyle::new("Banana", "#f6bf26", "📞")),
            ("6", CategoryStyle::new("Tangerine", "#f4511e", "👨‍💻")),
            ("7", CategoryStyle::new("Peacock", "#039be5", "☕")),
            ("8", CategoryStyle::new("Graphite", "#616161", "📓")),
            ("9", CategoryStyle::new("Blueberry", "#3f51b5", "🍹")),
            ("10", CategoryStyle::new("Basil", "#0b8043", "💤")),
            ("11", CategoryStyle::new("Tomato", "#d50000", "👨‍💻")),
            (DEFAULT_COLOR_ID, CategoryStyle::new("Default", "#039be5", "🗓️")),
        ];
        Self(
            entries
                .into_iter()
                .map(|(id, style)| (id.to_string(), style))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub palette: Palette,
    pub layout: LayoutConfig,
    pub cache_ttl_secs: u64,
    pub notes_preview_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            layout: LayoutConfig::default(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            notes_preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(text)?;
        config.palette.fill_defaults();
        Ok(config)
    }

    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Load `path`, or return the defaults if it does not exist.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Config::from_toml(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.layout.overlap_buffer_secs, 300);
        assert_eq!(config.palette.len(), 12);
    }

    #[test]
    fn palette_falls_back_to_default_entry() {
        let palette = Palette::default();
        assert_eq!(palette.resolve(Some("6")).hex, "#f4511e");
        assert_eq!(palette.resolve(Some("99")).label, "Default");
        assert_eq!(palette.resolve(None).hex, "#039be5");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = Config::from_toml(
            r##"
cache_ttl_secs = 60

[layout]
lane_height = 1.0

[palette.6]
label = "Deep work"
hex = "#ff0000"
"##,
        )
        .expect("valid config");

        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.layout.lane_height, 1.0);
        assert_eq!(config.layout.category_gap, 0.5);
        assert_eq!(config.notes_preview_chars, 50);
        assert_eq!(config.palette.resolve(Some("6")).label, "Deep work");
        assert_eq!(config.palette.resolve(Some("6")).emoji, "");
        assert_eq!(config.palette.resolve(Some("2")).label, "Sage");
    }

    #[test]
    fn missing_file_is_default() {
        let config = load_config(Path::new("/nonexistent/daylens/config.toml"))
            .expect("missing file is not an error");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn rejects_bad_toml() {
        let err = Config::from_toml("cache_ttl_secs = \"soon\"").err();
        assert!(matches!(err, Some(ConfigError::Toml(_))));
    }
}
