// Chunk: docs/chunks/highlight_config - TOML configuration and error taxonomy

//! Configuration for one highlighted document.
//!
//! [`HighlightConfig::default()`] is enough to start highlighting. Hosts that
//! let users tune behavior parse a TOML document with
//! [`HighlightConfig::from_toml_str`] or [`HighlightConfig::load`]:
//!
//! ```toml
//! base-language = "rust"
//! highlight-on-change = true
//! max-scan-lines = 2000
//! max-growth-passes = 4
//!
//! [theme]
//! name = "catppuccin-mocha"
//!
//! [theme.overrides.keyword]
//! fg = "#ff8800"
//! bold = true
//! ```
//!
//! Every key is optional. Unknown keys are rejected so typos surface early.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rehighlight_buffer::{Color, Style, UnderlineStyle};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::theme::SyntaxTheme;

/// Lines a boundary scan may visit in each direction before giving up.
pub const DEFAULT_MAX_SCAN_LINES: usize = 2000;

/// Times one cycle may widen its range to follow a multi-line construct.
pub const DEFAULT_MAX_GROWTH_PASSES: usize = 4;

/// Settings for an [`InvalidationController`](crate::InvalidationController).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct HighlightConfig {
    /// Language of text outside every embedded block. `None` disables highlighting.
    pub base_language: Option<String>,
    pub theme: ThemeConfig,
    /// When false, edits only keep the buffer and annotations current.
    pub highlight_on_change: bool,
    pub max_scan_lines: usize,
    pub max_growth_passes: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            base_language: None,
            theme: ThemeConfig::default(),
            highlight_on_change: true,
            max_scan_lines: DEFAULT_MAX_SCAN_LINES,
            max_growth_passes: DEFAULT_MAX_GROWTH_PASSES,
        }
    }
}

impl HighlightConfig {
    /// Returns the default configuration for `language`.
    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            base_language: Some(language.into()),
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: HighlightConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_scan_lines == 0 {
            return Err(ConfigError::Invalid {
                key: "max-scan-lines",
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(language) = &self.base_language {
            if language.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: "base-language",
                    message: "must not be empty".to_string(),
                });
            }
        }
        SyntaxTheme::from_config(&self.theme).map(|_| ())
    }
}

/// Which theme to use and how to adjust it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Built-in theme name. `None` selects the default theme.
    pub name: Option<String>,
    /// Per-capture adjustments, keyed by capture name (e.g. `"keyword"`).
    pub overrides: BTreeMap<String, StyleOverride>,
}

/// Changes to one capture's style. Absent fields keep the theme's value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleOverride {
    /// Foreground as `#rrggbb` or `#rgb`.
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
}

impl StyleOverride {
    /// Applies this override to `base`, the current style of `capture`.
    pub fn apply(&self, capture: &str, base: Style) -> Result<Style, ConfigError> {
        let mut style = base;
        if let Some(fg) = &self.fg {
            style.fg = parse_color(capture, fg)?;
        }
        if let Some(bg) = &self.bg {
            style.bg = parse_color(capture, bg)?;
        }
        if let Some(bold) = self.bold {
            style.bold = bold;
        }
        if let Some(italic) = self.italic {
            style.italic = italic;
        }
        if let Some(underline) = self.underline {
            style.underline = if underline {
                UnderlineStyle::Single
            } else {
                UnderlineStyle::None
            };
        }
        Ok(style)
    }
}

fn parse_color(capture: &str, value: &str) -> Result<Color, ConfigError> {
    Color::from_hex(value).ok_or_else(|| ConfigError::Invalid {
        key: "theme.overrides",
        message: format!("`{}` has invalid color `{}`", capture, value),
    })
}
