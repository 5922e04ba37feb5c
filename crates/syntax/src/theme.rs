// Chunk: docs/chunks/syntax_highlighting - Catppuccin Mocha theme for syntax highlighting
// Chunk: docs/chunks/highlight_config - Theme overrides from configuration

//! Syntax theme mapping capture names to styles.
//!
//! A `SyntaxTheme` maps tree-sitter capture names ("keyword", "string",
//! "comment.documentation") to styles. The built-in themes use the
//! Catppuccin Mocha and Latte palettes; a [`ThemeConfig`] selects one by
//! name and overrides individual captures.

use std::collections::{BTreeMap, HashMap};

use rehighlight_buffer::{Color, Style, UnderlineStyle};

use crate::config::{StyleOverride, ThemeConfig};
use crate::error::ConfigError;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

const LATTE_THEME: &str = "catppuccin-latte";

/// Names accepted by [`SyntaxTheme::named`].
pub fn available_themes() -> &'static [&'static str] {
    &[DEFAULT_THEME, LATTE_THEME]
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb {
        r: (hex >> 16) as u8,
        g: (hex >> 8) as u8,
        b: hex as u8,
    }
}

/// The Catppuccin accent colors a theme is built from.
struct Palette {
    mauve: Color,
    blue: Color,
    sapphire: Color,
    green: Color,
    teal: Color,
    pink: Color,
    peach: Color,
    yellow: Color,
    maroon: Color,
    red: Color,
    lavender: Color,
    sky: Color,
    overlay0: Color,
    subtext0: Color,
}

const MOCHA: Palette = Palette {
    mauve: rgb(0xcba6f7),
    blue: rgb(0x89b4fa),
    sapphire: rgb(0x74c7ec),
    green: rgb(0xa6e3a1),
    teal: rgb(0x94e2d5),
    pink: rgb(0xf5c2e7),
    peach: rgb(0xfab387),
    yellow: rgb(0xf9e2af),
    maroon: rgb(0xeba0ac),
    red: rgb(0xf38ba8),
    lavender: rgb(0xb4befe),
    sky: rgb(0x89dceb),
    overlay0: rgb(0x6c7086),
    subtext0: rgb(0xa6adc8),
};

// Light variant
const LATTE: Palette = Palette {
    mauve: rgb(0x8839ef),
    blue: rgb(0x1e66f5),
    sapphire: rgb(0x209fb5),
    green: rgb(0x40a02b),
    teal: rgb(0x179299),
    pink: rgb(0xea76cb),
    peach: rgb(0xfe640b),
    yellow: rgb(0xdf8e1d),
    maroon: rgb(0xe64553),
    red: rgb(0xd20f39),
    lavender: rgb(0x7287fd),
    sky: rgb(0x04a5e5),
    overlay0: rgb(0x9ca0b0),
    subtext0: rgb(0x6c6f85),
};

fn italic(color: Color) -> Style {
    Style {
        fg: color,
        italic: true,
        ..Style::default()
    }
}

fn bold(color: Color) -> Style {
    Style {
        fg: color,
        bold: true,
        ..Style::default()
    }
}

/// A mapping from capture names to styles.
///
/// Lookups fall back from the full capture name to its dotted prefixes, so
/// "function.method.call" resolves through "function.method" to "function".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTheme {
    name: String,
    styles: HashMap<String, Style>,
}

impl SyntaxTheme {
    /// Creates the Catppuccin Mocha syntax theme.
    pub fn catppuccin_mocha() -> Self {
        Self::catppuccin(DEFAULT_THEME, &MOCHA)
    }

    /// Creates the light Catppuccin Latte syntax theme.
    pub fn catppuccin_latte() -> Self {
        Self::catppuccin(LATTE_THEME, &LATTE)
    }

    fn catppuccin(name: &str, p: &Palette) -> Self {
        let entries: &[(&str, Style)] = &[
            ("keyword", Style::fg(p.mauve)),
            ("function", Style::fg(p.blue)),
            ("function.method", Style::fg(p.blue)),
            ("function.macro", Style::fg(p.mauve)),
            ("function.builtin", Style::fg(p.peach)),
            ("type", Style::fg(p.yellow)),
            ("type.builtin", italic(p.yellow)),
            ("constructor", Style::fg(p.sapphire)),
            ("string", Style::fg(p.green)),
            ("string.special", Style::fg(p.pink)),
            ("string.regexp", Style::fg(p.pink)),
            ("escape", Style::fg(p.pink)),
            ("constant", Style::fg(p.peach)),
            ("constant.builtin", Style::fg(p.peach)),
            ("number", Style::fg(p.peach)),
            ("comment", italic(p.overlay0)),
            ("comment.documentation", italic(p.overlay0)),
            ("variable.parameter", italic(p.maroon)),
            ("variable.builtin", Style::fg(p.red)),
            ("property", Style::fg(p.lavender)),
            ("label", italic(p.sapphire)),
            ("punctuation.bracket", Style::fg(p.subtext0)),
            ("punctuation.delimiter", Style::fg(p.subtext0)),
            ("punctuation.special", Style::fg(p.subtext0)),
            ("operator", Style::fg(p.sky)),
            ("attribute", Style::fg(p.yellow)),
            ("tag", Style::fg(p.blue)),
            ("module", Style::fg(p.lavender)),
            ("embedded", Style::fg(p.teal)),
            // Markdown
            ("text.title", bold(p.mauve)),
            ("text.literal", Style::fg(p.green)),
            (
                "text.uri",
                Style {
                    fg: p.blue,
                    underline: UnderlineStyle::Single,
                    ..Style::default()
                },
            ),
            ("text.reference", Style::fg(p.lavender)),
            ("text.emphasis", italic(Color::Default)),
            ("text.strong", bold(Color::Default)),
            ("markup.raw", Style::fg(p.green)),
        ];

        Self {
            name: name.to_string(),
            styles: entries
                .iter()
                .map(|(name, style)| (name.to_string(), *style))
                .collect(),
        }
    }

    /// Returns the built-in theme called `name`.
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            DEFAULT_THEME => Some(Self::catppuccin_mocha()),
            LATTE_THEME => Some(Self::catppuccin_latte()),
            _ => None,
        }
    }

    /// Builds the theme a [`ThemeConfig`] describes.
    pub fn from_config(config: &ThemeConfig) -> Result<Self, ConfigError> {
        let name = config.name.as_deref().unwrap_or(DEFAULT_THEME);
        let mut theme = Self::named(name).ok_or_else(|| ConfigError::Invalid {
            key: "theme.name",
            message: format!("unknown theme `{}`", name),
        })?;
        theme.apply_overrides(&config.overrides)?;
        Ok(theme)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the style for a capture name, if defined.
    ///
    /// First tries an exact match, then progressively shorter prefixes.
    pub fn style_for_capture(&self, name: &str) -> Option<&Style> {
        if let Some(style) = self.styles.get(name) {
            return Some(style);
        }

        let mut prefix = name;
        while let Some(dot_pos) = prefix.rfind('.') {
            prefix = &prefix[..dot_pos];
            if let Some(style) = self.styles.get(prefix) {
                return Some(style);
            }
        }

        None
    }

    /// Sets the style of exactly `capture`.
    pub fn set_style(&mut self, capture: impl Into<String>, style: Style) {
        self.styles.insert(capture.into(), style);
    }

    /// Capture names with an explicit style, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.styles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Applies per-capture overrides on top of the current styles.
    ///
    /// An override starts from the style the capture currently resolves to,
    /// so `keyword.control` with only `bold = true` stays keyword-colored.
    /// Nothing changes if any override is invalid.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, StyleOverride>) -> Result<(), ConfigError> {
        let mut resolved = Vec::with_capacity(overrides.len());
        for (capture, over) in overrides {
            let base = self.style_for_capture(capture).copied().unwrap_or_default();
            resolved.push((capture.clone(), over.apply(capture, base)?));
        }
        for (capture, style) in resolved {
            self.styles.insert(capture, style);
        }
        Ok(())
    }
}

impl Default for SyntaxTheme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}
