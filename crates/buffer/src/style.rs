// Chunk: docs/chunks/code_buffer - Style types for highlighted text
//!
//! Style attributes written onto buffer text by a highlighting pass.
//!
//! - [`Color`]: Named (16 ANSI), indexed (256), and RGB
//! - [`Style`]: Foreground/background, font flags, underline variants
//!
//! Styles are plain values. The buffer stores them as runs over character
//! positions (see [`StyleRuns`](crate::StyleRuns)); hosts translate them into
//! whatever their text component understands.

// =============================================================================
// Color Types
// =============================================================================

/// The 16 standard ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// Color representation.
///
/// - Default (let the host/theme decide)
/// - Named ANSI colors (16 colors)
/// - Indexed (256-color palette)
/// - True color RGB (24-bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Default foreground/background (host decides).
    #[default]
    Default,
    /// Named ANSI colors (0-15).
    Named(NamedColor),
    /// 256-color palette index.
    Indexed(u8),
    /// 24-bit RGB color.
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Parses `#rrggbb` or `#rgb` (the leading `#` is optional).
    ///
    /// Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Color> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => Some(Color::Rgb {
                r: u8::from_str_radix(&hex[0..2], 16).ok()?,
                g: u8::from_str_radix(&hex[2..4], 16).ok()?,
                b: u8::from_str_radix(&hex[4..6], 16).ok()?,
            }),
            3 => {
                let expand = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                Some(Color::Rgb {
                    r: expand(0).ok()?,
                    g: expand(1).ok()?,
                    b: expand(2).ok()?,
                })
            }
            _ => None,
        }
    }
}

// =============================================================================
// Underline Types
// =============================================================================

/// Underline rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnderlineStyle {
    /// No underline.
    #[default]
    None,
    /// Single straight underline.
    Single,
    /// Double straight underline.
    Double,
    /// Curly/wavy underline.
    Curly,
    /// Dotted underline.
    Dotted,
    /// Dashed underline.
    Dashed,
}

// =============================================================================
// Style
// =============================================================================

/// Text styling attributes assigned to a run of characters.
///
/// The default style is unstyled text: default colors, no attributes.
///
/// # Example
///
/// ```
/// use rehighlight_buffer::{Style, Color, NamedColor};
///
/// let keyword = Style {
///     fg: Color::Named(NamedColor::Magenta),
///     bold: true,
///     ..Style::default()
/// };
/// assert!(!keyword.is_plain());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Dim/faint intensity.
    pub dim: bool,
    /// Underline style.
    pub underline: UnderlineStyle,
    /// Underline color (None = use fg color).
    pub underline_color: Option<Color>,
    /// Strikethrough line.
    pub strikethrough: bool,
}

impl Style {
    /// Creates a style with only a foreground color set.
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Style::default()
        }
    }

    /// Returns true if this is the default (unstyled) style.
    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }
}
