// Chunk: docs/chunks/code_buffer - Character-indexed code buffer with style runs
// Chunk: docs/chunks/grapheme_range_arithmetic - Cluster-safe range construction

//! rehighlight-buffer: text storage and range arithmetic for rehighlight.
//!
//! This crate holds everything the incremental highlighter needs to know
//! about text, without knowing anything about languages:
//!
//! - [`TextRange`]: a half-open `(location, length)` span in characters
//! - [`CharSource`]: read access to character-indexed text
//! - [`grapheme`]: cluster-safe range construction
//! - [`CodeBuffer`]: a gap buffer with a line index and style runs
//!
//! # Example
//!
//! ```
//! use rehighlight_buffer::{CodeBuffer, TextRange, Style, Color, NamedColor};
//!
//! let mut buffer = CodeBuffer::from_str("let x = 1;\n");
//! buffer.set_style(TextRange::new(0, 3), Style::fg(Color::Named(NamedColor::Magenta)));
//!
//! // Typing inside the keyword keeps the surrounding style until the next pass
//! let inserted = buffer.replace_inheriting_style(TextRange::new(3, 0), "t");
//! assert_eq!(inserted, TextRange::new(3, 1));
//! assert_eq!(buffer.content(), "lett x = 1;\n");
//! assert_eq!(buffer.style_at(3), Style::fg(Color::Named(NamedColor::Magenta)));
//! ```
//!
//! # Grapheme Safety
//!
//! Offsets are `char` positions. Ranges built from user-visible counts must go
//! through [`grapheme::cluster_range`] or [`grapheme::align_range`] so they
//! never split an emoji, a flag or a combining sequence.

mod code_buffer;
mod gap_buffer;
pub mod grapheme;
mod line_index;
mod source;
mod style;
mod style_runs;
mod types;

pub use code_buffer::CodeBuffer;
pub use line_index::LineIndex;
pub use source::CharSource;
pub use style::{Color, NamedColor, Style, UnderlineStyle};
pub use style_runs::StyleRuns;
pub use types::TextRange;
