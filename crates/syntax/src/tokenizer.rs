// Chunk: docs/chunks/tokenizer_seam - Pluggable tokenizer boundary

//! The seam between the invalidation engine and whatever produces styles.
//!
//! The engine hands a tokenizer a substring of the buffer and a language
//! identifier; the tokenizer answers with styled spans plus the structural
//! facts the engine needs to keep its annotations current. All ranges are
//! character offsets relative to the substring.

use rehighlight_buffer::{Style, TextRange};

use crate::config::ThemeConfig;
use crate::error::{ConfigError, TokenizeError};

/// Everything one tokenizer call reports about a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizeOutput {
    /// Styled regions. Unstyled text is simply absent.
    pub styled_spans: Vec<(TextRange, Style)>,
    /// Regions written in an embedded language, with its identifier.
    pub sub_language_spans: Vec<(TextRange, String)>,
    /// Tokens that may span lines, with their class (e.g. `"string"`).
    pub multi_line_spans: Vec<(TextRange, String)>,
    pub comment_spans: Vec<TextRange>,
}

impl TokenizeOutput {
    /// Moves every range `offset` characters to the right.
    pub fn offset_by(mut self, offset: usize) -> Self {
        for (range, _) in &mut self.styled_spans {
            *range = range.offset_by(offset);
        }
        for (range, _) in &mut self.sub_language_spans {
            *range = range.offset_by(offset);
        }
        for (range, _) in &mut self.multi_line_spans {
            *range = range.offset_by(offset);
        }
        for range in &mut self.comment_spans {
            *range = range.offset_by(offset);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.styled_spans.is_empty()
            && self.sub_language_spans.is_empty()
            && self.multi_line_spans.is_empty()
            && self.comment_spans.is_empty()
    }
}

/// Produces styles and structural spans for a language.
///
/// Implementations must be usable from a worker thread: background
/// highlight jobs call [`tokenize`](Tokenizer::tokenize) off the editing
/// thread with an immutable snapshot.
pub trait Tokenizer: Send + Sync {
    /// Tokenizes `text` as `language`.
    fn tokenize(&self, text: &str, language: &str) -> Result<TokenizeOutput, TokenizeError>;

    /// Returns true if `language` can be tokenized.
    fn supports(&self, language: &str) -> bool;

    /// Called when the theme changes. Tokenizers that style text themselves
    /// rebuild their lookup tables here.
    fn theme_changed(&self, _theme: &ThemeConfig) -> Result<(), ConfigError> {
        Ok(())
    }
}
