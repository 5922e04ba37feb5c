// Chunk: docs/chunks/code_buffer - Character-indexed code buffer with style runs

//! `CodeBuffer` is the explicit document type the highlighting core works on.
//!
//! It combines a gap buffer (character storage), a line index (line lookups
//! for boundary scans) and style runs (the attributes written by highlight
//! passes). Hosts that keep their own text storage can mirror edits into a
//! `CodeBuffer` and apply the resulting style batches to their own views.

use crate::gap_buffer::GapBuffer;
use crate::grapheme::bounded_range;
use crate::line_index::LineIndex;
use crate::source::CharSource;
use crate::style::Style;
use crate::style_runs::StyleRuns;
use crate::types::TextRange;

/// A text buffer addressed by character position, carrying per-character styles.
#[derive(Debug)]
pub struct CodeBuffer {
    text: GapBuffer,
    line_index: LineIndex,
    styles: StyleRuns,
    /// Mutation counter for sampling debug assertions (debug builds only).
    #[cfg(debug_assertions)]
    debug_mutation_count: u64,
}

impl CodeBuffer {
    /// Creates a new empty buffer.
    pub fn new() -> Self {
        Self::from_str("")
    }

    /// Creates a buffer initialized with the given content, unstyled.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        let text = GapBuffer::from_str(content);
        let mut line_index = LineIndex::new();
        line_index.rebuild(content.chars());
        let styles = StyleRuns::new(text.len());

        Self {
            text,
            line_index,
            styles,
            #[cfg(debug_assertions)]
            debug_mutation_count: 0,
        }
    }

    /// Returns the number of characters.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the whole buffer as a String.
    pub fn content(&self) -> String {
        self.text.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.line_index.line_count()
    }

    /// Returns the range of `line` including its trailing newline.
    pub fn line_range(&self, line: usize) -> Option<TextRange> {
        self.line_index.line_range(line, self.len())
    }

    /// Returns the line containing `offset`.
    pub fn line_at_offset(&self, offset: usize) -> usize {
        self.line_index.line_at_offset(offset)
    }

    // ==================== Mutations ====================

    /// Replaces the characters in `range` with `text`.
    ///
    /// The range is clamped to the buffer. Inserted characters take the
    /// default style. Returns the range the new text occupies.
    pub fn replace(&mut self, range: TextRange, text: &str) -> TextRange {
        self.replace_with_style(range, text, Style::default())
    }

    /// Like [`replace`](Self::replace), but the inserted text takes the style
    /// of the character preceding the replacement.
    ///
    /// Used to keep the display stable while a highlight pass is pending.
    pub fn replace_inheriting_style(&mut self, range: TextRange, text: &str) -> TextRange {
        let range = bounded_range(range, self.len());
        let style = match range.location {
            0 => Style::default(),
            loc => self.styles.style_at(loc - 1),
        };
        self.replace_with_style(range, text, style)
    }

    fn replace_with_style(&mut self, range: TextRange, text: &str, style: Style) -> TextRange {
        let range = bounded_range(range, self.len());
        let inserted: Vec<char> = text.chars().collect();

        self.text
            .replace_range(range.location, range.end(), text);
        self.line_index
            .apply_edit(range.location, range.length, &inserted);
        self.styles
            .replace(range.location, range.length, inserted.len(), style);

        self.assert_consistent();
        TextRange::new(range.location, inserted.len())
    }

    /// Sets the style of every character in `range`.
    pub fn set_style(&mut self, range: TextRange, style: Style) {
        self.styles.set_style(range, style);
    }

    /// Resets `range` to the default style.
    pub fn clear_styles(&mut self, range: TextRange) {
        self.styles.set_style(range, Style::default());
    }

    /// Returns the style of the character at `offset`.
    pub fn style_at(&self, offset: usize) -> Style {
        self.styles.style_at(offset)
    }

    /// Returns the style runs overlapping `range`, clipped to it.
    pub fn style_runs(&self, range: TextRange) -> Vec<(TextRange, Style)> {
        self.styles.runs_in(range)
    }

    // ==================== Debug Validation ====================

    /// Validates the line index and style runs against the text.
    ///
    /// Sampled every 64 mutations so debug builds stay usable on large files.
    #[cfg(debug_assertions)]
    fn assert_consistent(&mut self) {
        self.debug_mutation_count += 1;
        if self.debug_mutation_count % 64 != 0 {
            return;
        }
        let mut expected = LineIndex::new();
        expected.rebuild(self.text.chars());
        assert_eq!(
            self.line_index.line_starts(),
            expected.line_starts(),
            "line_index drift detected after {} mutations (buffer len {})",
            self.debug_mutation_count,
            self.text.len(),
        );
        assert_eq!(self.styles.len(), self.text.len(), "style runs out of sync with text");
    }

    #[cfg(not(debug_assertions))]
    fn assert_consistent(&mut self) {}
}

impl Default for CodeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CharSource for CodeBuffer {
    fn char_len(&self) -> usize {
        self.text.len()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.char_at(offset)
    }

    fn chars_in(&self, range: TextRange) -> Vec<char> {
        self.text.slice_chars(range.location, range.end())
    }

    fn line_start_at(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        let line = self.line_index.line_at_offset(offset);
        self.line_index.line_start(line).unwrap_or(0)
    }

    fn line_end_at(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        let line = self.line_index.line_at_offset(offset);
        self.line_index
            .line_range(line, self.len())
            .map(|r| r.end())
            .unwrap_or(self.len())
    }
}
