// Chunk: docs/chunks/code_buffer - Read access to character-indexed text

//! Read-only access to a buffer addressed by character position.
//!
//! The highlighting core never owns the text it works on. Everything that
//! needs to look at characters (grapheme arithmetic, boundary scans) goes
//! through [`CharSource`], which is implemented for plain slices, strings
//! and [`CodeBuffer`](crate::CodeBuffer).

use crate::types::TextRange;

/// A sequence of Unicode scalar values indexed by character position.
pub trait CharSource {
    /// Returns the number of characters.
    fn char_len(&self) -> usize;

    /// Returns the character at `offset`, or `None` past the end.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Collects the characters of `range` (clamped to the source).
    fn chars_in(&self, range: TextRange) -> Vec<char> {
        let end = range.end().min(self.char_len());
        (range.location.min(end)..end)
            .filter_map(|i| self.char_at(i))
            .collect()
    }

    /// Returns the text of `range` (clamped to the source).
    fn text_in(&self, range: TextRange) -> String {
        self.chars_in(range).into_iter().collect()
    }

    /// Returns the start of the line containing `offset`.
    fn line_start_at(&self, offset: usize) -> usize {
        let mut pos = offset.min(self.char_len());
        while pos > 0 {
            if self.char_at(pos - 1) == Some('\n') {
                break;
            }
            pos -= 1;
        }
        pos
    }

    /// Returns the end of the line containing `offset`, after its `'\n'` if any.
    fn line_end_at(&self, offset: usize) -> usize {
        let len = self.char_len();
        let mut pos = offset.min(len);
        while pos < len {
            let ch = self.char_at(pos);
            pos += 1;
            if ch == Some('\n') {
                break;
            }
        }
        pos
    }

    /// Returns the full lines touched by `range`, including their terminators.
    ///
    /// An empty range yields the line it sits on.
    fn paragraph_range(&self, range: TextRange) -> TextRange {
        let len = self.char_len();
        let location = range.location.min(len);
        let last = if range.is_empty() {
            location
        } else {
            (range.end() - 1).min(len)
        };
        TextRange::from_bounds(self.line_start_at(location), self.line_end_at(last))
    }
}

impl CharSource for [char] {
    fn char_len(&self) -> usize {
        self.len()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.get(offset).copied()
    }

    fn chars_in(&self, range: TextRange) -> Vec<char> {
        let end = range.end().min(self.len());
        self[range.location.min(end)..end].to_vec()
    }
}

impl CharSource for Vec<char> {
    fn char_len(&self) -> usize {
        self.len()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.get(offset).copied()
    }

    fn chars_in(&self, range: TextRange) -> Vec<char> {
        self.as_slice().chars_in(range)
    }
}

/// `str` is indexed by character, which walks the string. Fine for tests and
/// short snippets; hosts with large documents should use `CodeBuffer`.
impl CharSource for str {
    fn char_len(&self) -> usize {
        self.chars().count()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.chars().nth(offset)
    }

    fn chars_in(&self, range: TextRange) -> Vec<char> {
        self.chars().skip(range.location).take(range.length).collect()
    }
}
