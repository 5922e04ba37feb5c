// Chunk: docs/chunks/syntax_highlighting - Byte/char offset translation for tree-sitter

//! Offset translation between tree-sitter byte offsets and buffer characters.
//!
//! Tree-sitter reports node positions as UTF-8 byte offsets, while buffers
//! and annotations are addressed by `char` position. A `ByteCharMap` is
//! built once per tokenized text and answers conversions in O(log n), or
//! O(1) when the text is ASCII.

use std::ops::Range;

use rehighlight_buffer::TextRange;

/// Byte offset to character offset table for one string.
#[derive(Debug, Clone)]
pub struct ByteCharMap {
    /// Byte offset where each character starts. Empty for ASCII text.
    char_starts: Vec<usize>,
    byte_len: usize,
    char_len: usize,
}

impl ByteCharMap {
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                char_starts: Vec::new(),
                byte_len: text.len(),
                char_len: text.len(),
            };
        }
        let char_starts: Vec<usize> = text.char_indices().map(|(idx, _)| idx).collect();
        Self {
            char_len: char_starts.len(),
            char_starts,
            byte_len: text.len(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.char_len
    }

    fn is_ascii(&self) -> bool {
        self.char_starts.is_empty()
    }

    /// Returns the character containing or starting at `byte`.
    ///
    /// Offsets inside a multi-byte character round up to the next character;
    /// offsets past the end clamp to the character count.
    pub fn char_offset(&self, byte: usize) -> usize {
        if byte >= self.byte_len {
            return self.char_len;
        }
        if self.is_ascii() {
            return byte;
        }
        self.char_starts.partition_point(|&start| start < byte)
    }

    /// Returns the byte offset where character `offset` starts.
    pub fn byte_offset(&self, offset: usize) -> usize {
        if offset >= self.char_len {
            return self.byte_len;
        }
        if self.is_ascii() {
            return offset;
        }
        self.char_starts[offset]
    }

    /// Converts a byte range into a character range.
    pub fn char_range(&self, bytes: Range<usize>) -> TextRange {
        TextRange::from_bounds(self.char_offset(bytes.start), self.char_offset(bytes.end))
    }
}
