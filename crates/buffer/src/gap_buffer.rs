// Chunk: docs/chunks/text_buffer - Text buffer data structure with gap buffer backing

//! Gap buffer implementation for efficient text editing.
//!
//! A gap buffer is a character array with a movable gap at the edit position.
//! Replacements at the gap are O(replacement); moving the gap is O(gap_distance)
//! but amortizes well for live typing, where edits cluster together.

const INITIAL_GAP_SIZE: usize = 64;
const GAP_GROWTH_FACTOR: usize = 2;

/// A gap buffer for character storage.
///
/// Layout: [pre-gap content | gap | post-gap content].
#[derive(Debug)]
pub struct GapBuffer {
    data: Vec<char>,
    /// Index where the gap starts (first unused position).
    gap_start: usize,
    /// Index where the gap ends (first used position after gap).
    gap_end: usize,
}

impl GapBuffer {
    /// Creates a new empty gap buffer.
    pub fn new() -> Self {
        Self {
            data: vec!['\0'; INITIAL_GAP_SIZE],
            gap_start: 0,
            gap_end: INITIAL_GAP_SIZE,
        }
    }

    /// Creates a gap buffer initialized with the given text.
    pub fn from_str(text: &str) -> Self {
        let mut data: Vec<char> = text.chars().collect();
        let len = data.len();
        let capacity = len + INITIAL_GAP_SIZE;
        data.resize(capacity, '\0');

        Self {
            data,
            gap_start: len,
            gap_end: capacity,
        }
    }

    /// Returns the logical length of the buffer (excluding the gap).
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Moves the gap to the specified logical position.
    pub fn move_gap_to(&mut self, pos: usize) {
        let pos = pos.min(self.len());

        if pos < self.gap_start {
            let shift = self.gap_start - pos;
            self.data.copy_within(pos..self.gap_start, self.gap_end - shift);
            self.gap_start = pos;
            self.gap_end -= shift;
        } else if pos > self.gap_start {
            let shift = pos - self.gap_start;
            self.data.copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
        }
    }

    /// Ensures the gap is at least the specified size.
    ///
    /// Grows in place; the gap position is preserved.
    fn ensure_gap(&mut self, min_size: usize) {
        if self.gap_len() >= min_size {
            return;
        }

        let needed = min_size - self.gap_len();
        let growth = needed.max(self.data.len() * GAP_GROWTH_FACTOR);

        let old_gap_end = self.gap_end;
        let old_len = self.data.len();
        let post_gap_len = old_len - old_gap_end;

        let new_size = old_len + growth;
        self.data.resize(new_size, '\0');

        if post_gap_len > 0 {
            let new_post_gap_start = new_size - post_gap_len;
            self.data.copy_within(old_gap_end..old_len, new_post_gap_start);
        }

        self.gap_end = new_size - post_gap_len;
    }

    /// Replaces the logical range `[start, end)` with `text`.
    ///
    /// Bounds are clamped to the buffer. Returns the number of characters
    /// inserted.
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) -> usize {
        let len = self.len();
        let start = start.min(len);
        let end = end.clamp(start, len);

        self.move_gap_to(start);
        // Deleting forward from the gap just widens it
        self.gap_end += end - start;

        let chars: Vec<char> = text.chars().collect();
        self.ensure_gap(chars.len());
        self.data[self.gap_start..self.gap_start + chars.len()].copy_from_slice(&chars);
        self.gap_start += chars.len();
        chars.len()
    }

    /// Returns the character at the given logical position.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.len() {
            return None;
        }
        let physical = if pos < self.gap_start {
            pos
        } else {
            pos + self.gap_len()
        };
        Some(self.data[physical])
    }

    /// Returns an iterator over all characters in the buffer.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.data[..self.gap_start]
            .iter()
            .chain(self.data[self.gap_end..].iter())
            .copied()
    }

    /// Copies the logical range `[start, end)` out of the buffer.
    pub fn slice_chars(&self, start: usize, end: usize) -> Vec<char> {
        let end = end.min(self.len());
        let start = start.min(end);
        if end <= self.gap_start {
            return self.data[start..end].to_vec();
        }
        if start >= self.gap_start {
            let gap = self.gap_len();
            return self.data[start + gap..end + gap].to_vec();
        }
        let mut out = Vec::with_capacity(end - start);
        out.extend_from_slice(&self.data[start..self.gap_start]);
        out.extend_from_slice(&self.data[self.gap_end..end + self.gap_len()]);
        out
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for ch in self.chars() {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_empty() {
        let buf = GapBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn test_from_str() {
        let buf = GapBuffer::from_str("hello");
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.to_string(), "hello");
    }

    #[test]
    fn test_replace_insert_in_middle() {
        let mut buf = GapBuffer::from_str("ac");
        assert_eq!(buf.replace_range(1, 1, "b"), 1);
        assert_eq!(buf.to_string(), "abc");
    }

    #[test]
    fn test_replace_delete() {
        let mut buf = GapBuffer::from_str("hello world");
        assert_eq!(buf.replace_range(5, 11, ""), 0);
        assert_eq!(buf.to_string(), "hello");
    }

    #[test]
    fn test_replace_swaps_text() {
        let mut buf = GapBuffer::from_str("let x = 1;");
        buf.replace_range(4, 5, "value");
        assert_eq!(buf.to_string(), "let value = 1;");
        buf.replace_range(0, 3, "const");
        assert_eq!(buf.to_string(), "const value = 1;");
    }

    #[test]
    fn test_replace_clamps_out_of_range() {
        let mut buf = GapBuffer::from_str("abc");
        buf.replace_range(2, 99, "Z");
        assert_eq!(buf.to_string(), "abZ");
        buf.replace_range(50, 60, "!");
        assert_eq!(buf.to_string(), "abZ!");
    }

    #[test]
    fn test_char_at_with_gap_in_middle() {
        let mut buf = GapBuffer::from_str("hello");
        buf.move_gap_to(2);
        assert_eq!(buf.char_at(0), Some('h'));
        assert_eq!(buf.char_at(2), Some('l'));
        assert_eq!(buf.char_at(4), Some('o'));
        assert_eq!(buf.char_at(5), None);
    }

    #[test]
    fn test_slice_chars_across_gap() {
        let mut buf = GapBuffer::from_str("hello world");
        buf.move_gap_to(3);
        let s: String = buf.slice_chars(1, 8).into_iter().collect();
        assert_eq!(s, "ello wo");
        let before: String = buf.slice_chars(0, 3).into_iter().collect();
        assert_eq!(before, "hel");
        let after: String = buf.slice_chars(6, 11).into_iter().collect();
        assert_eq!(after, "world");
    }

    #[test]
    fn test_large_insert_grows_gap() {
        let mut buf = GapBuffer::new();
        let text = "x".repeat(1000);
        buf.replace_range(0, 0, &text);
        buf.replace_range(500, 500, "y");
        assert_eq!(buf.len(), 1001);
        assert_eq!(buf.char_at(500), Some('y'));
        assert_eq!(buf.char_at(1000), Some('x'));
    }
}
