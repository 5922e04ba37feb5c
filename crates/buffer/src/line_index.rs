// Chunk: docs/chunks/text_buffer - Line index over character offsets

//! Line index for tracking line boundaries in the code buffer.
//!
//! Maintains an array of line start offsets for O(1) line count, O(1) line
//! access and O(log n) offset-to-line lookup. Boundary scans walk the buffer
//! line by line, so this index is on the hot path of every highlight cycle.

use crate::types::TextRange;

/// Tracks line boundaries in a text buffer.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Character offsets where each line starts. line_starts[0] = 0 always.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new line index with a single empty line.
    pub fn new() -> Self {
        Self {
            line_starts: vec![0],
        }
    }

    /// Rebuilds the line index from the given content.
    pub fn rebuild<I>(&mut self, content: I)
    where
        I: IntoIterator<Item = char>,
    {
        self.line_starts.clear();
        self.line_starts.push(0);

        let mut offset = 0;
        for ch in content {
            offset += 1;
            if ch == '\n' {
                self.line_starts.push(offset);
            }
        }
    }

    /// Returns the number of lines in the buffer.
    ///
    /// A buffer always has at least one line (even if empty).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the character offset where the given line starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Returns the range of `line` including its trailing `'\n'`, if any.
    ///
    /// `total_len` is the total number of characters in the buffer.
    pub fn line_range(&self, line: usize, total_len: usize) -> Option<TextRange> {
        let start = self.line_start(line)?;
        let end = self.line_start(line + 1).unwrap_or(total_len);
        Some(TextRange::from_bounds(start, end))
    }

    /// Returns the line number containing the given character offset.
    ///
    /// Offsets past the end map to the last line.
    pub fn line_at_offset(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Updates the index after `removed` characters at `start` were replaced
    /// by `inserted`.
    ///
    /// Line starts inside the removed span disappear, new ones are added for
    /// each `'\n'` in `inserted`, and everything after the edit shifts.
    pub fn apply_edit(&mut self, start: usize, removed: usize, inserted: &[char]) {
        let old_end = start + removed;
        let inserted_len = inserted.len();

        // Line starts <= start are untouched. A line starting at X was created
        // by the newline at X - 1, so starts in (start, old_end] were deleted.
        let keep = self.line_starts.partition_point(|&off| off <= start);
        let tail_from = self.line_starts.partition_point(|&off| off <= old_end);

        let mut new_starts: Vec<usize> = inserted
            .iter()
            .enumerate()
            .filter(|(_, ch)| **ch == '\n')
            .map(|(i, _)| start + i + 1)
            .collect();
        new_starts.extend(
            self.line_starts[tail_from..]
                .iter()
                .map(|&off| off - removed + inserted_len),
        );

        self.line_starts.truncate(keep);
        self.line_starts.extend(new_starts);
    }

    /// Returns the raw line_starts array (for debug validation).
    #[cfg(any(debug_assertions, test))]
    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}
