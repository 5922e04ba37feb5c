// Chunk: docs/chunks/code_buffer - Character range type

use std::ops::Range;

/// A range over character positions: `[location, location + length)`.
///
/// Positions count Unicode scalar values, not bytes. A zero-length range
/// denotes an insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    pub location: usize,
    pub length: usize,
}

impl TextRange {
    pub fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    /// Creates a range from a start and an exclusive end.
    ///
    /// If `end < start` the range collapses to an insertion point at `start`.
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self {
            location: start,
            length: end.saturating_sub(start),
        }
    }

    /// Creates an insertion point.
    pub fn empty_at(location: usize) -> Self {
        Self {
            location,
            length: 0,
        }
    }

    /// Returns the exclusive upper bound.
    pub fn end(&self) -> usize {
        self.location + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns true if `offset` lies in `[location, end)`.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.location && offset < self.end()
    }

    /// Returns true if `other` lies entirely within this range.
    pub fn contains_range(&self, other: TextRange) -> bool {
        other.location >= self.location && other.end() <= self.end()
    }

    /// Returns true if `offset` lies strictly between the bounds.
    pub fn strictly_contains(&self, offset: usize) -> bool {
        offset > self.location && offset < self.end()
    }

    /// Returns true if the two ranges share at least one position.
    ///
    /// An insertion point intersects a range that strictly contains it.
    pub fn intersects(&self, other: TextRange) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => self.location == other.location,
            (true, false) => other.strictly_contains(self.location),
            (false, true) => self.strictly_contains(other.location),
            (false, false) => self.location < other.end() && other.location < self.end(),
        }
    }

    /// Returns the smallest range covering both.
    pub fn union(&self, other: TextRange) -> TextRange {
        TextRange::from_bounds(
            self.location.min(other.location),
            self.end().max(other.end()),
        )
    }

    /// Returns the overlap of the two ranges, if any.
    pub fn intersection(&self, other: TextRange) -> Option<TextRange> {
        let start = self.location.max(other.location);
        let end = self.end().min(other.end());
        if start <= end {
            Some(TextRange::from_bounds(start, end))
        } else {
            None
        }
    }

    /// Returns this range moved by `offset` positions.
    pub fn offset_by(&self, offset: usize) -> TextRange {
        TextRange::new(self.location + offset, self.length)
    }

    pub fn as_range(&self) -> Range<usize> {
        self.location..self.end()
    }
}

impl From<Range<usize>> for TextRange {
    fn from(range: Range<usize>) -> Self {
        TextRange::from_bounds(range.start, range.end)
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.location, self.end())
    }
}
