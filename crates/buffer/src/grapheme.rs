// Chunk: docs/chunks/grapheme_cluster_awareness - Grapheme cluster boundary helpers
// Chunk: docs/chunks/grapheme_range_arithmetic - Cluster-safe range construction

//! Grapheme cluster safe range arithmetic.
//!
//! A grapheme cluster is what users perceive as a single "character":
//!
//! - ZWJ emoji sequences (7 chars for a family emoji)
//! - Combining character sequences (e + combining acute = 2 chars)
//! - Regional indicator pairs (a flag is 2 chars)
//! - `"\r\n"` (2 chars)
//!
//! Buffers are indexed by `char`, so any range built by plain arithmetic can
//! end up splitting a cluster. Every range the highlighting core hands out is
//! built or checked here.
//!
//! Segmentation runs on the line around the position of interest. A cluster
//! boundary always follows `'\n'`, so a line window segments exactly like the
//! full buffer would.

use unicode_segmentation::UnicodeSegmentation;

use crate::source::CharSource;
use crate::types::TextRange;

/// Returns the char offset of the grapheme cluster boundary immediately before `char_offset`.
///
/// If `char_offset` is 0, returns 0.
/// If `char_offset` is at the start of a grapheme, returns the start of the previous grapheme.
/// If `char_offset` is in the middle of a grapheme, returns the start of that grapheme.
pub fn grapheme_boundary_left(chars: &[char], char_offset: usize) -> usize {
    if char_offset == 0 || chars.is_empty() {
        return 0;
    }

    let char_offset = char_offset.min(chars.len());

    // ASCII before the offset is a single-char grapheme, except the '\n' of "\r\n".
    let prev = chars[char_offset - 1];
    if prev.is_ascii() && !(prev == '\n' && char_offset >= 2 && chars[char_offset - 2] == '\r') {
        return char_offset - 1;
    }

    let s: String = chars.iter().collect();

    let mut result = 0;
    let mut char_idx = 0;
    for grapheme in s.graphemes(true) {
        if char_idx >= char_offset {
            break;
        }
        result = char_idx;
        char_idx += grapheme.chars().count();
    }

    result
}

/// Returns the char offset of the grapheme cluster boundary immediately after `char_offset`.
///
/// If `char_offset` is at the start of a grapheme, returns the end of that grapheme.
/// If `char_offset` is in the middle of a grapheme, returns the end of that grapheme.
/// If `char_offset` is >= chars.len(), returns chars.len().
pub fn grapheme_boundary_right(chars: &[char], char_offset: usize) -> usize {
    if chars.is_empty() || char_offset >= chars.len() {
        return chars.len();
    }

    // Two ASCII chars in a row are separate graphemes unless they are "\r\n".
    let current = chars[char_offset];
    if current.is_ascii() && current != '\r' {
        match chars.get(char_offset + 1) {
            None => return char_offset + 1,
            Some(next) if next.is_ascii() => return char_offset + 1,
            // A non-ASCII follower may be a combining mark
            Some(_) => {}
        }
    }

    let s: String = chars.iter().collect();

    let mut char_idx = 0;
    for grapheme in s.graphemes(true) {
        let grapheme_end = char_idx + grapheme.chars().count();
        if char_offset < grapheme_end {
            return grapheme_end;
        }
        char_idx = grapheme_end;
    }

    chars.len()
}

/// Returns true if `char_offset` is at a grapheme cluster boundary.
///
/// Position 0 and positions at or past the end are always boundaries.
pub fn is_grapheme_boundary(chars: &[char], char_offset: usize) -> bool {
    if chars.is_empty() || char_offset == 0 || char_offset >= chars.len() {
        return true;
    }

    let before = chars[char_offset - 1];
    let after = chars[char_offset];
    if before.is_ascii() && after.is_ascii() {
        return !(before == '\r' && after == '\n');
    }

    let s: String = chars.iter().collect();

    let mut char_idx = 0;
    for grapheme in s.graphemes(true) {
        if char_idx == char_offset {
            return true;
        }
        if char_idx > char_offset {
            return false;
        }
        char_idx += grapheme.chars().count();
    }

    char_offset == chars.len()
}

/// Returns the line containing `offset` as (line start, line chars including the newline).
fn line_window<S: CharSource + ?Sized>(source: &S, offset: usize) -> (usize, Vec<char>) {
    let start = source.line_start_at(offset);
    let end = source.line_end_at(offset);
    (start, source.chars_in(TextRange::from_bounds(start, end)))
}

/// Returns true if `offset` does not fall inside a grapheme cluster.
pub fn is_cluster_boundary<S: CharSource + ?Sized>(source: &S, offset: usize) -> bool {
    if offset == 0 || offset >= source.char_len() {
        return true;
    }
    let (start, window) = line_window(source, offset);
    is_grapheme_boundary(&window, offset - start)
}

/// Moves `offset` backward to the start of the cluster it falls in.
///
/// Offsets already on a boundary are returned unchanged; offsets past the end
/// are clamped to the length.
pub fn cluster_start<S: CharSource + ?Sized>(source: &S, offset: usize) -> usize {
    let len = source.char_len();
    if offset == 0 || offset >= len {
        return offset.min(len);
    }
    let (start, window) = line_window(source, offset);
    let local = offset - start;
    if is_grapheme_boundary(&window, local) {
        offset
    } else {
        start + grapheme_boundary_left(&window, local)
    }
}

/// Returns the end of the cluster starting at (or containing) `offset`.
pub fn next_cluster_boundary<S: CharSource + ?Sized>(source: &S, offset: usize) -> usize {
    let len = source.char_len();
    if offset >= len {
        return len;
    }
    let (start, window) = line_window(source, offset);
    start + grapheme_boundary_right(&window, offset - start)
}

/// Returns the start of the cluster ending at (or containing) `offset`.
pub fn prev_cluster_boundary<S: CharSource + ?Sized>(source: &S, offset: usize) -> usize {
    let offset = offset.min(source.char_len());
    if offset == 0 {
        return 0;
    }
    // The window must contain the char before `offset`, which may be the
    // previous line's '\n'.
    let (start, window) = line_window(source, offset - 1);
    start + grapheme_boundary_left(&window, offset - start)
}

/// Clamps `range` so it lies within `[0, buffer_len]`.
///
/// Never fails. A range starting past the end degrades to the insertion
/// point at `buffer_len`.
pub fn bounded_range(range: TextRange, buffer_len: usize) -> TextRange {
    let location = range.location.min(buffer_len);
    let length = range.length.min(buffer_len - location);
    TextRange::new(location, length)
}

/// Builds a range covering `count` grapheme clusters starting at `location`.
///
/// A `location` inside a cluster is first moved back to the cluster start.
/// A negative `count` builds the range backward: the aligned `location` is
/// the exclusive upper bound and the range extends `|count|` clusters toward
/// the buffer start. The range stops early at either end of the buffer.
///
/// This is the cluster-safe replacement for `TextRange::new(location, count)`
/// whenever `count` means "characters as the user sees them".
pub fn cluster_range<S: CharSource + ?Sized>(source: &S, location: usize, count: isize) -> TextRange {
    let len = source.char_len();
    let anchor = cluster_start(source, location.min(len));

    if count >= 0 {
        let mut end = anchor;
        for _ in 0..count {
            if end >= len {
                break;
            }
            end = next_cluster_boundary(source, end);
        }
        bounded_range(TextRange::from_bounds(anchor, end), len)
    } else {
        let mut lower = anchor;
        for _ in 0..count.unsigned_abs() {
            if lower == 0 {
                break;
            }
            lower = prev_cluster_boundary(source, lower);
        }
        let lower = cluster_start(source, lower);
        bounded_range(TextRange::from_bounds(lower, anchor), len)
    }
}

/// Widens `range` outward so both ends sit on cluster boundaries.
///
/// An empty range is an insertion point and stays empty, moved back to the
/// start of the cluster it falls in.
pub fn align_range<S: CharSource + ?Sized>(source: &S, range: TextRange) -> TextRange {
    let range = bounded_range(range, source.char_len());
    let start = cluster_start(source, range.location);
    if range.is_empty() {
        return TextRange::empty_at(start);
    }
    let end = if is_cluster_boundary(source, range.end()) {
        range.end()
    } else {
        next_cluster_boundary(source, range.end())
    };
    TextRange::from_bounds(start, end.max(start))
}
