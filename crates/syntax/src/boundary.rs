// Chunk: docs/chunks/boundary_finder - Safe re-tokenization range search

//! Safe range search for incremental highlighting.
//!
//! Given an edited range, the boundary finder looks for the nearest line
//! before it where tokenization can restart and the nearest line after it
//! where tokenization can stop, such that tokenizing only the text between
//! them styles the edited range exactly like a full pass would.
//!
//! Scans never leave the **scope**: the language block containing the edit,
//! or the whole buffer. A position strictly inside a multi-line element, a
//! comment, or another language block is never a boundary.
//!
//! When no boundary can be found (no heuristics for the language, or the
//! scan exceeds its line budget) the finder falls back to the paragraph
//! range: the full lines touched by the edit.

use log::debug;
use rehighlight_buffer::grapheme::{align_range, bounded_range};
use rehighlight_buffer::{CharSource, TextRange};

use crate::annotation::{AnnotationKind, AnnotationStore};
use crate::error::{HighlightError, Result};
use crate::hints::{hints_for, BoundaryHints};

/// Finds safe highlight ranges over a buffer and its annotations.
pub struct BoundaryFinder<'a, S: CharSource + ?Sized> {
    source: &'a S,
    annotations: &'a AnnotationStore,
    max_scan_lines: usize,
}

impl<'a, S: CharSource + ?Sized> BoundaryFinder<'a, S> {
    pub fn new(source: &'a S, annotations: &'a AnnotationStore, max_scan_lines: usize) -> Self {
        Self {
            source,
            annotations,
            max_scan_lines,
        }
    }

    /// Returns the region scans are confined to for an edit starting at `range`.
    pub fn scope(&self, range: TextRange) -> TextRange {
        let len = self.source.char_len();
        self.annotations
            .language_block_at(range.location)
            .map(|block| bounded_range(block.range, len))
            .unwrap_or_else(|| TextRange::new(0, len))
    }

    /// Strictly inside a multi-line construct, or inside a language block
    /// other than the scope.
    fn is_inside_construct(&self, position: usize, scope: TextRange) -> bool {
        if self.annotations.is_inside_multi_line_or_comment(position) {
            return true;
        }
        self.annotations
            .query(TextRange::empty_at(position), AnnotationKind::LanguageBlock)
            .iter()
            .any(|block| block.range != scope)
    }

    /// Text of the line `[start, end)` without its terminator.
    fn line_text(&self, start: usize, end: usize) -> String {
        let text = self.source.text_in(TextRange::from_bounds(start, end));
        text.trim_end_matches(['\n', '\r']).to_string()
    }

    fn lower_in_scope(&self, range: TextRange, scope: TextRange, hints: &BoundaryHints) -> Option<usize> {
        let mut line_start = self.source.line_start_at(range.location);
        let mut scanned = 0;
        loop {
            if line_start <= scope.location {
                return Some(scope.location);
            }
            if scanned >= self.max_scan_lines {
                debug!("lower boundary scan for {} gave up after {} lines", range, scanned);
                return None;
            }
            scanned += 1;

            if !self.is_inside_construct(line_start, scope) {
                let line_end = self.source.line_end_at(line_start);
                if hints.is_safe_start(&self.line_text(line_start, line_end)) {
                    return Some(line_start);
                }
            }
            line_start = self.source.line_start_at(line_start - 1);
        }
    }

    fn upper_in_scope(&self, range: TextRange, scope: TextRange, hints: &BoundaryHints) -> Option<usize> {
        let mut line_end = self.source.line_end_at(range.end());
        let mut scanned = 0;
        loop {
            if line_end >= scope.end() {
                return Some(scope.end());
            }
            if scanned >= self.max_scan_lines {
                debug!("upper boundary scan for {} gave up after {} lines", range, scanned);
                return None;
            }
            scanned += 1;

            if !self.is_inside_construct(line_end, scope) {
                let line_start = self.source.line_start_at(line_end - 1);
                if hints.is_safe_end(&self.line_text(line_start, line_end)) {
                    let next_end = self.source.line_end_at(line_end);
                    if !hints.is_continuation(&self.line_text(line_end, next_end)) {
                        return Some(line_end);
                    }
                }
            }
            line_end = self.source.line_end_at(line_end);
        }
    }

    /// Returns the nearest safe restart position at or before `range`.
    ///
    /// `None` when the language has no heuristics or the scan exceeds
    /// `max_scan_lines`.
    pub fn lower_boundary(&self, range: TextRange, language: &str) -> Option<usize> {
        let range = bounded_range(range, self.source.char_len());
        let hints = hints_for(language)?;
        self.lower_in_scope(range, self.scope(range), hints)
    }

    /// Returns the nearest safe stop position at or after `range`.
    pub fn upper_boundary(&self, range: TextRange, language: &str) -> Option<usize> {
        let range = bounded_range(range, self.source.char_len());
        let hints = hints_for(language)?;
        self.upper_in_scope(range, self.scope(range), hints)
    }

    /// Returns both boundaries, or why they could not be found.
    pub fn boundaries(&self, range: TextRange, language: &str) -> Result<Option<(usize, usize)>> {
        let range = bounded_range(range, self.source.char_len());
        let hints =
            hints_for(language).ok_or_else(|| HighlightError::UnsupportedLanguage(language.to_string()))?;
        let scope = self.scope(range);
        Ok(self
            .lower_in_scope(range, scope, hints)
            .zip(self.upper_in_scope(range, scope, hints)))
    }

    /// Returns the full lines touched by `range`, clamped to its scope.
    pub fn paragraph_range(&self, range: TextRange) -> TextRange {
        let range = bounded_range(range, self.source.char_len());
        let scope = self.scope(range);
        let paragraph = self.source.paragraph_range(range);
        paragraph.intersection(scope).unwrap_or(range)
    }

    /// Returns the range to re-tokenize after an edit of `range`.
    ///
    /// The result always contains `range` (clamped to the buffer) and never
    /// splits a grapheme cluster.
    pub fn highlight_range(&self, range: TextRange, language: &str) -> TextRange {
        let len = self.source.char_len();
        if len == 0 {
            return TextRange::default();
        }
        let range = bounded_range(range, len);

        let safe = match self.boundaries(range, language) {
            Ok(Some((lower, upper))) => TextRange::from_bounds(lower, upper),
            Ok(None) => self.paragraph_range(range),
            Err(err) => {
                debug!("{}; using paragraph range for {}", err, range);
                self.paragraph_range(range)
            }
        };
        let safe = align_range(self.source, safe.union(range));
        debug!("highlight range for edit {} in {}: {}", range, language, safe);
        safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;

    fn store_for(text: &str) -> AnnotationStore {
        AnnotationStore::new(text.chars().count())
    }

    // ==================== Lower / Upper ====================

    #[test]
    fn test_scans_stop_at_top_level_lines() {
        let text = "fn a() {\n    one();\n}\n\nfn b() {\n    two();\n}\n";
        let store = store_for(text);
        let finder = BoundaryFinder::new(text, &store, 100);

        // Edit inside `two();`
        let edit = TextRange::new(text.find("two").unwrap() + 1, 0);
        assert_eq!(finder.lower_boundary(edit, "rust"), Some(text.find("fn b").unwrap()));
        assert_eq!(finder.upper_boundary(edit, "rust"), Some(text.len()));
    }

    #[test]
    fn test_upper_skips_continuation_lines() {
        let text = "let a = 1;\n}\nelse {\n}\nfoo();\nbar();\n";
        let store = store_for(text);
        let finder = BoundaryFinder::new(text, &store, 100);

        // `}` on line 1 is followed by `else`, so the first safe stop is after line 3
        let upper = finder.upper_boundary(TextRange::new(12, 0), "c");
        assert_eq!(upper, Some(22));
    }

    #[test]
    fn test_comment_lines_are_not_boundaries() {
        // `int y;` looks like a top-level item but sits inside a block comment
        let text = "int x;\n/* note\nint y;\n*/\nint z;\n";
        let mut store = store_for(text);
        let open = text.find("/*").unwrap();
        let close = text.find("*/").unwrap() + 2;
        store.replace(
            TextRange::new(0, text.len()),
            vec![Annotation::comment(TextRange::from_bounds(open, close))],
        );
        let finder = BoundaryFinder::new(text, &store, 100);

        // `/* note` is not a restart line either, so the scan reaches the buffer start
        let edit = TextRange::new(close - 1, 0);
        assert_eq!(finder.lower_boundary(edit, "c"), Some(0));

        // `*/` is not a stop line, so the scan reaches the buffer end
        let edit = TextRange::new(open + 3, 0);
        assert_eq!(finder.upper_boundary(edit, "c"), Some(text.len()));

        // Outside the comment the nearest lines are used
        let edit = TextRange::new(text.find("int z").unwrap() + 2, 0);
        assert_eq!(finder.lower_boundary(edit, "c"), Some(text.find("int z").unwrap()));
    }

    #[test]
    fn test_scan_budget_exhaustion() {
        let text = format!("x = 1;\n{}y = 2;\n", "    indented();\n".repeat(20));
        let store = store_for(&text);
        let finder = BoundaryFinder::new(text.as_str(), &store, 5);
        let edit = TextRange::new(text.find("y = 2").unwrap() - 3, 0);
        assert_eq!(finder.lower_boundary(edit, "c"), None);
        assert_eq!(finder.boundaries(edit, "c"), Ok(None));
    }

    // ==================== Scope ====================

    #[test]
    fn test_scope_is_enclosing_language_block() {
        let text = "<style>\na { }\nb { }\n</style>\n";
        let mut store = AnnotationStore::with_base_language(text.len(), Some("html".into()));
        let block = TextRange::from_bounds(7, text.find("</style>").unwrap());
        store.replace(
            TextRange::new(0, text.len()),
            vec![Annotation::language_block(block, "css")],
        );
        let finder = BoundaryFinder::new(text, &store, 100);

        let edit = TextRange::new(text.find("b {").unwrap() + 2, 0);
        assert_eq!(finder.scope(edit), block);
        let safe = finder.highlight_range(edit, "css");
        assert!(block.contains_range(safe), "{} escapes scope {}", safe, block);
        assert!(safe.contains_range(edit));
    }

    #[test]
    fn test_base_scan_skips_embedded_block_lines() {
        let text = "<div>\n<style>\n<p>\n  </style>\n";
        let mut store = AnnotationStore::with_base_language(text.len(), Some("html".into()));
        let block = TextRange::from_bounds(13, text.find("</style>").unwrap());
        store.replace(
            TextRange::new(0, text.len()),
            vec![Annotation::language_block(block, "css")],
        );
        let finder = BoundaryFinder::new(text, &store, 100);

        // `<p>` inside the block must not be used as a restart point
        let edit = TextRange::new(text.find("</style>").unwrap() + 3, 0);
        assert_eq!(finder.scope(edit), TextRange::new(0, text.len()));
        assert_eq!(finder.lower_boundary(edit, "html"), Some(text.find("<style>").unwrap()));
    }

    // ==================== highlight_range ====================

    #[test]
    fn test_unsupported_language_uses_paragraph() {
        let text = "alpha\nbeta gamma\ndelta\n";
        let store = store_for(text);
        let finder = BoundaryFinder::new(text, &store, 100);
        let edit = TextRange::new(8, 3);
        assert_eq!(finder.highlight_range(edit, "klingon"), TextRange::new(6, 11));
        assert_eq!(finder.paragraph_range(edit), TextRange::new(6, 11));
    }

    #[test]
    fn test_empty_buffer_returns_zero_range() {
        let store = store_for("");
        let finder = BoundaryFinder::new("", &store, 100);
        assert_eq!(finder.highlight_range(TextRange::new(3, 4), "rust"), TextRange::default());
    }

    #[test]
    fn test_highlight_range_contains_edit() {
        let text = "int a;\nint b;\n    c();\nint d;\n";
        let store = store_for(text);
        let finder = BoundaryFinder::new(text, &store, 100);
        for location in 0..=text.len() {
            for length in 0..4 {
                let edit = bounded_range(TextRange::new(location, length), text.len());
                let safe = finder.highlight_range(edit, "c");
                assert!(safe.contains_range(edit), "{} does not contain {}", safe, edit);
            }
        }
    }
}
