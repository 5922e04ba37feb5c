// Chunk: docs/chunks/code_buffer - Run-length style storage

//! Run-length encoded style attributes over character positions.
//!
//! Highlighting writes one style per token, so a document typically has a few
//! runs per line. Runs always cover the whole buffer; unstyled text is a run
//! of `Style::default()`.

use crate::style::Style;
use crate::types::TextRange;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    len: usize,
    style: Style,
}

/// Styles for every character of a buffer, stored as runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleRuns {
    runs: Vec<Run>,
    len: usize,
}

impl StyleRuns {
    /// Creates unstyled runs covering `len` characters.
    pub fn new(len: usize) -> Self {
        let mut runs = Self::default();
        runs.replace(0, 0, len, Style::default());
        runs
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Ensures a run boundary at `pos`; returns the index of the run starting there.
    fn split_at(&mut self, pos: usize) -> usize {
        let mut start = 0;
        for i in 0..self.runs.len() {
            if start == pos {
                return i;
            }
            let end = start + self.runs[i].len;
            if pos < end {
                let right = Run {
                    len: end - pos,
                    style: self.runs[i].style,
                };
                self.runs[i].len = pos - start;
                self.runs.insert(i + 1, right);
                return i + 1;
            }
            start = end;
        }
        self.runs.len()
    }

    fn coalesce(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.len == 0 {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.style == run.style => last.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }

    /// Replaces `removed` characters at `start` with `inserted` characters of `style`.
    pub fn replace(&mut self, start: usize, removed: usize, inserted: usize, style: Style) {
        let start = start.min(self.len);
        let removed = removed.min(self.len - start);

        let a = self.split_at(start);
        let b = self.split_at(start + removed);
        let new_run = (inserted > 0).then_some(Run {
            len: inserted,
            style,
        });
        self.runs.splice(a..b, new_run);
        self.len = self.len - removed + inserted;
        self.coalesce();
    }

    /// Sets the style of every character in `range`.
    pub fn set_style(&mut self, range: TextRange, style: Style) {
        let start = range.location.min(self.len);
        let end = range.end().min(self.len);
        if start >= end {
            return;
        }
        let a = self.split_at(start);
        let b = self.split_at(end);
        self.runs.splice(
            a..b,
            [Run {
                len: end - start,
                style,
            }],
        );
        self.coalesce();
    }

    /// Returns the style at `pos` (default past the end).
    pub fn style_at(&self, pos: usize) -> Style {
        let mut start = 0;
        for run in &self.runs {
            if pos < start + run.len {
                return run.style;
            }
            start += run.len;
        }
        Style::default()
    }

    /// Returns the runs overlapping `range`, clipped to it.
    pub fn runs_in(&self, range: TextRange) -> Vec<(TextRange, Style)> {
        let mut out = Vec::new();
        let mut start = 0;
        for run in &self.runs {
            let run_range = TextRange::new(start, run.len);
            if let Some(clipped) = run_range.intersection(range) {
                if !clipped.is_empty() {
                    out.push((clipped, run.style));
                }
            }
            start += run.len;
            if start >= range.end() {
                break;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, NamedColor};

    fn red() -> Style {
        Style::fg(Color::Named(NamedColor::Red))
    }

    fn blue() -> Style {
        Style::fg(Color::Named(NamedColor::Blue))
    }

    #[test]
    fn test_new_is_single_plain_run() {
        let runs = StyleRuns::new(10);
        assert_eq!(runs.len(), 10);
        assert_eq!(runs.runs_in(TextRange::new(0, 10)), vec![(TextRange::new(0, 10), Style::default())]);
    }

    #[test]
    fn test_set_style_splits_and_merges() {
        let mut runs = StyleRuns::new(10);
        runs.set_style(TextRange::new(2, 3), red());
        assert_eq!(runs.style_at(1), Style::default());
        assert_eq!(runs.style_at(2), red());
        assert_eq!(runs.style_at(4), red());
        assert_eq!(runs.style_at(5), Style::default());

        runs.set_style(TextRange::new(5, 2), red());
        assert_eq!(
            runs.runs_in(TextRange::new(0, 10)),
            vec![
                (TextRange::new(0, 2), Style::default()),
                (TextRange::new(2, 5), red()),
                (TextRange::new(7, 3), Style::default()),
            ]
        );
    }

    #[test]
    fn test_replace_shifts_following_runs() {
        let mut runs = StyleRuns::new(6);
        runs.set_style(TextRange::new(4, 2), blue());
        runs.replace(1, 2, 5, red());
        assert_eq!(runs.len(), 9);
        assert_eq!(runs.style_at(0), Style::default());
        assert_eq!(runs.style_at(1), red());
        assert_eq!(runs.style_at(5), red());
        assert_eq!(runs.style_at(6), Style::default());
        assert_eq!(runs.style_at(7), blue());
        assert_eq!(runs.style_at(8), blue());
    }

    #[test]
    fn test_replace_delete_only() {
        let mut runs = StyleRuns::new(6);
        runs.set_style(TextRange::new(0, 3), red());
        runs.replace(2, 3, 0, Style::default());
        assert_eq!(runs.len(), 3);
        assert_eq!(
            runs.runs_in(TextRange::new(0, 3)),
            vec![(TextRange::new(0, 2), red()), (TextRange::new(2, 1), Style::default())]
        );
    }

    #[test]
    fn test_runs_in_clips() {
        let mut runs = StyleRuns::new(10);
        runs.set_style(TextRange::new(3, 4), red());
        assert_eq!(
            runs.runs_in(TextRange::new(5, 4)),
            vec![(TextRange::new(5, 2), red()), (TextRange::new(7, 2), Style::default())]
        );
    }
}
