// Chunk: docs/chunks/annotation_store - Buffer regions inside multi-line constructs

//! Annotations remember what the last highlight pass learned about regions
//! of the buffer that a single line cannot reveal on its own:
//!
//! - [`AnnotationKind::LanguageBlock`]: an embedded sub-language (CSS inside
//!   `<style>`, a fenced code block in Markdown)
//! - [`AnnotationKind::MultiLineElement`]: a token that may span lines
//!   (strings, regex literals)
//! - [`AnnotationKind::Comment`]: a comment
//!
//! The boundary finder consults the store to avoid restarting tokenization in
//! the middle of such a construct.
//!
//! # Invariants
//!
//! - Annotations of one kind never overlap (adjacency is fine).
//! - No annotation reaches past the buffer length the store was last told
//!   about. Violators are dropped with a warning, never clamped.
//! - Every stored annotation is non-empty.

use log::{trace, warn};
use rehighlight_buffer::grapheme::bounded_range;
use rehighlight_buffer::TextRange;

use crate::error::HighlightError;

/// The three kinds of region the highlighter tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// Payload: sub-language identifier.
    LanguageBlock,
    /// Payload: the token class that may span lines, e.g. `"string"`.
    MultiLineElement,
    /// No payload.
    Comment,
}

/// A tracked region of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub range: TextRange,
    pub kind: AnnotationKind,
    pub payload: Option<String>,
}

impl Annotation {
    pub fn language_block(range: TextRange, language: impl Into<String>) -> Self {
        Self {
            range,
            kind: AnnotationKind::LanguageBlock,
            payload: Some(language.into()),
        }
    }

    pub fn multi_line(range: TextRange, class: impl Into<String>) -> Self {
        Self {
            range,
            kind: AnnotationKind::MultiLineElement,
            payload: Some(class.into()),
        }
    }

    pub fn comment(range: TextRange) -> Self {
        Self {
            range,
            kind: AnnotationKind::Comment,
            payload: None,
        }
    }

    /// The sub-language of a `LanguageBlock`.
    pub fn language(&self) -> Option<&str> {
        match self.kind {
            AnnotationKind::LanguageBlock => self.payload.as_deref(),
            _ => None,
        }
    }
}

/// The set of annotations for one buffer.
///
/// Each kind is kept in its own list, sorted by location.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    language_blocks: Vec<Annotation>,
    multi_lines: Vec<Annotation>,
    comments: Vec<Annotation>,
    base_language: Option<String>,
    buffer_len: usize,
}

impl AnnotationStore {
    /// Creates an empty store for a buffer of `buffer_len` characters.
    pub fn new(buffer_len: usize) -> Self {
        Self {
            buffer_len,
            ..Self::default()
        }
    }

    pub fn with_base_language(buffer_len: usize, base_language: Option<String>) -> Self {
        Self {
            base_language,
            buffer_len,
            ..Self::default()
        }
    }

    /// The language of text outside every `LanguageBlock`.
    pub fn base_language(&self) -> Option<&str> {
        self.base_language.as_deref()
    }

    pub fn set_base_language(&mut self, language: Option<String>) {
        self.base_language = language;
    }

    /// The buffer length the annotations are validated against.
    pub fn buffer_len(&self) -> usize {
        self.buffer_len
    }

    fn list(&self, kind: AnnotationKind) -> &Vec<Annotation> {
        match kind {
            AnnotationKind::LanguageBlock => &self.language_blocks,
            AnnotationKind::MultiLineElement => &self.multi_lines,
            AnnotationKind::Comment => &self.comments,
        }
    }

    fn list_mut(&mut self, kind: AnnotationKind) -> &mut Vec<Annotation> {
        match kind {
            AnnotationKind::LanguageBlock => &mut self.language_blocks,
            AnnotationKind::MultiLineElement => &mut self.multi_lines,
            AnnotationKind::Comment => &mut self.comments,
        }
    }

    /// All annotations of `kind`, ordered by location.
    pub fn annotations(&self, kind: AnnotationKind) -> &[Annotation] {
        self.list(kind)
    }

    /// Total number of annotations of every kind.
    pub fn len(&self) -> usize {
        self.language_blocks.len() + self.multi_lines.len() + self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every annotation. The base language and buffer length stay.
    pub fn clear(&mut self) {
        self.language_blocks.clear();
        self.multi_lines.clear();
        self.comments.clear();
    }

    // ==================== Queries ====================

    /// Returns the annotations of `kind` intersecting `range`, ordered by location.
    ///
    /// A zero-length `range` matches annotations that strictly contain its
    /// location.
    pub fn query(&self, range: TextRange, kind: AnnotationKind) -> Vec<Annotation> {
        self.list(kind)
            .iter()
            .filter(|a| a.range.intersects(range))
            .cloned()
            .collect()
    }

    /// Returns the `LanguageBlock` covering `location`, if any.
    pub fn language_block_at(&self, location: usize) -> Option<&Annotation> {
        self.language_blocks
            .iter()
            .filter(|a| a.range.contains(location))
            .min_by_key(|a| a.range.length)
    }

    /// Returns the language in effect at `location`.
    ///
    /// That is the innermost `LanguageBlock` covering it, else the base language.
    pub fn language_at(&self, location: usize) -> Option<&str> {
        self.language_block_at(location)
            .and_then(Annotation::language)
            .or(self.base_language.as_deref())
    }

    /// Returns true if `location` lies strictly inside a multi-line element
    /// or a comment.
    pub fn is_inside_multi_line_or_comment(&self, location: usize) -> bool {
        self.multi_lines
            .iter()
            .chain(self.comments.iter())
            .any(|a| a.range.strictly_contains(location))
    }

    // ==================== Mutations ====================

    /// Replaces the annotations of `range` with `new_annotations`.
    ///
    /// Every multi-line element and comment intersecting `range` is removed.
    /// Language blocks are clipped to the parts outside `range`, so a partial
    /// re-highlight of an embedded block keeps the rest of it. New
    /// annotations must lie within `range` and the buffer; others are dropped
    /// with a warning. Same-kind overlaps among the results are normalized.
    pub fn replace(&mut self, range: TextRange, new_annotations: Vec<Annotation>) {
        let range = bounded_range(range, self.buffer_len);

        self.multi_lines.retain(|a| !a.range.intersects(range));
        self.comments.retain(|a| !a.range.intersects(range));
        let blocks = std::mem::take(&mut self.language_blocks);
        for block in blocks {
            if !block.range.intersects(range) {
                self.language_blocks.push(block);
                continue;
            }
            let left = TextRange::from_bounds(block.range.location, range.location);
            let right = TextRange::from_bounds(range.end(), block.range.end());
            for piece in [left, right] {
                if !piece.is_empty() {
                    self.language_blocks.push(Annotation {
                        range: piece,
                        ..block.clone()
                    });
                }
            }
        }

        for annotation in new_annotations {
            if annotation.range.is_empty() {
                continue;
            }
            if annotation.range.end() > self.buffer_len {
                self.report_violation(&annotation);
                continue;
            }
            if !range.contains_range(annotation.range) {
                warn!(
                    "dropping {:?} annotation {} outside replaced range {}",
                    annotation.kind, annotation.range, range
                );
                continue;
            }
            self.list_mut(annotation.kind).push(annotation);
        }

        self.normalize();
        trace!("annotations replaced in {}: {} total", range, self.len());
    }

    /// Updates annotations for an edit that replaced `edit_range` with
    /// `replacement_len` characters.
    ///
    /// - wholly before the edit: kept
    /// - at or after the old edit end: shifted by the length delta
    /// - wholly containing the edit: resized by the length delta
    /// - partially overlapping the edit: dropped
    pub fn apply_edit(&mut self, edit_range: TextRange, replacement_len: usize) {
        let edit = bounded_range(edit_range, self.buffer_len);
        let new_len = self.buffer_len - edit.length + replacement_len;

        for kind in [
            AnnotationKind::LanguageBlock,
            AnnotationKind::MultiLineElement,
            AnnotationKind::Comment,
        ] {
            let list = std::mem::take(self.list_mut(kind));
            let updated: Vec<Annotation> = list
                .into_iter()
                .filter_map(|annotation| edit_annotation(annotation, edit, replacement_len))
                .collect();
            *self.list_mut(kind) = updated;
        }

        self.buffer_len = new_len;
        self.enforce_bounds();
    }

    /// Shifts annotations for an edit of `length_delta` characters at
    /// `edit_location`.
    ///
    /// A positive delta is an insertion; a negative one deletes
    /// `[edit_location, edit_location - length_delta)`.
    pub fn shift(&mut self, edit_location: usize, length_delta: isize) {
        if length_delta >= 0 {
            self.apply_edit(TextRange::empty_at(edit_location), length_delta as usize);
        } else {
            self.apply_edit(
                TextRange::new(edit_location, length_delta.unsigned_abs()),
                0,
            );
        }
    }

    /// Drops annotations reaching past the buffer end.
    fn enforce_bounds(&mut self) {
        let len = self.buffer_len;
        let mut dropped = Vec::new();
        for kind in [
            AnnotationKind::LanguageBlock,
            AnnotationKind::MultiLineElement,
            AnnotationKind::Comment,
        ] {
            self.list_mut(kind).retain(|a| {
                let ok = a.range.end() <= len;
                if !ok {
                    dropped.push(a.clone());
                }
                ok
            });
        }
        for annotation in dropped {
            self.report_violation(&annotation);
        }
    }

    fn report_violation(&self, annotation: &Annotation) {
        let err = HighlightError::InvariantViolation {
            location: annotation.range.location,
            length: annotation.range.length,
            buffer_len: self.buffer_len,
        };
        warn!("dropping {:?} annotation: {}", annotation.kind, err);
    }

    fn normalize(&mut self) {
        self.language_blocks = flatten_blocks(std::mem::take(&mut self.language_blocks));
        self.multi_lines = merge_overlapping(std::mem::take(&mut self.multi_lines));
        self.comments = merge_overlapping(std::mem::take(&mut self.comments));
    }
}

/// Applies one edit to one annotation. `None` means the annotation is gone.
fn edit_annotation(
    mut annotation: Annotation,
    edit: TextRange,
    replacement_len: usize,
) -> Option<Annotation> {
    let range = annotation.range;
    if range.end() <= edit.location {
        return Some(annotation);
    }
    if range.location >= edit.end() {
        annotation.range = TextRange::new(range.location - edit.length + replacement_len, range.length);
        return Some(annotation);
    }
    if range.contains_range(edit) {
        let length = range.length - edit.length + replacement_len;
        if length == 0 {
            return None;
        }
        annotation.range = TextRange::new(range.location, length);
        return Some(annotation);
    }
    trace!("edit {} drops {:?} annotation {}", edit, annotation.kind, range);
    None
}

/// Sorts and merges overlapping annotations. Adjacent ones stay separate.
fn merge_overlapping(mut list: Vec<Annotation>) -> Vec<Annotation> {
    list.sort_by_key(|a| a.range.location);
    let mut merged: Vec<Annotation> = Vec::with_capacity(list.len());
    for annotation in list {
        match merged.last_mut() {
            Some(last) if annotation.range.location < last.range.end() => {
                last.range = last.range.union(annotation.range);
            }
            _ => merged.push(annotation),
        }
    }
    merged
}

/// Flattens nested or overlapping language blocks so the innermost wins,
/// then joins touching blocks of the same language.
fn flatten_blocks(mut blocks: Vec<Annotation>) -> Vec<Annotation> {
    // Outer blocks first; each later (smaller) block carves its range out of
    // everything placed before it.
    blocks.sort_by(|a, b| b.range.length.cmp(&a.range.length));
    let mut placed: Vec<Annotation> = Vec::with_capacity(blocks.len());
    for block in blocks {
        let mut carved = Vec::with_capacity(placed.len() + 2);
        for existing in placed {
            if !existing.range.intersects(block.range) {
                carved.push(existing);
                continue;
            }
            let left = TextRange::from_bounds(existing.range.location, block.range.location);
            let right = TextRange::from_bounds(block.range.end(), existing.range.end());
            for piece in [left, right] {
                if !piece.is_empty() {
                    carved.push(Annotation {
                        range: piece,
                        ..existing.clone()
                    });
                }
            }
        }
        carved.push(block);
        placed = carved;
    }

    placed.sort_by_key(|a| a.range.location);
    let mut joined: Vec<Annotation> = Vec::with_capacity(placed.len());
    for block in placed {
        match joined.last_mut() {
            Some(last) if last.payload == block.payload && block.range.location <= last.range.end() => {
                last.range = last.range.union(block.range);
            }
            _ => joined.push(block),
        }
    }
    joined
}
