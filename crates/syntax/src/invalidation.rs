// Chunk: docs/chunks/incremental_invalidation - Incremental highlight invalidation engine

//! Edit-driven highlight cycles for one document.
//!
//! Every edit runs one cycle:
//!
//! ```text
//! Idle -> RangeComputed -> BoundaryExpanded -> Tokenizing -> Committed
//!                |                                 |
//!                v                                 v
//!             Skipped                           Failed
//! ```
//!
//! - **RangeComputed**: the raw affected range is the inserted text, widened
//!   over any annotation the edit cut through. The host may veto it.
//! - **BoundaryExpanded**: the [`BoundaryFinder`] turns it into a safe range
//!   for the language in effect there.
//! - **Tokenizing**: the safe range's text goes to the [`Tokenizer`]. When a
//!   comment or multi-line token runs off the end of the range, or an old one
//!   that crossed the end disappears, the range grows and is re-tokenized.
//! - **Committed**: styles of the safe range are rewritten, annotations of
//!   the range are replaced and the host receives a [`StyleBatch`].
//!
//! A cycle mutates styles and annotations only in the commit step. A failed
//! cycle leaves both untouched; editing is never blocked.
//!
//! # Background mode
//!
//! [`prepare`](InvalidationController::prepare) snapshots a cycle into a
//! [`HighlightJob`] that can be tokenized on another thread.
//! [`commit`](InvalidationController::commit) applies the result unless an
//! edit landed before the end of the job's range in the meantime; such
//! results are discarded.

use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, trace, warn};
use rehighlight_buffer::grapheme::{align_range, bounded_range};
use rehighlight_buffer::{CharSource, CodeBuffer, Style, TextRange};

use crate::annotation::{Annotation, AnnotationKind, AnnotationStore};
use crate::boundary::BoundaryFinder;
use crate::config::{HighlightConfig, ThemeConfig};
use crate::error::{ConfigError, HighlightError, TokenizeError};
use crate::host::{HostObserver, StyleBatch};
use crate::theme::SyntaxTheme;
use crate::tokenizer::{TokenizeOutput, Tokenizer};
use crate::treesitter::TreeSitterTokenizer;

/// Edits remembered for validating background results.
const EDIT_LOG_CAPACITY: usize = 256;

/// Where the most recent cycle got to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    RangeComputed,
    BoundaryExpanded,
    Tokenizing,
    Committed,
    Skipped,
    Failed,
    Discarded,
}

/// How a cycle ended. Ranges are the final safe range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Committed(TextRange),
    /// The host vetoed the range.
    Skipped(TextRange),
    Failed {
        range: TextRange,
        error: HighlightError,
    },
    /// A background result went stale before commit.
    Discarded(TextRange),
    /// No language, or highlighting on change is off.
    Disabled,
}

impl CycleOutcome {
    pub fn range(&self) -> Option<TextRange> {
        match self {
            CycleOutcome::Committed(range)
            | CycleOutcome::Skipped(range)
            | CycleOutcome::Discarded(range)
            | CycleOutcome::Failed { range, .. } => Some(*range),
            CycleOutcome::Disabled => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, CycleOutcome::Committed(_))
    }
}

/// The decisions made before tokenizing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CyclePlan {
    language: String,
    safe: TextRange,
    scope: TextRange,
}

/// A snapshot of one cycle, ready to be tokenized off the editing thread.
#[derive(Debug, Clone)]
pub struct HighlightJob {
    generation: u64,
    plan: CyclePlan,
    text: String,
}

impl HighlightJob {
    /// The safe range the job covers.
    pub fn range(&self) -> TextRange {
        self.plan.safe
    }

    pub fn language(&self) -> &str {
        &self.plan.language
    }

    /// Tokenizes the snapshot. Touches nothing but the job itself.
    pub fn run(self, tokenizer: &dyn Tokenizer) -> JobResult {
        let output = tokenizer.tokenize(&self.text, &self.plan.language);
        JobResult { job: self, output }
    }
}

/// A finished job, to be handed back to [`InvalidationController::commit`].
#[derive(Debug, Clone)]
pub struct JobResult {
    job: HighlightJob,
    output: Result<TokenizeOutput, TokenizeError>,
}

impl JobResult {
    pub fn range(&self) -> TextRange {
        self.job.range()
    }
}

/// Keeps one document's styles and annotations in step with its edits.
pub struct InvalidationController {
    buffer: CodeBuffer,
    annotations: AnnotationStore,
    tokenizer: Arc<dyn Tokenizer>,
    config: HighlightConfig,
    state: CycleState,
    generation: u64,
    /// (generation, edit location) of recent edits, oldest first.
    edit_log: VecDeque<(u64, usize)>,
    /// Jobs older than this generation can no longer be validated.
    log_floor: u64,
    needs_full: bool,
}

impl InvalidationController {
    /// Creates a controller for `text`. Nothing is highlighted until the
    /// first edit or an explicit [`highlight_all`](Self::highlight_all).
    pub fn new(text: &str, tokenizer: Arc<dyn Tokenizer>, config: HighlightConfig) -> Self {
        let buffer = CodeBuffer::from_str(text);
        let annotations = AnnotationStore::with_base_language(buffer.len(), config.base_language.clone());
        Self {
            buffer,
            annotations,
            tokenizer,
            config,
            state: CycleState::Idle,
            generation: 0,
            edit_log: VecDeque::new(),
            log_floor: 0,
            needs_full: true,
        }
    }

    /// Creates a controller using the tree-sitter tokenizer with the
    /// configured theme.
    pub fn with_tree_sitter(text: &str, config: HighlightConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let theme = SyntaxTheme::from_config(&config.theme)?;
        let tokenizer: Arc<dyn Tokenizer> = Arc::new(TreeSitterTokenizer::with_theme(theme));
        Ok(Self::new(text, tokenizer, config))
    }

    // ==================== Accessors ====================

    pub fn buffer(&self) -> &CodeBuffer {
        &self.buffer
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// State of the most recent cycle.
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Incremented on every edit.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A handle to the tokenizer, for running background jobs.
    pub fn tokenizer(&self) -> Arc<dyn Tokenizer> {
        Arc::clone(&self.tokenizer)
    }

    fn transition(&mut self, next: CycleState) {
        trace!("cycle {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn whole_buffer(&self) -> TextRange {
        TextRange::new(0, self.buffer.len())
    }

    // ==================== Edits ====================

    /// Replaces `edit` with `text` and runs a highlight cycle.
    pub fn on_edit(&mut self, edit: TextRange, text: &str, host: &mut dyn HostObserver) -> CycleOutcome {
        self.replace_characters(edit, text, false, host)
    }

    /// Replaces `range` with `text` and runs a highlight cycle.
    ///
    /// With `inherit_context` the new text first takes the style of the
    /// character before it, so the display stays stable if the cycle is
    /// vetoed or fails.
    pub fn replace_characters(
        &mut self,
        range: TextRange,
        text: &str,
        inherit_context: bool,
        host: &mut dyn HostObserver,
    ) -> CycleOutcome {
        let affected = self.apply_replacement(range, text, inherit_context);
        if !self.config.highlight_on_change {
            return CycleOutcome::Disabled;
        }
        self.run_cycle(affected, host)
    }

    /// Applies a replacement to the buffer and annotations. Returns the raw
    /// affected range in post-edit coordinates.
    fn apply_replacement(&mut self, range: TextRange, text: &str, inherit_context: bool) -> TextRange {
        let len = self.buffer.len();
        let edit = bounded_range(range, len);
        if edit != range {
            debug!(
                "{}; clamped to {}",
                HighlightError::OutOfRangeInput {
                    location: range.location,
                    length: range.length,
                    buffer_len: len,
                },
                edit
            );
        }
        let edit = align_range(&self.buffer, edit);

        // Annotations the edit cuts through are dropped; their text must be re-tokenized
        let mut affected_start = edit.location;
        let mut affected_old_end = edit.end();
        for kind in [
            AnnotationKind::LanguageBlock,
            AnnotationKind::MultiLineElement,
            AnnotationKind::Comment,
        ] {
            for annotation in self.annotations.annotations(kind) {
                let range = annotation.range;
                let cut = range.end() > edit.location
                    && range.location < edit.end()
                    && !range.contains_range(edit);
                if cut {
                    affected_start = affected_start.min(range.location);
                    affected_old_end = affected_old_end.max(range.end());
                }
            }
        }

        // An unterminated construct runs to the end of the buffer; text
        // appended there continues it
        if edit.location == len {
            for kind in [AnnotationKind::MultiLineElement, AnnotationKind::Comment] {
                let open = self.annotations.annotations(kind).iter().find(|a| a.range.end() == len);
                if let Some(open) = open {
                    affected_start = affected_start.min(open.range.location);
                }
            }
        }

        let inserted = if inherit_context {
            self.buffer.replace_inheriting_style(edit, text)
        } else {
            self.buffer.replace(edit, text)
        };
        self.annotations.apply_edit(edit, inserted.length);

        self.generation += 1;
        self.edit_log.push_back((self.generation, edit.location));
        if self.edit_log.len() > EDIT_LOG_CAPACITY {
            if let Some((generation, _)) = self.edit_log.pop_front() {
                self.log_floor = generation;
            }
        }

        let affected_end = if affected_old_end > edit.end() {
            affected_old_end - edit.length + inserted.length
        } else {
            inserted.end()
        };
        trace!("edit {} -> {} (generation {})", edit, inserted, self.generation);
        TextRange::from_bounds(affected_start, affected_end)
    }

    /// Makes the next cycle re-tokenize the whole buffer.
    pub fn set_needs_highlight(&mut self) {
        self.needs_full = true;
    }

    /// Sets the base language and re-highlights everything.
    ///
    /// `None` clears all styles and annotations and disables highlighting.
    /// If the new language's first cycle does not commit, the previous
    /// annotations stay in place.
    pub fn set_language(&mut self, language: Option<String>, host: &mut dyn HostObserver) -> CycleOutcome {
        self.config.base_language = language.clone();
        let previous = self.annotations.clone();
        self.annotations.clear();
        self.annotations.set_base_language(language.clone());
        self.needs_full = true;
        if self.config.base_language.is_none() {
            let all = self.whole_buffer();
            self.buffer.clear_styles(all);
            host.apply_styles(&StyleBatch {
                range: all,
                spans: Vec::new(),
            });
            return CycleOutcome::Disabled;
        }

        let outcome = self.highlight_all(host);
        if !outcome.is_committed() {
            self.annotations = previous;
            self.annotations.set_base_language(language);
        }
        outcome
    }

    /// Switches the theme and re-highlights everything.
    pub fn set_theme(&mut self, theme: ThemeConfig, host: &mut dyn HostObserver) -> Result<CycleOutcome, ConfigError> {
        SyntaxTheme::from_config(&theme)?;
        self.tokenizer.theme_changed(&theme)?;
        self.config.theme = theme;
        self.needs_full = true;
        Ok(self.highlight_all(host))
    }

    // ==================== Cycles ====================

    /// Runs a cycle over the whole buffer.
    pub fn highlight_all(&mut self, host: &mut dyn HostObserver) -> CycleOutcome {
        let all = self.whole_buffer();
        self.highlight(all, host)
    }

    /// Runs a cycle over `range`, whether or not highlighting on change is on.
    pub fn highlight(&mut self, range: TextRange, host: &mut dyn HostObserver) -> CycleOutcome {
        self.run_cycle(range, host)
    }

    fn run_cycle(&mut self, raw: TextRange, host: &mut dyn HostObserver) -> CycleOutcome {
        let plan = match self.begin(raw, host) {
            Ok(plan) => plan,
            Err(outcome) => return outcome,
        };
        let text = self.buffer.text_in(plan.safe);
        let output = self.tokenizer.tokenize(&text, &plan.language);
        self.finish(plan, output, host)
    }

    /// Takes a cycle from `Idle` to `Tokenizing`: computes the raw range,
    /// asks the host, then expands to a safe range.
    fn begin(&mut self, raw: TextRange, host: &mut dyn HostObserver) -> Result<CyclePlan, CycleOutcome> {
        self.transition(CycleState::RangeComputed);
        let raw = if self.needs_full {
            self.whole_buffer()
        } else {
            bounded_range(raw, self.buffer.len())
        };
        if self.annotations.language_at(raw.location).is_none() {
            self.transition(CycleState::Idle);
            return Err(CycleOutcome::Disabled);
        }

        if !host.should_highlight(raw) {
            debug!("host vetoed highlight of {}", raw);
            self.transition(CycleState::Skipped);
            return Err(CycleOutcome::Skipped(raw));
        }

        let Some(plan) = self.plan(raw) else {
            self.transition(CycleState::Idle);
            return Err(CycleOutcome::Disabled);
        };
        self.transition(CycleState::BoundaryExpanded);
        self.transition(CycleState::Tokenizing);
        Ok(plan)
    }

    /// Picks the language and safe range for a raw affected range.
    fn plan(&self, raw: TextRange) -> Option<CyclePlan> {
        let language = self.annotations.language_at(raw.location)?.to_string();
        let finder = BoundaryFinder::new(&self.buffer, &self.annotations, self.config.max_scan_lines);
        let scope = finder.scope(raw);
        let safe = finder.highlight_range(raw, &language);
        let safe = self.widen_start(safe);
        debug!("cycle for {} in {}: safe {} within {}", raw, language, safe, scope);
        Some(CyclePlan {
            language,
            safe,
            scope,
        })
    }

    /// Moves the start of `range` out of any comment or multi-line element.
    fn widen_start(&self, range: TextRange) -> TextRange {
        let mut start = range.location;
        while let Some(container) = self
            .annotations
            .annotations(AnnotationKind::MultiLineElement)
            .iter()
            .chain(self.annotations.annotations(AnnotationKind::Comment))
            .find(|a| a.range.strictly_contains(start))
        {
            start = container.range.location;
        }
        TextRange::from_bounds(start, range.end())
    }

    /// Grows the range as needed, then commits or fails.
    fn finish(
        &mut self,
        plan: CyclePlan,
        output: Result<TokenizeOutput, TokenizeError>,
        host: &mut dyn HostObserver,
    ) -> CycleOutcome {
        let mut safe = plan.safe;
        let mut output = match output {
            Ok(output) => output,
            Err(err) => return self.fail(safe, err, host),
        };

        for pass in 0..self.config.max_growth_passes {
            let Some(grown) = self.growth_target(&plan, safe, &output) else {
                break;
            };
            debug!("growth pass {}: {} -> {}", pass + 1, safe, grown);
            safe = grown;
            let text = self.buffer.text_in(safe);
            output = match self.tokenizer.tokenize(&text, &plan.language) {
                Ok(output) => output,
                Err(err) => return self.fail(safe, err, host),
            };
        }

        self.commit_output(safe, &plan.language, output, host)
    }

    /// Returns a larger range when a multi-line construct crosses the end of `safe`.
    fn growth_target(&self, plan: &CyclePlan, safe: TextRange, output: &TokenizeOutput) -> Option<TextRange> {
        let scope_end = plan.scope.end().min(self.buffer.len());
        if safe.end() >= scope_end {
            return None;
        }

        // A new construct runs off the end: it may continue past it
        let runs_off = output
            .multi_line_spans
            .iter()
            .map(|(range, _)| *range)
            .chain(output.comment_spans.iter().copied())
            .any(|range| safe.location + range.end() >= safe.end());
        if runs_off {
            return Some(TextRange::from_bounds(safe.location, scope_end));
        }

        // An old construct crossed the end and was not reproduced: the text
        // after it was styled as its inside and needs a fresh look
        let crossing_end = self
            .annotations
            .annotations(AnnotationKind::MultiLineElement)
            .iter()
            .chain(self.annotations.annotations(AnnotationKind::Comment))
            .filter(|a| a.range.location < safe.end() && a.range.end() > safe.end())
            .map(|a| a.range.end())
            .max()?;
        let finder = BoundaryFinder::new(&self.buffer, &self.annotations, self.config.max_scan_lines);
        let upper = finder
            .upper_boundary(TextRange::empty_at(crossing_end), &plan.language)
            .unwrap_or(scope_end);
        let end = upper.max(crossing_end).min(scope_end);
        Some(align_range(&self.buffer, TextRange::from_bounds(safe.location, end)))
    }

    fn commit_output(
        &mut self,
        safe: TextRange,
        language: &str,
        output: TokenizeOutput,
        host: &mut dyn HostObserver,
    ) -> CycleOutcome {
        let output = output.offset_by(safe.location);

        let spans: Vec<(TextRange, Style)> = output
            .styled_spans
            .iter()
            .filter_map(|(range, style)| range.intersection(safe).map(|r| (r, *style)))
            .filter(|(range, _)| !range.is_empty())
            .collect();
        self.buffer.clear_styles(safe);
        for (range, style) in &spans {
            self.buffer.set_style(*range, *style);
        }

        let mut fresh: Vec<Annotation> = Vec::new();
        fresh.extend(
            output
                .sub_language_spans
                .into_iter()
                .map(|(range, lang)| Annotation::language_block(range, lang)),
        );
        fresh.extend(
            output
                .multi_line_spans
                .into_iter()
                .map(|(range, class)| Annotation::multi_line(range, class)),
        );
        fresh.extend(output.comment_spans.into_iter().map(Annotation::comment));

        // Text in an embedded language keeps its block even if the tokenizer
        // only reports blocks nested inside it
        let is_base = self.annotations.base_language() == Some(language);
        let has_block_at_start = fresh
            .iter()
            .any(|a| a.kind == AnnotationKind::LanguageBlock && a.range.location == safe.location);
        if !is_base && !has_block_at_start && !safe.is_empty() {
            fresh.push(Annotation::language_block(safe, language));
        }

        self.annotations.replace(safe, fresh);
        if safe == self.whole_buffer() {
            self.needs_full = false;
        }

        self.transition(CycleState::Committed);
        host.apply_styles(&StyleBatch { range: safe, spans });
        host.did_highlight(safe, true);
        CycleOutcome::Committed(safe)
    }

    fn fail(&mut self, range: TextRange, err: TokenizeError, host: &mut dyn HostObserver) -> CycleOutcome {
        warn!("highlight of {} failed: {}", range, err);
        self.transition(CycleState::Failed);
        host.did_highlight(range, false);
        CycleOutcome::Failed {
            range,
            error: err.into(),
        }
    }

    // ==================== Background mode ====================

    /// Plans a cycle over `range` and snapshots it for off-thread tokenizing.
    ///
    /// Returns `None` when there is no language or the host vetoes the range.
    pub fn prepare(&mut self, range: TextRange, host: &mut dyn HostObserver) -> Option<HighlightJob> {
        let plan = self.begin(range, host).ok()?;
        Some(HighlightJob {
            generation: self.generation,
            text: self.buffer.text_in(plan.safe),
            plan,
        })
    }

    /// Commits a background result, or discards it if edits made it stale.
    pub fn commit(&mut self, result: JobResult, host: &mut dyn HostObserver) -> CycleOutcome {
        let JobResult { mut job, output } = result;
        if self.is_stale(&job) {
            debug!(
                "discarding stale result for {} (generation {} < {})",
                job.plan.safe, job.generation, self.generation
            );
            self.transition(CycleState::Discarded);
            return CycleOutcome::Discarded(job.plan.safe);
        }
        // Edits past the job's range may have moved or shrunk its scope
        let finder = BoundaryFinder::new(&self.buffer, &self.annotations, self.config.max_scan_lines);
        job.plan.scope = finder.scope(job.plan.safe);
        self.finish(job.plan, output, host)
    }

    fn is_stale(&self, job: &HighlightJob) -> bool {
        if job.generation == self.generation {
            return false;
        }
        if job.generation < self.log_floor {
            return true;
        }
        let end = job.plan.safe.end();
        let edited_before_end = self
            .edit_log
            .iter()
            .any(|&(generation, location)| generation > job.generation && location < end);
        if edited_before_end {
            return true;
        }
        end > self.buffer.len() || self.buffer.text_in(job.plan.safe) != job.text
    }
}
