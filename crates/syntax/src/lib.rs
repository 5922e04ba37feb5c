// Chunk: docs/chunks/incremental_invalidation - Incremental highlight invalidation engine

//! rehighlight-syntax: incremental syntax highlighting for an editable buffer.
//!
//! After every edit only a small, safe range of the buffer is re-tokenized.
//! The range starts and ends on lines where tokenizer state is known to be
//! fresh, never inside a comment or multi-line string, and never crosses
//! into a region written in another language.
//!
//! # Overview
//!
//! The main types are:
//!
//! - [`InvalidationController`]: owns the buffer and annotations and runs one
//!   highlight cycle per edit, synchronously or as a background
//!   [`HighlightJob`].
//!
//! - [`AnnotationStore`]: structural facts from earlier passes (embedded
//!   language blocks, multi-line tokens, comments) kept current across edits.
//!
//! - [`BoundaryFinder`]: widens an edit to a safe range using per-language
//!   [`BoundaryHints`].
//!
//! - [`Tokenizer`]: the seam to the code that actually styles text.
//!   [`TreeSitterTokenizer`] implements it with the bundled grammars.
//!
//! - [`HighlightConfig`]: base language, theme and limits, loadable from TOML.
//!
//! # Example
//!
//! ```ignore
//! use rehighlight_buffer::TextRange;
//! use rehighlight_syntax::{HighlightConfig, InvalidationController, NoopHost};
//!
//! let config = HighlightConfig::for_language("rust");
//! let mut controller = InvalidationController::with_tree_sitter("fn main() {}\n", config)?;
//! controller.highlight_all(&mut NoopHost);
//!
//! // Type a comment; only the affected lines are re-tokenized
//! let outcome = controller.on_edit(TextRange::new(0, 0), "// entry\n", &mut NoopHost);
//! assert!(outcome.is_committed());
//! ```

mod annotation;
mod boundary;
mod config;
mod error;
mod hints;
mod host;
mod invalidation;
mod offsets;
mod registry;
mod theme;
mod tokenizer;
mod treesitter;

pub use annotation::{Annotation, AnnotationKind, AnnotationStore};
pub use boundary::BoundaryFinder;
pub use config::{HighlightConfig, StyleOverride, ThemeConfig, DEFAULT_MAX_GROWTH_PASSES, DEFAULT_MAX_SCAN_LINES};
pub use error::{ConfigError, HighlightError, Result, TokenizeError};
pub use hints::{hints_for, BoundaryHints};
pub use host::{HostObserver, NoopHost, StyleBatch};
pub use invalidation::{CycleOutcome, CycleState, HighlightJob, InvalidationController, JobResult};
pub use offsets::ByteCharMap;
pub use registry::{canonical_name, LanguageConfig, LanguageRegistry};
pub use theme::{available_themes, SyntaxTheme, DEFAULT_THEME};
pub use tokenizer::{TokenizeOutput, Tokenizer};
pub use treesitter::{TreeSitterTokenizer, DEFAULT_MAX_INJECTION_DEPTH};
