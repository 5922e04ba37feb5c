// Chunk: docs/chunks/incremental_invalidation - Incremental highlight invalidation engine

//! rehighlight: incremental syntax highlighting for editable text.
//!
//! This crate re-exports the two workspace crates:
//!
//! - [`buffer`]: grapheme-safe ranges, the code buffer and style types
//! - [`syntax`]: annotations, boundary search, tokenizers and the
//!   [`InvalidationController`] that ties them together
//!
//! # Example
//!
//! ```ignore
//! use rehighlight::{HighlightConfig, InvalidationController, NoopHost, TextRange};
//!
//! let mut controller =
//!     InvalidationController::with_tree_sitter("x = 1\n", HighlightConfig::for_language("python"))?;
//! controller.highlight_all(&mut NoopHost);
//! controller.on_edit(TextRange::new(0, 0), "# note\n", &mut NoopHost);
//! ```

pub use rehighlight_buffer as buffer;
pub use rehighlight_syntax as syntax;

pub use rehighlight_buffer::{grapheme, CharSource, CodeBuffer, Color, NamedColor, Style, TextRange, UnderlineStyle};
pub use rehighlight_syntax::{
    available_themes, Annotation, AnnotationKind, AnnotationStore, BoundaryFinder, ConfigError, CycleOutcome,
    CycleState, HighlightConfig, HighlightError, HighlightJob, HostObserver, InvalidationController, JobResult, NoopHost,
    StyleBatch, ThemeConfig, TokenizeError, TokenizeOutput, Tokenizer, TreeSitterTokenizer,
};
