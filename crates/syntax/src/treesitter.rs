// Chunk: docs/chunks/syntax_highlighting - Tree-sitter tokenizer
// Chunk: docs/chunks/highlight_injection - Embedded language highlighting

//! A [`Tokenizer`] backed by tree-sitter grammars.
//!
//! Each call parses the given text from scratch, runs the language's
//! highlights query and maps captures to theme styles. Besides styles it
//! reports the structure the invalidation engine tracks:
//!
//! - `comment*` captures become comment spans
//! - `string*`, `regexp` and raw-text captures containing a newline become
//!   multi-line spans
//! - injection query matches whose language is supported are highlighted
//!   with their own grammar and reported as sub-language spans
//!
//! Compiled queries are cached per language; parsers are created per call so
//! the tokenizer can be shared across threads.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{debug, trace, warn};
use rehighlight_buffer::TextRange;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor, Tree};

use crate::config::ThemeConfig;
use crate::error::{ConfigError, TokenizeError};
use crate::offsets::ByteCharMap;
use crate::registry::{canonical_name, LanguageConfig, LanguageRegistry};
use crate::theme::SyntaxTheme;
use crate::tokenizer::{TokenizeOutput, Tokenizer};

/// How deep injections may nest (HTML > script > template string > ...).
pub const DEFAULT_MAX_INJECTION_DEPTH: usize = 3;

/// A capture entry: (start_byte, end_byte, capture_index).
type CaptureEntry = (usize, usize, u32);

/// Queries compiled for one language.
struct CompiledLanguage {
    config: LanguageConfig,
    highlights: Query,
    injections: Option<Query>,
}

/// Tokenizer for every grammar in a [`LanguageRegistry`].
pub struct TreeSitterTokenizer {
    registry: LanguageRegistry,
    theme: RwLock<SyntaxTheme>,
    compiled: Mutex<HashMap<&'static str, Arc<CompiledLanguage>>>,
    max_injection_depth: usize,
}

impl TreeSitterTokenizer {
    /// Creates a tokenizer with all built-in grammars and the default theme.
    pub fn new() -> Self {
        Self::with_registry(LanguageRegistry::new(), SyntaxTheme::default())
    }

    pub fn with_theme(theme: SyntaxTheme) -> Self {
        Self::with_registry(LanguageRegistry::new(), theme)
    }

    pub fn with_registry(registry: LanguageRegistry, theme: SyntaxTheme) -> Self {
        Self {
            registry,
            theme: RwLock::new(theme),
            compiled: Mutex::new(HashMap::new()),
            max_injection_depth: DEFAULT_MAX_INJECTION_DEPTH,
        }
    }

    /// Sets how deep injected languages may nest. Zero disables injections.
    pub fn set_max_injection_depth(&mut self, depth: usize) {
        self.max_injection_depth = depth;
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Returns a copy of the current theme.
    pub fn theme(&self) -> SyntaxTheme {
        self.theme.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_theme(&self, theme: SyntaxTheme) {
        *self.theme.write().unwrap_or_else(PoisonError::into_inner) = theme;
    }

    /// Returns the compiled queries for `language`, compiling them on first use.
    fn compiled(&self, language: &str) -> Result<Arc<CompiledLanguage>, TokenizeError> {
        let config = self
            .registry
            .config_for_language_name(language)
            .ok_or_else(|| TokenizeError::UnsupportedLanguage(language.to_string()))?;

        let mut cache = self.compiled.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(compiled) = cache.get(config.name) {
            return Ok(Arc::clone(compiled));
        }

        let highlights = Query::new(&config.language, config.highlights_query).map_err(|err| {
            TokenizeError::Query {
                language: config.name.to_string(),
                kind: "highlights",
                message: err.to_string(),
            }
        })?;
        // A broken injection query only costs embedded highlighting.
        let injections = if config.injections_query.is_empty() {
            None
        } else {
            match Query::new(&config.language, config.injections_query) {
                Ok(query) => Some(query),
                Err(err) => {
                    warn!("ignoring injections query for {}: {}", config.name, err);
                    None
                }
            }
        };

        debug!("compiled queries for {}", config.name);
        let compiled = Arc::new(CompiledLanguage {
            config: config.clone(),
            highlights,
            injections,
        });
        cache.insert(config.name, Arc::clone(&compiled));
        Ok(compiled)
    }

    fn parse(&self, compiled: &CompiledLanguage, text: &str) -> Result<Tree, TokenizeError> {
        let parse_error = || TokenizeError::Parse {
            language: compiled.config.name.to_string(),
        };
        let mut parser = Parser::new();
        parser
            .set_language(&compiled.config.language)
            .map_err(|_| parse_error())?;
        parser.parse(text, None).ok_or_else(parse_error)
    }

    fn tokenize_at_depth(&self, text: &str, language: &str, depth: usize) -> Result<TokenizeOutput, TokenizeError> {
        let compiled = self.compiled(language)?;
        let tree = self.parse(&compiled, text)?;
        let map = ByteCharMap::new(text);

        let mut output = self.highlight_captures(&compiled, &tree, text, &map);

        if depth < self.max_injection_depth {
            if let Some(query) = &compiled.injections {
                let injections = collect_injections(query, &tree, text);
                for (injected, bytes) in injections {
                    self.overlay_injection(&mut output, text, &map, compiled.config.name, &injected, bytes, depth);
                }
            }
        }

        output.styled_spans.sort_by_key(|(range, _)| range.location);
        output.sub_language_spans.sort_by_key(|(range, _)| range.location);
        output.multi_line_spans.sort_by_key(|(range, _)| range.location);
        output.comment_spans.sort_by_key(|range| range.location);
        output.comment_spans.dedup();
        trace!(
            "{} chars of {}: {} styled, {} comments, {} multi-line, {} embedded",
            map.char_len(),
            compiled.config.name,
            output.styled_spans.len(),
            output.comment_spans.len(),
            output.multi_line_spans.len(),
            output.sub_language_spans.len()
        );
        Ok(output)
    }

    /// Runs the highlights query and converts captures to spans.
    fn highlight_captures(
        &self,
        compiled: &CompiledLanguage,
        tree: &Tree,
        text: &str,
        map: &ByteCharMap,
    ) -> TokenizeOutput {
        let mut captures: Vec<CaptureEntry> = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut captures_iter = cursor.captures(&compiled.highlights, tree.root_node(), text.as_bytes());
        while let Some((mat, capture_idx)) = captures_iter.next() {
            let capture = &mat.captures[*capture_idx];
            captures.push((capture.node.start_byte(), capture.node.end_byte(), capture.index));
        }
        // Stable: captures starting together keep query order, so the first pattern wins
        captures.sort_by_key(|(start, _, _)| *start);

        let theme = self.theme.read().unwrap_or_else(PoisonError::into_inner);
        let names = compiled.highlights.capture_names();
        let mut output = TokenizeOutput::default();
        let mut covered_until = 0;

        for &(start, end, idx) in &captures {
            let name = names.get(idx as usize).copied().unwrap_or("");
            if name.starts_with('_') || start >= end {
                continue;
            }

            if name.starts_with("comment") {
                let trimmed = text[start..end].trim_end_matches(['\n', '\r']).len();
                if trimmed > 0 {
                    output.comment_spans.push(map.char_range(start..start + trimmed));
                }
            } else if let Some(class) = multi_line_class(name) {
                if text[start..end].contains('\n') {
                    output
                        .multi_line_spans
                        .push((map.char_range(start..end), class.to_string()));
                }
            }

            // Overlapping captures: the first one claims the bytes; a later
            // capture extending past it leaves its tail unstyled.
            if start < covered_until {
                covered_until = covered_until.max(end);
                continue;
            }
            covered_until = end;

            if let Some(style) = theme.style_for_capture(name) {
                if !style.is_plain() {
                    output.styled_spans.push((map.char_range(start..end), *style));
                }
            }
        }

        output
    }

    /// Highlights one injected region and lays it over `output`.
    #[allow(clippy::too_many_arguments)]
    fn overlay_injection(
        &self,
        output: &mut TokenizeOutput,
        text: &str,
        map: &ByteCharMap,
        host_language: &str,
        injected: &str,
        bytes: Range<usize>,
        depth: usize,
    ) {
        let injected = canonical_name(injected);
        if injected == host_language || bytes.start >= bytes.end {
            return;
        }
        if !self.supports(&injected) {
            trace!("skipping injection of unsupported language {}", injected);
            return;
        }
        let Some(content) = text.get(bytes.clone()) else {
            return;
        };

        let inner = match self.tokenize_at_depth(content, &injected, depth + 1) {
            Ok(inner) => inner,
            Err(err) => {
                debug!("injected {} not highlighted: {}", injected, err);
                return;
            }
        };

        let region = map.char_range(bytes);
        let inner = inner.offset_by(region.location);

        // The embedded grammar owns the region; outer styles are clipped away
        let outer = std::mem::take(&mut output.styled_spans);
        for (range, style) in outer {
            if !range.intersects(region) {
                output.styled_spans.push((range, style));
                continue;
            }
            let left = TextRange::from_bounds(range.location, region.location);
            let right = TextRange::from_bounds(region.end(), range.end());
            for piece in [left, right] {
                if !piece.is_empty() {
                    output.styled_spans.push((piece, style));
                }
            }
        }
        output.multi_line_spans.retain(|(range, _)| !region.contains_range(*range));
        output.comment_spans.retain(|range| !region.contains_range(*range));

        output.styled_spans.extend(inner.styled_spans);
        output.multi_line_spans.extend(inner.multi_line_spans);
        output.comment_spans.extend(inner.comment_spans);
        output.sub_language_spans.push((region, injected));
        output.sub_language_spans.extend(inner.sub_language_spans);
    }
}

impl Default for TreeSitterTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for TreeSitterTokenizer {
    fn tokenize(&self, text: &str, language: &str) -> Result<TokenizeOutput, TokenizeError> {
        self.tokenize_at_depth(text, language, 0)
    }

    fn supports(&self, language: &str) -> bool {
        self.registry.config_for_language_name(language).is_some()
    }

    fn theme_changed(&self, theme: &ThemeConfig) -> Result<(), ConfigError> {
        let theme = SyntaxTheme::from_config(theme)?;
        debug!("tokenizer theme set to {}", theme.name());
        self.set_theme(theme);
        Ok(())
    }
}

/// The multi-line class of a capture, if its tokens may span lines.
fn multi_line_class(capture: &str) -> Option<&'static str> {
    let root = capture.split('.').next().unwrap_or(capture);
    match root {
        "string" => Some("string"),
        "regexp" => Some("regexp"),
        _ if capture.starts_with("text.literal") || capture.starts_with("markup.raw") => Some("raw"),
        _ => None,
    }
}

/// Returns (language, content bytes) for every injection query match.
///
/// The language comes from an `@injection.language` capture, else from a
/// `#set! injection.language` property on the pattern.
fn collect_injections(query: &Query, tree: &Tree, text: &str) -> Vec<(String, Range<usize>)> {
    let names = query.capture_names();
    let mut injections = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), text.as_bytes());

    while let Some(mat) = matches.next() {
        let mut language: Option<String> = None;
        let mut content: Option<Range<usize>> = None;
        for capture in mat.captures {
            match names.get(capture.index as usize).copied() {
                Some("injection.language") => {
                    language = text
                        .get(capture.node.byte_range())
                        .map(|name| name.trim().to_string())
                        .filter(|name| !name.is_empty());
                }
                Some("injection.content") => content = Some(capture.node.byte_range()),
                _ => {}
            }
        }
        if language.is_none() {
            language = query
                .property_settings(mat.pattern_index)
                .iter()
                .find(|prop| &*prop.key == "injection.language")
                .and_then(|prop| prop.value.as_deref())
                .map(str::to_string);
        }
        if let (Some(language), Some(content)) = (language, content) {
            injections.push((language, content));
        }
    }
    injections
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehighlight_buffer::Color;

    fn span_at(output: &TokenizeOutput, offset: usize) -> Option<TextRange> {
        output
            .styled_spans
            .iter()
            .map(|(range, _)| *range)
            .find(|range| range.contains(offset))
    }

    #[test]
    fn test_unsupported_language_is_an_error() {
        let tokenizer = TreeSitterTokenizer::new();
        assert!(!tokenizer.supports("cobol"));
        assert_eq!(
            tokenizer.tokenize("MOVE A TO B.", "cobol"),
            Err(TokenizeError::UnsupportedLanguage("cobol".into()))
        );
    }

    #[test]
    fn test_aliases_are_supported() {
        let tokenizer = TreeSitterTokenizer::new();
        for name in ["rs", "Rust", "js", "c++", "sh", "md"] {
            assert!(tokenizer.supports(name), "{} should be supported", name);
        }
    }

    #[test]
    fn test_rust_keyword_is_styled() {
        let tokenizer = TreeSitterTokenizer::new();
        let output = tokenizer.tokenize("fn main() {}", "rust").unwrap();
        let range = span_at(&output, 0).expect("fn should be styled");
        assert_eq!(range, TextRange::new(0, 2));
        let style = output.styled_spans.iter().find(|(r, _)| *r == range).unwrap().1;
        assert!(matches!(style.fg, Color::Rgb { .. }));
    }

    #[test]
    fn test_styled_spans_do_not_overlap() {
        let tokenizer = TreeSitterTokenizer::new();
        let source = "/// Docs\nfn main() {\n    let x = 42;\n    println!(\"hello {}\", x);\n}\n";
        let output = tokenizer.tokenize(source, "rust").unwrap();
        for pair in output.styled_spans.windows(2) {
            assert!(pair[0].0.end() <= pair[1].0.location, "{} overlaps {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn test_char_offsets_for_non_ascii_text() {
        let tokenizer = TreeSitterTokenizer::new();
        let source = "// héllo wörld\nfn f() {}\n";
        let output = tokenizer.tokenize(source, "rust").unwrap();
        assert_eq!(output.comment_spans, vec![TextRange::new(0, 14)]);
        let fn_offset = source.chars().position(|c| c == 'f').unwrap();
        assert_eq!(span_at(&output, fn_offset), Some(TextRange::new(fn_offset, 2)));
    }

    #[test]
    fn test_theme_changed_rebuilds_styles() {
        let tokenizer = TreeSitterTokenizer::new();
        let config: ThemeConfig = toml::from_str(
            r##"
            [overrides.keyword]
            fg = "#010203"
            "##,
        )
        .unwrap();
        tokenizer.theme_changed(&config).unwrap();
        let output = tokenizer.tokenize("fn main() {}", "rust").unwrap();
        assert_eq!(output.styled_spans[0].1.fg, Color::Rgb { r: 1, g: 2, b: 3 });

        let bad = ThemeConfig {
            name: Some("nope".into()),
            ..ThemeConfig::default()
        };
        assert!(tokenizer.theme_changed(&bad).is_err());
        assert_eq!(tokenizer.theme().style_for_capture("keyword").unwrap().fg, Color::Rgb { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn test_multi_line_class() {
        assert_eq!(multi_line_class("string"), Some("string"));
        assert_eq!(multi_line_class("string.special"), Some("string"));
        assert_eq!(multi_line_class("text.literal"), Some("raw"));
        assert_eq!(multi_line_class("keyword"), None);
        assert_eq!(multi_line_class("comment"), None);
    }
}
