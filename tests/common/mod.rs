//! Shared helpers for scenario tests: a small C-like tokenizer and a host
//! that records every callback.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rehighlight::{
    AnnotationKind, Color, HighlightConfig, HostObserver, InvalidationController, NamedColor, StyleBatch, Style,
    TextRange, TokenizeError, TokenizeOutput, Tokenizer,
};

pub fn comment_style() -> Style {
    Style {
        fg: Color::Named(NamedColor::BrightBlack),
        italic: true,
        ..Style::default()
    }
}

pub fn string_style() -> Style {
    Style::fg(Color::Named(NamedColor::Green))
}

pub fn keyword_style() -> Style {
    Style::fg(Color::Named(NamedColor::Magenta))
}

const KEYWORDS: &[&str] = &["int", "char", "return"];

/// Tokenizes `c`: `/* */` comments, `"` strings (which may span lines) and
/// a few keywords. Unterminated comments and strings run to the end of the
/// text, as a real tokenizer would report them.
#[derive(Default)]
pub struct BlockCommentTokenizer {
    calls: AtomicUsize,
}

impl BlockCommentTokenizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn find(chars: &[char], from: usize, needle: &[char]) -> Option<usize> {
    (from..chars.len().saturating_sub(needle.len() - 1)).find(|&i| chars[i..].starts_with(needle))
}

impl Tokenizer for BlockCommentTokenizer {
    fn tokenize(&self, text: &str, language: &str) -> Result<TokenizeOutput, TokenizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.supports(language) {
            return Err(TokenizeError::UnsupportedLanguage(language.to_string()));
        }

        let chars: Vec<char> = text.chars().collect();
        let mut output = TokenizeOutput::default();
        let mut i = 0;
        while i < chars.len() {
            if chars[i..].starts_with(&['/', '*']) {
                let end = find(&chars, i + 2, &['*', '/']).map_or(chars.len(), |close| close + 2);
                let range = TextRange::from_bounds(i, end);
                output.styled_spans.push((range, comment_style()));
                output.comment_spans.push(range);
                i = end;
            } else if chars[i] == '"' {
                let end = (i + 1..chars.len())
                    .find(|&j| chars[j] == '"')
                    .map_or(chars.len(), |close| close + 1);
                let range = TextRange::from_bounds(i, end);
                output.styled_spans.push((range, string_style()));
                if chars[i..end].contains(&'\n') {
                    output.multi_line_spans.push((range, "string".to_string()));
                }
                i = end;
            } else if chars[i].is_ascii_alphabetic() {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if KEYWORDS.contains(&word.as_str()) {
                    output
                        .styled_spans
                        .push((TextRange::from_bounds(start, i), keyword_style()));
                }
            } else {
                i += 1;
            }
        }
        Ok(output)
    }

    fn supports(&self, language: &str) -> bool {
        language == "c"
    }
}

/// Records every host callback; vetoes everything while `veto` is set.
#[derive(Default)]
pub struct RecordingHost {
    pub veto: bool,
    pub asked: Vec<TextRange>,
    pub results: Vec<(TextRange, bool)>,
    pub batches: Vec<StyleBatch>,
}

impl HostObserver for RecordingHost {
    fn should_highlight(&mut self, range: TextRange) -> bool {
        self.asked.push(range);
        !self.veto
    }

    fn did_highlight(&mut self, range: TextRange, success: bool) {
        self.results.push((range, success));
    }

    fn apply_styles(&mut self, batch: &StyleBatch) {
        self.batches.push(batch.clone());
    }
}

/// A controller over `text` in `c`, plus a handle to its tokenizer.
pub fn c_controller(text: &str) -> (InvalidationController, Arc<BlockCommentTokenizer>) {
    let tokenizer = Arc::new(BlockCommentTokenizer::default());
    let controller = InvalidationController::new(
        text,
        Arc::clone(&tokenizer) as Arc<dyn Tokenizer>,
        HighlightConfig::for_language("c"),
    );
    (controller, tokenizer)
}

/// Everything a highlight pass leaves behind, for comparing two documents.
pub fn snapshot(controller: &InvalidationController) -> (Vec<(TextRange, Style)>, Vec<Vec<rehighlight::Annotation>>) {
    let all = TextRange::new(0, controller.buffer().len());
    let annotations = [
        AnnotationKind::LanguageBlock,
        AnnotationKind::MultiLineElement,
        AnnotationKind::Comment,
    ]
    .iter()
    .map(|kind| controller.annotations().annotations(*kind).to_vec())
    .collect();
    (controller.buffer().style_runs(all), annotations)
}

/// Deterministic pseudo-random numbers for edit sequences.
pub struct Lcg(pub u64);

impl Lcg {
    pub fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound.max(1) as u64) as usize
    }
}
