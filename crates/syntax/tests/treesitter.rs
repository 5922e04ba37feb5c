// Chunk: docs/chunks/syntax_highlighting - Tree-sitter tokenizer integration tests

//! Integration tests for the tree-sitter tokenizer.
//!
//! These run the bundled grammars on small documents and check the
//! structural facts the invalidation engine depends on: comment spans,
//! multi-line tokens and embedded language regions, all in character
//! offsets.

use rehighlight_buffer::TextRange;
use rehighlight_syntax::{Tokenizer, TokenizeOutput, TreeSitterTokenizer};

fn tokenize(text: &str, language: &str) -> TokenizeOutput {
    TreeSitterTokenizer::new()
        .tokenize(text, language)
        .unwrap_or_else(|err| panic!("tokenizing {} failed: {}", language, err))
}

fn char_pos(text: &str, needle: &str) -> usize {
    let byte = text.find(needle).unwrap_or_else(|| panic!("'{}' not in text", needle));
    text[..byte].chars().count()
}

fn slice(text: &str, range: TextRange) -> String {
    text.chars().skip(range.location).take(range.length).collect()
}

// ==================== Comments ====================

#[test]
fn test_block_comment_spans_lines() {
    let text = "/* a\nb */\nfn f() {}\n";
    let output = tokenize(text, "rust");
    assert!(
        output.comment_spans.contains(&TextRange::new(0, 9)),
        "comment spans: {:?}",
        output.comment_spans
    );
}

#[test]
fn test_line_comment_excludes_newline() {
    let text = "fn f() {} // trailing\nfn g() {}\n";
    let output = tokenize(text, "rust");
    let comment = output
        .comment_spans
        .iter()
        .find(|r| r.location == char_pos(text, "//"))
        .expect("line comment should be reported");
    assert_eq!(slice(text, *comment), "// trailing");
}

// ==================== Multi-line tokens ====================

#[test]
fn test_multi_line_string_is_reported() {
    let text = "const S: &str = \"a\nb\";\n";
    let output = tokenize(text, "rust");
    let start = char_pos(text, "\"");
    let (range, class) = output
        .multi_line_spans
        .iter()
        .find(|(range, _)| range.location == start)
        .expect("string should be a multi-line span");
    assert_eq!(class, "string");
    assert_eq!(slice(text, *range), "\"a\nb\"");
}

#[test]
fn test_single_line_string_is_not_multi_line() {
    let output = tokenize("const S: &str = \"ab\";\n", "rust");
    assert!(output.multi_line_spans.is_empty(), "{:?}", output.multi_line_spans);
    assert!(!output.styled_spans.is_empty());
}

// ==================== Injections ====================

#[test]
fn test_html_style_element_is_css() {
    let text = "<p>hi</p>\n<style>\nbody { color: red; }\n</style>\n";
    let output = tokenize(text, "html");
    let (region, _) = output
        .sub_language_spans
        .iter()
        .find(|(_, lang)| lang == "css")
        .expect("style element should be reported as css");
    assert!(slice(text, *region).contains("color: red"));
    assert!(region.location >= char_pos(text, "<style>") + "<style>".len());

    let color = char_pos(text, "color");
    assert!(
        output
            .styled_spans
            .iter()
            .any(|(range, _)| range.contains(color) && region.contains_range(*range)),
        "css inside the region should be styled"
    );
}

#[test]
fn test_markdown_fence_injects_rust() {
    let text = "# Title\n\n```rust\nfn main() {}\n```\n";
    let output = tokenize(text, "markdown");
    let (region, _) = output
        .sub_language_spans
        .iter()
        .find(|(_, lang)| lang == "rust")
        .expect("fenced block should be reported as rust");
    assert!(slice(text, *region).contains("fn main"));
}

#[test]
fn test_injection_depth_zero_disables_embedding() {
    let mut tokenizer = TreeSitterTokenizer::new();
    tokenizer.set_max_injection_depth(0);
    let output = tokenizer
        .tokenize("<style>\nbody { color: red; }\n</style>\n", "html")
        .unwrap();
    assert!(output.sub_language_spans.is_empty());
}

#[test]
fn test_styled_spans_stay_inside_text() {
    let text = "<script>\nlet s = `a\nb`;\n</script>\n<style>p { margin: 0 }</style>\n";
    let len = text.chars().count();
    let output = tokenize(text, "html");
    for (range, _) in &output.styled_spans {
        assert!(range.end() <= len, "{} past end {}", range, len);
        assert!(!range.is_empty());
    }
    for window in output.styled_spans.windows(2) {
        assert!(window[0].0.location <= window[1].0.location, "spans should be sorted");
    }
}
