// Chunk: docs/chunks/code_buffer - Character-indexed code buffer with style runs

//! Integration tests for realistic editing sequences.
//!
//! These tests verify that the gap buffer, line index and style runs stay in
//! sync through the edit patterns a highlighter sees: typing, deleting across
//! lines, pasting, and restyling between edits.

use rehighlight_buffer::{CharSource, CodeBuffer, Color, NamedColor, Style, TextRange};

fn comment_style() -> Style {
    Style {
        fg: Color::Named(NamedColor::BrightBlack),
        italic: true,
        ..Style::default()
    }
}

fn string_style() -> Style {
    Style::fg(Color::Named(NamedColor::Green))
}

/// Rebuilds line ranges from the content for comparison.
fn expected_lines(content: &str) -> Vec<TextRange> {
    let chars: Vec<char> = content.chars().collect();
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, ch) in chars.iter().enumerate() {
        if *ch == '\n' {
            lines.push(TextRange::from_bounds(start, i + 1));
            start = i + 1;
        }
    }
    lines.push(TextRange::from_bounds(start, chars.len()));
    lines
}

fn assert_lines_consistent(buf: &CodeBuffer) {
    let expected = expected_lines(&buf.content());
    assert_eq!(buf.line_count(), expected.len(), "line count for {:?}", buf.content());
    for (line, range) in expected.iter().enumerate() {
        assert_eq!(buf.line_range(line), Some(*range), "line {} of {:?}", line, buf.content());
    }
}

// ==================== Typing ====================

#[test]
fn test_type_program_char_by_char() {
    let mut buf = CodeBuffer::new();
    let program = "fn main() {\n    let x = 1;\n}\n";
    for ch in program.chars() {
        let end = buf.len();
        buf.replace(TextRange::new(end, 0), &ch.to_string());
    }
    assert_eq!(buf.content(), program);
    assert_eq!(buf.line_count(), 4);
    assert_lines_consistent(&buf);
}

#[test]
fn test_type_then_backspace_everything() {
    let mut buf = CodeBuffer::new();
    buf.replace(TextRange::new(0, 0), "hello\nworld");
    while !buf.is_empty() {
        let end = buf.len();
        buf.replace(TextRange::new(end - 1, 1), "");
    }
    assert_eq!(buf.line_count(), 1);
    assert_eq!(buf.style_runs(TextRange::new(0, 10)), vec![]);
}

// ==================== Multi-line Edits ====================

#[test]
fn test_delete_across_lines_then_reinsert() {
    let mut buf = CodeBuffer::from_str("one\ntwo\nthree\nfour");
    buf.replace(TextRange::new(2, 8), "");
    assert_eq!(buf.content(), "onree\nfour");
    assert_lines_consistent(&buf);

    buf.replace(TextRange::new(2, 0), "e\ntwo\nth");
    assert_eq!(buf.content(), "one\ntwo\nthree\nfour");
    assert_lines_consistent(&buf);
}

#[test]
fn test_paste_block_in_middle() {
    let mut buf = CodeBuffer::from_str("a\nz");
    buf.replace(TextRange::new(2, 0), "b\nc\nd\n");
    assert_eq!(buf.content(), "a\nb\nc\nd\nz");
    assert_eq!(buf.line_count(), 5);
    assert_eq!(buf.line_at_offset(8), 4);
    assert_lines_consistent(&buf);
}

#[test]
fn test_many_scattered_edits_keep_index_in_sync() {
    let mut buf = CodeBuffer::from_str(&"line\n".repeat(50));
    for i in 0..200usize {
        let len = buf.len();
        let at = (i * 37) % (len + 1);
        let removed = (i % 3).min(len - at);
        let text = if i % 4 == 0 { "\n" } else { "ab" };
        buf.replace(TextRange::new(at, removed), text);
    }
    assert_lines_consistent(&buf);
}

// ==================== Styles Across Edits ====================

#[test]
fn test_styles_shift_with_insertions() {
    let mut buf = CodeBuffer::from_str("x = \"hi\" // note");
    buf.set_style(TextRange::new(4, 4), string_style());
    buf.set_style(TextRange::new(9, 7), comment_style());

    buf.replace(TextRange::new(0, 0), "let ");
    assert_eq!(buf.style_at(8), string_style());
    assert_eq!(buf.style_at(11), string_style());
    assert_eq!(buf.style_at(12), Style::default());
    assert_eq!(buf.style_at(13), comment_style());
    assert_eq!(buf.text_in(TextRange::new(13, 7)), "// note");
}

#[test]
fn test_restyle_after_edit_coalesces_runs() {
    let mut buf = CodeBuffer::from_str("/* a */ b");
    buf.set_style(TextRange::new(0, 7), comment_style());
    buf.replace_inheriting_style(TextRange::new(4, 0), "bc");
    assert_eq!(
        buf.style_runs(TextRange::new(0, buf.len())),
        vec![
            (TextRange::new(0, 9), comment_style()),
            (TextRange::new(9, 2), Style::default()),
        ]
    );

    buf.clear_styles(TextRange::new(0, buf.len()));
    assert_eq!(
        buf.style_runs(TextRange::new(0, buf.len())),
        vec![(TextRange::new(0, 11), Style::default())]
    );
}
