// Chunk: docs/chunks/code_buffer - Character-indexed code buffer with style runs

//! Performance sanity checks for the code buffer.
//!
//! These are not formal benchmarks. They guard against accidental quadratic
//! behavior in the line index and style runs, with bounds loose enough for
//! debug builds.

use rehighlight_buffer::{CharSource, CodeBuffer, Color, NamedColor, Style, TextRange};
use std::time::{Duration, Instant};

#[test]
fn type_20k_chars_under_1s() {
    let mut buffer = CodeBuffer::new();
    let start = Instant::now();

    for i in 0..20_000 {
        let end = buffer.len();
        let text = if i % 80 == 79 { "\n" } else { "x" };
        buffer.replace(TextRange::new(end, 0), text);
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_secs(1),
        "Typing 20K characters took {:?}, expected < 1s",
        elapsed
    );
    assert_eq!(buffer.len(), 20_000);
    assert_eq!(buffer.line_count(), 251);
}

#[test]
fn line_lookups_on_large_buffer_under_100ms() {
    let buffer = CodeBuffer::from_str(&"let value = compute(1, 2);\n".repeat(10_000));
    let start = Instant::now();

    let mut total = 0;
    for offset in (0..buffer.len()).step_by(97) {
        total += buffer.line_end_at(offset) - buffer.line_start_at(offset);
    }

    let elapsed = start.elapsed();
    assert!(total > 0);
    assert!(
        elapsed < Duration::from_millis(100),
        "Line lookups took {:?}, expected < 100ms",
        elapsed
    );
}

#[test]
fn styling_every_token_stays_fast() {
    let mut buffer = CodeBuffer::from_str(&"fn f() {}\n".repeat(2_000));
    let keyword = Style::fg(Color::Named(NamedColor::Magenta));
    let start = Instant::now();

    for line in 0..buffer.line_count() {
        if let Some(range) = buffer.line_range(line) {
            if range.length >= 2 {
                buffer.set_style(TextRange::new(range.location, 2), keyword);
            }
        }
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_secs(2),
        "Styling 2K lines took {:?}, expected < 2s",
        elapsed
    );
    assert_eq!(buffer.style_at(10), keyword);
    assert_eq!(buffer.style_at(12), Style::default());
}
