// Chunk: docs/chunks/boundary_hints - Per-language safe line heuristics

//! Per-language line heuristics for the boundary finder.
//!
//! A tokenizer can restart cleanly at some lines and not others. These
//! tables answer three questions about a single line, without its terminator:
//!
//! - can tokenization start at the beginning of this line? (`safe_start`)
//! - can tokenization stop after this line? (`safe_end`)
//! - does this line continue the previous one? (`continuation`)
//!
//! The rules are deliberately conservative: most only accept lines that
//! begin in column 0, which in practice means a top-level item. Being wrong
//! in the conservative direction only costs a larger re-highlight.

use once_cell::sync::Lazy;
use regex::Regex;

/// Line rules for one language family.
#[derive(Debug)]
pub struct BoundaryHints {
    family: &'static str,
    safe_start: Regex,
    safe_end: Regex,
    continuation: Option<Regex>,
}

impl BoundaryHints {
    fn new(family: &'static str, safe_start: &str, safe_end: &str, continuation: Option<&str>) -> Self {
        // Patterns are compile-time constants; a bad one is a programming error.
        Self {
            family,
            safe_start: Regex::new(safe_start).expect("valid safe_start pattern"),
            safe_end: Regex::new(safe_end).expect("valid safe_end pattern"),
            continuation: continuation.map(|p| Regex::new(p).expect("valid continuation pattern")),
        }
    }

    /// The family name, e.g. `"c-like"`.
    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn is_safe_start(&self, line: &str) -> bool {
        self.safe_start.is_match(line)
    }

    pub fn is_safe_end(&self, line: &str) -> bool {
        self.safe_end.is_match(line)
    }

    pub fn is_continuation(&self, line: &str) -> bool {
        self.continuation.as_ref().is_some_and(|re| re.is_match(line))
    }
}

static C_LIKE: Lazy<BoundaryHints> = Lazy::new(|| {
    BoundaryHints::new(
        "c-like",
        // Top-level item: identifier, preprocessor, attribute or decorator in column 0
        r"^[A-Za-z_$#@\[]",
        // A closing brace, or a column-0 statement ending in ; or }
        r"^(?:\}.*|[A-Za-z_$#@\[].*[;}\]]|#.*)\s*$",
        Some(r"^(?:\s|[.)\]}?:,+\-*/&|=<>]|else\b|catch\b|finally\b|where\b|while\b)"),
    )
});

static CSS: Lazy<BoundaryHints> = Lazy::new(|| {
    BoundaryHints::new(
        "css",
        r"^(?:[A-Za-z.#@:*\[>~+&]|\s*$)",
        r"^(?:\}|@[^{]*;)\s*$",
        Some(r"^\s*\{"),
    )
});

static PYTHON: Lazy<BoundaryHints> = Lazy::new(|| {
    BoundaryHints::new(
        "python",
        r"^[A-Za-z_@#]",
        // A column-0 line that does not open a block or continue onto the next
        r"^\S(?:.*[^:\\,(\[{\s])?\s*$",
        Some(r"^(?:\s|[)\]}]|else\b|elif\b|except\b|finally\b)"),
    )
});

static SHELL: Lazy<BoundaryHints> = Lazy::new(|| {
    BoundaryHints::new(
        "shell",
        r"^[A-Za-z_#.\[(!{]",
        r"^\S(?:.*[^\\|&\s])?\s*$",
        Some(r"^(?:\s|\||&&|then\b|else\b|elif\b|fi\b|do\b|done\b|esac\b|;;|\})"),
    )
});

static MARKDOWN: Lazy<BoundaryHints> = Lazy::new(|| {
    BoundaryHints::new(
        "markdown",
        r"^(?:\s*$|#{1,6}(?:\s|$))",
        r"^(?:\s*$|#{1,6}(?:\s.*)?$)",
        // Setext underline turns the previous line into a heading
        Some(r"^(?:=+|-+)\s*$"),
    )
});

static JSON: Lazy<BoundaryHints> = Lazy::new(|| {
    BoundaryHints::new("json", r"^[\[{]", r"^[\]}],?\s*$", Some(r"^\s*[,\]}]"))
});

static SQL: Lazy<BoundaryHints> = Lazy::new(|| {
    BoundaryHints::new(
        "sql",
        r"^[A-Za-z(]",
        r";\s*(?:--.*)?$",
        Some(r"^\s"),
    )
});

static MARKUP: Lazy<BoundaryHints> = Lazy::new(|| {
    BoundaryHints::new(
        "markup",
        r"^<[A-Za-z!?/]",
        r">\s*$",
        Some(r"^(?:\s|[^<\s])"),
    )
});

/// Returns the heuristics for a language identifier or one of its aliases.
///
/// Lookup is case-insensitive. Languages without a table return `None`; the
/// boundary finder then falls back to the paragraph range.
pub fn hints_for(language: &str) -> Option<&'static BoundaryHints> {
    let name = language.trim().to_ascii_lowercase();
    let hints: &'static BoundaryHints = match name.as_str() {
        "c" | "h" | "cpp" | "c++" | "cc" | "cxx" | "hpp" | "objectivec" | "objective-c" | "objc"
        | "java" | "javascript" | "js" | "jsx" | "mjs" | "typescript" | "ts" | "tsx" | "rust"
        | "rs" | "go" | "golang" | "swift" | "kotlin" | "kt" | "csharp" | "cs" | "c#" | "php" => {
            &C_LIKE
        }
        "css" | "scss" | "less" => &CSS,
        "python" | "py" => &PYTHON,
        "bash" | "sh" | "shell" | "zsh" => &SHELL,
        "markdown" | "md" => &MARKDOWN,
        "json" => &JSON,
        "sql" => &SQL,
        "html" | "htm" | "xml" | "xhtml" | "svg" => &MARKUP,
        _ => return None,
    };
    Some(hints)
}
