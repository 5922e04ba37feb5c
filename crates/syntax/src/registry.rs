// Chunk: docs/chunks/syntax_highlighting - Language registry for tree-sitter grammars
// Chunk: docs/chunks/highlight_injection - Language name lookup for injection support

//! Language registry mapping language names to tree-sitter configurations.
//!
//! Configurations are keyed by canonical language name ("rust", "cpp",
//! "markdown"). Aliases ("rs", "c++", "golang") and file extensions
//! resolve to a canonical name first, so the same identifiers used for
//! boundary heuristics and injected languages work here too.

use std::collections::HashMap;

use tree_sitter::Language;

/// A grammar and the queries the tokenizer runs against it.
#[derive(Clone)]
pub struct LanguageConfig {
    /// Canonical language name.
    pub name: &'static str,
    pub language: Language,
    pub highlights_query: &'static str,
    /// Empty when the grammar embeds no other languages.
    pub injections_query: &'static str,
}

impl LanguageConfig {
    pub fn new(
        name: &'static str,
        language: Language,
        highlights_query: &'static str,
        injections_query: &'static str,
    ) -> Self {
        Self {
            name,
            language,
            highlights_query,
            injections_query,
        }
    }
}

impl std::fmt::Debug for LanguageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageConfig")
            .field("name", &self.name)
            .field("highlights_query_len", &self.highlights_query.len())
            .field("injections_query_len", &self.injections_query.len())
            .finish()
    }
}

/// Resolves an identifier or alias to a canonical language name.
///
/// Lookup is case-insensitive and ignores surrounding whitespace. Unknown
/// names are returned lowercased, unchanged.
pub fn canonical_name(name: &str) -> String {
    let name = name.trim().to_lowercase();
    let canonical = match name.as_str() {
        "rs" => "rust",
        "py" => "python",
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "ts" | "mts" => "typescript",
        "sh" | "shell" | "zsh" => "bash",
        "c++" | "cc" | "cxx" | "hpp" | "hh" => "cpp",
        "h" => "c",
        "golang" => "go",
        "md" => "markdown",
        "htm" | "xhtml" => "html",
        other => return other.to_string(),
    };
    canonical.to_string()
}

/// Registry of the grammars compiled into this crate.
///
/// Supports 14 languages: Rust, C, C++, Python, TypeScript, TSX,
/// JavaScript, Go, JSON, TOML, Markdown, HTML, CSS and Bash.
pub struct LanguageRegistry {
    configs: HashMap<&'static str, LanguageConfig>,
    /// Extension (without leading dot) to canonical name.
    extensions: HashMap<&'static str, &'static str>,
}

impl LanguageRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self {
            configs: HashMap::new(),
            extensions: HashMap::new(),
        }
    }

    /// Creates a registry with every built-in grammar.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(
            LanguageConfig::new(
                "rust",
                tree_sitter_rust::LANGUAGE.into(),
                tree_sitter_rust::HIGHLIGHTS_QUERY,
                tree_sitter_rust::INJECTIONS_QUERY,
            ),
            &["rs"],
        );

        registry.register(
            LanguageConfig::new(
                "c",
                tree_sitter_c::LANGUAGE.into(),
                tree_sitter_c::HIGHLIGHT_QUERY,
                "",
            ),
            &["c", "h"],
        );

        // The C++ grammar's query only covers C++-specific constructs
        // (templates, namespaces, `this`); types, keywords and functions come
        // from the C query, so the two are layered.
        let cpp_combined_query: &'static str = Box::leak(
            format!("{}\n{}", tree_sitter_c::HIGHLIGHT_QUERY, tree_sitter_cpp::HIGHLIGHT_QUERY)
                .into_boxed_str(),
        );
        registry.register(
            LanguageConfig::new("cpp", tree_sitter_cpp::LANGUAGE.into(), cpp_combined_query, ""),
            &["cpp", "cc", "cxx", "hpp", "hh"],
        );

        registry.register(
            LanguageConfig::new(
                "python",
                tree_sitter_python::LANGUAGE.into(),
                tree_sitter_python::HIGHLIGHTS_QUERY,
                "",
            ),
            &["py", "pyi"],
        );

        // Chunk: docs/chunks/typescript_highlight_layering - Combined JS/TS highlight queries
        // TypeScript layers its own captures over the JavaScript query, as C++ does over C.
        let ts_combined_query: &'static str = Box::leak(
            format!(
                "{}\n{}",
                tree_sitter_javascript::HIGHLIGHT_QUERY,
                tree_sitter_typescript::HIGHLIGHTS_QUERY
            )
            .into_boxed_str(),
        );
        registry.register(
            LanguageConfig::new(
                "typescript",
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
                ts_combined_query,
                "",
            ),
            &["ts", "mts"],
        );
        registry.register(
            LanguageConfig::new(
                "tsx",
                tree_sitter_typescript::LANGUAGE_TSX.into(),
                ts_combined_query,
                "",
            ),
            &["tsx"],
        );

        registry.register(
            LanguageConfig::new(
                "javascript",
                tree_sitter_javascript::LANGUAGE.into(),
                tree_sitter_javascript::HIGHLIGHT_QUERY,
                tree_sitter_javascript::INJECTIONS_QUERY,
            ),
            &["js", "jsx", "mjs", "cjs"],
        );

        registry.register(
            LanguageConfig::new(
                "go",
                tree_sitter_go::LANGUAGE.into(),
                tree_sitter_go::HIGHLIGHTS_QUERY,
                "",
            ),
            &["go"],
        );

        registry.register(
            LanguageConfig::new(
                "json",
                tree_sitter_json::LANGUAGE.into(),
                tree_sitter_json::HIGHLIGHTS_QUERY,
                "",
            ),
            &["json"],
        );

        registry.register(
            LanguageConfig::new(
                "toml",
                tree_sitter_toml_ng::LANGUAGE.into(),
                tree_sitter_toml_ng::HIGHLIGHTS_QUERY,
                "",
            ),
            &["toml"],
        );

        // The block grammar; fenced code blocks arrive through its injection query.
        registry.register(
            LanguageConfig::new(
                "markdown",
                tree_sitter_md::LANGUAGE.into(),
                tree_sitter_md::HIGHLIGHT_QUERY_BLOCK,
                tree_sitter_md::INJECTION_QUERY_BLOCK,
            ),
            &["md", "markdown"],
        );

        registry.register(
            LanguageConfig::new(
                "html",
                tree_sitter_html::LANGUAGE.into(),
                tree_sitter_html::HIGHLIGHTS_QUERY,
                tree_sitter_html::INJECTIONS_QUERY,
            ),
            &["html", "htm"],
        );

        registry.register(
            LanguageConfig::new(
                "css",
                tree_sitter_css::LANGUAGE.into(),
                tree_sitter_css::HIGHLIGHTS_QUERY,
                "",
            ),
            &["css"],
        );

        registry.register(
            LanguageConfig::new(
                "bash",
                tree_sitter_bash::LANGUAGE.into(),
                tree_sitter_bash::HIGHLIGHT_QUERY,
                "",
            ),
            &["sh", "bash", "zsh"],
        );

        registry
    }

    /// Adds `config` and maps each of `extensions` to it.
    pub fn register(&mut self, config: LanguageConfig, extensions: &[&'static str]) {
        for ext in extensions {
            self.extensions.insert(*ext, config.name);
        }
        self.configs.insert(config.name, config);
    }

    /// Returns the configuration for a language name or alias.
    pub fn config_for_language_name(&self, name: &str) -> Option<&LanguageConfig> {
        self.configs.get(canonical_name(name).as_str())
    }

    /// Returns the configuration for a file extension, with or without the dot.
    pub fn config_for_extension(&self, ext: &str) -> Option<&LanguageConfig> {
        self.language_for_extension(ext)
            .and_then(|name| self.configs.get(name))
    }

    /// Returns the canonical language name for a file extension.
    pub fn language_for_extension(&self, ext: &str) -> Option<&'static str> {
        let ext = ext.strip_prefix('.').unwrap_or(ext).to_lowercase();
        self.extensions.get(ext.as_str()).copied()
    }

    /// Canonical names of every registered language, sorted.
    pub fn supported_languages(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.configs.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
