// Chunk: docs/chunks/highlight_config - TOML configuration and error taxonomy

//! Error types for highlighting and configuration.
//!
//! None of these ever block editing. Tokenizer failures surface to the host
//! as a failed cycle; configuration errors surface from `HighlightConfig`
//! loading only.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by a [`Tokenizer`](crate::Tokenizer).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("no grammar available for language `{0}`")]
    UnsupportedLanguage(String),

    #[error("failed to parse {language} source")]
    Parse { language: String },

    #[error("invalid {kind} query for {language}: {message}")]
    Query {
        language: String,
        kind: &'static str,
        message: String,
    },
}

/// Errors from loading a [`HighlightConfig`](crate::HighlightConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Errors that can occur during a highlight cycle.
///
/// Cycles report these through [`CycleOutcome`](crate::CycleOutcome) and the
/// host's `did_highlight` callback rather than returning them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HighlightError {
    /// A range reached the core outside the buffer. Recovered by clamping.
    #[error("range {location}+{length} is outside a buffer of {buffer_len} chars")]
    OutOfRangeInput {
        location: usize,
        length: usize,
        buffer_len: usize,
    },

    #[error("language `{0}` has no boundary heuristics")]
    UnsupportedLanguage(String),

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error("annotation at {location}+{length} is outside a buffer of {buffer_len} chars")]
    InvariantViolation {
        location: usize,
        length: usize,
        buffer_len: usize,
    },
}

pub type Result<T, E = HighlightError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_error_wraps_into_highlight_error() {
        let err: HighlightError = TokenizeError::UnsupportedLanguage("cobol".into()).into();
        assert_eq!(err.to_string(), "no grammar available for language `cobol`");
    }

    #[test]
    fn test_config_error_from_toml() {
        let parse_err = toml::from_str::<toml::Value>("x = ").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(err.to_string().starts_with("failed to parse config"));
    }
}
