use std::path::PathBuf;
use thiserror::Error;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while reading and parsing a model file
#[derive(Error, Debug)]
pub enum ParseError {
    /// No `ADDEQ ... ;` block was recognized anywhere in the input
    #[error("No equation found in {source_name}")]
    GrammarMismatch { source_name: String },

    /// The model file could not be read
    #[error("Cannot read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Create a grammar mismatch error for the named input
    pub fn grammar_mismatch(source_name: impl Into<String>) -> Self {
        Self::GrammarMismatch {
            source_name: source_name.into(),
        }
    }
}
