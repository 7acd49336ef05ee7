use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnrichError>;

/// Errors raised while loading a parameter or legend table
#[derive(Error, Debug)]
pub enum EnrichError {
    /// Table path given but the file cannot be read
    #[error("Cannot read table {path}: {source}")]
    MissingTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid record in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
}
