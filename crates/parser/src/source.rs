use crate::error::{ParseError, Result};
use std::fs;
use std::path::Path;

/// Decode single-byte (ISO-8859-1) text. Every byte maps to the code point of
/// the same value, so decoding never fails.
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Read a model file as Latin-1 text
pub fn read_model_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(decode_latin1(&bytes))
}
