use crate::error::{EnrichError, Result};
use modeldoc_parser::decode_latin1;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Ordered, case-insensitive key → value table read from `key;value` records.
///
/// Keys are trimmed and lower-cased; values are kept verbatim. A repeated key
/// keeps its first position in the enumeration order and takes the later
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    skipped_rows: usize,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table file. UTF-8 is tried first, Latin-1 otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| EnrichError::MissingTable {
            path: path.to_path_buf(),
            source,
        })?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => decode_latin1(err.as_bytes()),
        };
        let table = Self::parse_str(&text, &path.display().to_string())?;
        log::info!(
            "Loaded {} entries from {} ({} rows skipped)",
            table.len(),
            path.display(),
            table.skipped_rows
        );
        Ok(table)
    }

    /// Parse `key;value` records. Rows without exactly two columns are
    /// skipped and counted.
    pub fn parse_str(text: &str, source_name: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut table = Self::new();
        for record in reader.records() {
            let record = record.map_err(|source| EnrichError::Csv {
                source_name: source_name.to_string(),
                source,
            })?;
            if record.len() != 2 {
                let line = record.position().map_or(0, csv::Position::line);
                log::warn!(
                    "{source_name}:{line}: expected 2 columns, found {}; row skipped",
                    record.len()
                );
                table.skipped_rows += 1;
                continue;
            }
            table.insert(&record[0], &record[1]);
        }
        Ok(table)
    }

    /// Insert or overwrite an entry
    pub fn insert(&mut self, key: &str, value: &str) {
        let key = key.trim().to_lowercase();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value.to_string(),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value.to_string()));
            }
        }
    }

    /// Rewrite every value in place, keeping keys and order
    pub fn map_values<F>(mut self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        for (_, value) in &mut self.entries {
            *value = f(value);
        }
        self
    }

    /// Case-insensitive lookup
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.trim().to_lowercase();
        self.index
            .get(&key)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// Entries in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows dropped because they did not have exactly two columns
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, value) in iter {
            table.insert(key.as_ref(), value.as_ref());
        }
        table
    }
}
