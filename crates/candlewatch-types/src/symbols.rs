//! Tracked symbol list.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Ordered, de-duplicated list of trading symbols (e.g. `BTCUSDT`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolList {
    symbols: Vec<String>,
}

impl SymbolList {
    /// Builds a list, upper-casing entries and dropping blanks and repeats
    /// while keeping first-seen order.
    #[must_use]
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for symbol in symbols {
            let symbol = symbol.as_ref().trim().to_uppercase();
            if !symbol.is_empty() && !out.contains(&symbol) {
                out.push(symbol);
            }
        }
        Self { symbols: out }
    }

    /// Loads a JSON array of symbol strings from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON array of
    /// strings, or contains no symbols.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadSymbols {
            path: path.to_path_buf(),
            source: e,
        })?;

        let raw: Vec<String> =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseSymbols {
                path: path.to_path_buf(),
                source: e,
            })?;

        let list = Self::new(raw);
        if list.is_empty() {
            return Err(ConfigError::EmptySymbols(path.to_path_buf()));
        }
        Ok(list)
    }

    /// Returns the symbols as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.symbols
    }

    /// Returns an iterator over the symbols.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.symbols.iter()
    }

    /// Returns the number of symbols.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns true if `symbol` is tracked (case-insensitive).
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol))
    }
}

impl<'a> IntoIterator for &'a SymbolList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
