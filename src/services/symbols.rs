use std::collections::HashMap;

use crate::constants::{DEFAULT_TICKER_SUFFIX, NSE_STOCKS};

/// Immutable mapping from short NSE codes to upstream tickers.
///
/// Built once at startup from the static table and shared by reference with
/// every handler. Declaration order is preserved for the trending, listing
/// and search endpoints.
pub struct SymbolTable {
    entries: &'static [(&'static str, &'static str)],
    by_code: HashMap<&'static str, &'static str>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::from_entries(NSE_STOCKS)
    }

    fn from_entries(entries: &'static [(&'static str, &'static str)]) -> Self {
        let by_code = entries.iter().copied().collect();
        SymbolTable { entries, by_code }
    }

    /// Resolve a raw symbol to an upstream ticker. Unknown symbols fall back
    /// to the uppercased input with the default exchange suffix appended.
    pub fn resolve(&self, raw: &str) -> String {
        let code = raw.trim().to_uppercase();
        match self.by_code.get(code.as_str()) {
            Some(ticker) => (*ticker).to_string(),
            None => format!("{}{}", code, DEFAULT_TICKER_SUFFIX),
        }
    }

    /// Iterate (code, ticker) pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    /// Symbol codes in declaration order.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(code, _)| *code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
