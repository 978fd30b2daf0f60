use std::collections::HashSet;

use crate::constants::{MIN_SEARCH_QUERY_LEN, SEARCH_RESULT_LIMIT};
use crate::services::symbols::SymbolTable;

/// Rank symbol-table entries against a search query.
///
/// Three phases in strict priority order: exact symbol equality, then prefix
/// match, then substring match. Results are deduplicated by symbol across
/// phases and capped at [`SEARCH_RESULT_LIMIT`]. Queries shorter than
/// [`MIN_SEARCH_QUERY_LEN`] characters return nothing.
pub fn rank_symbols(
    table: &SymbolTable,
    query: &str,
) -> Vec<(&'static str, &'static str)> {
    let query = query.trim().to_uppercase();
    if query.len() < MIN_SEARCH_QUERY_LEN {
        return Vec::new();
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut matches = Vec::new();

    for (code, ticker) in table.iter() {
        if code == query && seen.insert(code) {
            matches.push((code, ticker));
        }
    }

    for (code, ticker) in table.iter() {
        if matches.len() >= SEARCH_RESULT_LIMIT {
            break;
        }
        if code.starts_with(&query) && seen.insert(code) {
            matches.push((code, ticker));
        }
    }

    for (code, ticker) in table.iter() {
        if matches.len() >= SEARCH_RESULT_LIMIT {
            break;
        }
        if code.contains(&query) && seen.insert(code) {
            matches.push((code, ticker));
        }
    }

    matches.truncate(SEARCH_RESULT_LIMIT);
    matches
}
