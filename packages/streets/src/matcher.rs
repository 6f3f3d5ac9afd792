//! Street name suggestions for partial queries.
//!
//! The query must occur inside the street name (case-insensitive). Every
//! known name participates: segment `street`, `street_behind`,
//! `street_ahead`, and intersection members.

use std::collections::BTreeSet;

use crate::store::StreetData;

/// Minimum trimmed query length, in characters.
pub const MIN_QUERY_LEN: usize = 2;

/// Returns `true` if `query` is long enough to search.
#[must_use]
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_LEN
}

/// Returns every distinct known street name containing `query`, sorted
/// ascending.
///
/// Queries shorter than [`MIN_QUERY_LEN`] characters after trimming
/// return nothing. The result is not truncated; display limits belong to
/// the caller.
#[must_use]
pub fn search_streets(data: &StreetData, query: &str) -> Vec<String> {
    if !is_searchable(query) {
        return Vec::new();
    }
    let needle = query.trim().to_lowercase();

    let matches: BTreeSet<&str> = data
        .street_names()
        .filter(|name| name.to_lowercase().contains(&needle))
        .collect();

    log::trace!("Street search '{needle}' matched {} names", matches.len());

    matches.into_iter().map(ToString::to_string).collect()
}
