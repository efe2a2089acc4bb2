//! Substring search across the whole store.

use tracing::debug;

use super::Store;
use crate::model::Entry;

impl Store {
    /// Search abbreviations and terms, ignoring case.
    ///
    /// Results follow section order, then sorted order. An empty `term`
    /// matches every entry; callers that want "no search" for empty input
    /// should check for it first.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Entry> {
        let needle = term.to_lowercase();
        let results: Vec<_> = self.entries().filter(|entry| entry.matches(&needle)).collect();
        debug!("Search for '{}' matched {} entries", needle, results.len());
        results
    }
}
