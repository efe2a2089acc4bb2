//! Core data types for medterms.
//!
//! This module defines the abbreviation records and the alphabetic sections
//! that group them, together with their JSON representation.

use serde::{Deserialize, Serialize};

/// Name of the catch-all section for abbreviations that don't start with a letter.
pub const FALLBACK_SECTION: &str = "#";

/// Section names in document order.
pub const SECTION_NAMES: [&str; 27] = [
    "#", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q",
    "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
];

/// Process-local identity of an entry.
///
/// Assigned by the store when an entry is loaded or created. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntryId(u64);

impl EntryId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single abbreviation record.
///
/// Fields are only readable from outside the crate. Changes go through
/// [`Store`](crate::Store) so the sort order and favorites notifications
/// stay consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(skip)]
    pub(crate) id: EntryId,

    pub(crate) abbreviation: String,

    pub(crate) term: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) favorite: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) custom: Option<bool>,
}

impl Entry {
    /// Create a seed entry, as produced by ingestion.
    #[must_use]
    pub fn seeded(abbreviation: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            id: EntryId::default(),
            abbreviation: abbreviation.into(),
            term: term.into(),
            comment: None,
            favorite: None,
            custom: None,
        }
    }

    /// Create a user entry. `custom` is fixed to `true` here and never changes.
    pub(crate) fn custom(
        id: EntryId,
        abbreviation: String,
        term: String,
        comment: Option<String>,
        favorite: Option<bool>,
    ) -> Self {
        Self {
            id,
            abbreviation,
            term,
            comment,
            favorite,
            custom: Some(true),
        }
    }

    /// Identity assigned by the store.
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// The short form.
    #[must_use]
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// The expansion.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Free-form note, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Raw favorite flag as stored.
    #[must_use]
    pub fn favorite(&self) -> Option<bool> {
        self.favorite
    }

    /// Whether the entry is pinned to the favorites view.
    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.favorite == Some(true)
    }

    /// Whether the entry was created by the user (and may be deleted).
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.custom == Some(true)
    }

    /// Key that defines the order of entries within a section.
    #[must_use]
    pub fn sort_key(&self) -> String {
        self.abbreviation.to_lowercase()
    }

    /// Case-insensitive substring match on abbreviation or term.
    ///
    /// `needle` must already be lowercase. An empty needle matches everything.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.abbreviation.to_lowercase().contains(needle)
            || self.term.to_lowercase().contains(needle)
    }

    /// Same fields, ignoring identity.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.abbreviation == other.abbreviation
            && self.term == other.term
            && self.comment == other.comment
            && self.favorite == other.favorite
            && self.custom == other.custom
    }
}

/// A named bucket of entries, sorted by abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    name: String,
    #[serde(default)]
    pub(crate) entries: Vec<Entry>,
}

impl Section {
    /// Create an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// The section name (`#` or a capital letter).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in sorted order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the section has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append without sorting. Used while building seed documents, which keep
    /// input order until the store loads them.
    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Insert keeping the sort order and return the new entry's position.
    ///
    /// The entry goes after any entries with an equal key, matching what an
    /// append followed by a stable sort would do.
    pub(crate) fn insert(&mut self, entry: Entry) -> usize {
        let key = entry.sort_key();
        let position = self
            .entries
            .partition_point(|existing| existing.sort_key() <= key);
        self.entries.insert(position, entry);
        position
    }

    /// Sort entries by case-insensitive abbreviation. Stable.
    pub(crate) fn sort(&mut self) {
        self.entries.sort_by_cached_key(Entry::sort_key);
    }

    /// Whether entries are in sorted order.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].sort_key() <= pair[1].sort_key())
    }
}

/// The full set of empty sections in document order.
#[must_use]
pub fn empty_sections() -> Vec<Section> {
    SECTION_NAMES.iter().map(|name| Section::new(*name)).collect()
}
