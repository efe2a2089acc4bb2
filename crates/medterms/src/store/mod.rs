//! The abbreviation store.
//!
//! [`Store`] owns every section and entry, keeps each section sorted, derives
//! the favorites and search views on demand, and persists the whole document
//! atomically.

mod persist;
mod search;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Entry, EntryId, Section, FALLBACK_SECTION};
use crate::signal::{FavoritesChange, FavoritesObserver, FavoritesSignal, SubscriptionId};

pub use persist::{write_atomic, LoadedFrom, Seed, BUNDLED_SEED};

/// In-memory abbreviation dataset backed by a JSON document.
///
/// Provides:
/// - Loading from the saved document, or the seed when none exists
/// - Sorted sections with routing of new entries by first letter
/// - Favorites and substring search views
/// - Protected deletion (only user-created entries can be removed)
/// - Atomic saving
#[derive(Debug)]
pub struct Store {
    /// Path of the saved document.
    path: PathBuf,
    /// Sections in document order.
    sections: Vec<Section>,
    /// Index of the `#` section.
    fallback: usize,
    /// Next identity to hand out.
    next_id: u64,
    /// Favorites observers.
    signal: FavoritesSignal,
    /// Whether anything changed since the last load or save.
    dirty: bool,
    /// Pretty-print on save.
    pretty: bool,
    /// Where the data came from.
    loaded_from: LoadedFrom,
}

/// Changes to apply to an existing entry. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    /// New abbreviation. The entry moves to the section for its new first letter.
    pub abbreviation: Option<String>,
    /// New term.
    pub term: Option<String>,
    /// New comment. An empty string clears it.
    pub comment: Option<String>,
}

impl EntryUpdate {
    /// Check if the update carries no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.abbreviation.is_none() && self.term.is_none() && self.comment.is_none()
    }
}

/// Counts describing the store contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    /// Number of sections.
    pub sections: usize,
    /// Total number of entries.
    pub entries: usize,
    /// Entries marked as favorite.
    pub favorites: usize,
    /// Entries created by the user.
    pub custom: usize,
}

impl Store {
    /// Load the store from the document at `path`, or from `seed` if the
    /// document can't be read.
    ///
    /// Entries are sorted after loading since the document order is not
    /// guaranteed to match.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed can't be read or if the chosen document
    /// doesn't parse.
    pub fn load(path: impl AsRef<Path>, seed: &Seed) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (sections, loaded_from) = persist::read_sections(&path, seed)?;
        let store = Self::from_sections(path, sections, loaded_from);

        let stats = store.stats();
        info!(
            "Loaded {} entries in {} sections from {}",
            stats.entries,
            stats.sections,
            match &store.loaded_from {
                LoadedFrom::Document(path) => path.display().to_string(),
                LoadedFrom::Seed(seed) => seed.to_string(),
            }
        );
        Ok(store)
    }

    /// Build a store from a JSON document held in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid section list.
    pub fn from_json(path: impl AsRef<Path>, json: &str) -> Result<Self> {
        let sections: Vec<Section> =
            serde_json::from_str(json).map_err(|source| Error::DocumentParse {
                origin: "inline document".to_string(),
                source,
            })?;
        let path = path.as_ref().to_path_buf();
        Ok(Self::from_sections(
            path.clone(),
            sections,
            LoadedFrom::Document(path),
        ))
    }

    fn from_sections(path: PathBuf, mut sections: Vec<Section>, loaded_from: LoadedFrom) -> Self {
        let fallback = if let Some(index) = sections
            .iter()
            .position(|section| section.name() == FALLBACK_SECTION)
        {
            index
        } else {
            warn!("Document has no '{FALLBACK_SECTION}' section, adding an empty one");
            sections.insert(0, Section::new(FALLBACK_SECTION));
            0
        };

        let mut next_id = 0;
        for section in &mut sections {
            for entry in &mut section.entries {
                entry.id = EntryId::new(next_id);
                next_id += 1;
            }
            section.sort();
        }

        Self {
            path,
            sections,
            fallback,
            next_id,
            signal: FavoritesSignal::new(),
            dirty: false,
            pretty: true,
            loaded_from,
        }
    }

    /// Choose between pretty and compact JSON on save.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Path of the saved document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the current data was loaded from.
    #[must_use]
    pub fn loaded_from(&self) -> &LoadedFrom {
        &self.loaded_from
    }

    /// Whether there are unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// All sections in document order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section by exact name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name() == name)
    }

    /// Iterate over every entry in section order, then sorted order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.sections.iter().flat_map(|section| section.entries.iter())
    }

    /// Look up an entry by identity.
    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries().find(|entry| entry.id == id)
    }

    /// Entries whose abbreviation equals `abbreviation`, ignoring case.
    #[must_use]
    pub fn find(&self, abbreviation: &str) -> Vec<&Entry> {
        let wanted = abbreviation.to_lowercase();
        self.entries()
            .filter(|entry| entry.sort_key() == wanted)
            .collect()
    }

    /// Favorited entries in section order, then sorted order.
    ///
    /// Recomputed on every call.
    #[must_use]
    pub fn favorites(&self) -> Vec<&Entry> {
        self.entries().filter(|entry| entry.is_favorite()).collect()
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Check if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(Section::is_empty)
    }

    /// Summary counts.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            sections: self.sections.len(),
            entries: self.len(),
            favorites: self.entries().filter(|entry| entry.is_favorite()).count(),
            custom: self.entries().filter(|entry| entry.is_custom()).count(),
        }
    }

    /// Register a favorites observer.
    pub fn subscribe(&mut self, observer: Box<dyn FavoritesObserver>) -> SubscriptionId {
        self.signal.subscribe(observer)
    }

    /// Remove a favorites observer. Returns `false` if it wasn't registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.signal.unsubscribe(id)
    }

    /// Create a user entry and file it under the section for its first letter.
    ///
    /// Abbreviations that don't start with a section letter, including the
    /// empty string, go to `#`. Observers are notified whatever `favorite` is.
    pub fn create_entry(
        &mut self,
        abbreviation: impl Into<String>,
        term: impl Into<String>,
        comment: Option<String>,
        favorite: Option<bool>,
    ) -> &Entry {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;

        let entry = Entry::custom(id, abbreviation.into(), term.into(), comment, favorite);
        let index = self.route(entry.abbreviation());
        debug!(
            "Filing '{}' under section {}",
            entry.abbreviation(),
            self.sections[index].name()
        );
        let position = self.sections[index].insert(entry);
        self.dirty = true;

        self.signal.notify(&FavoritesChange::Created(id));

        &self.sections[index].entries[position]
    }

    /// Index of the section a new abbreviation belongs to.
    fn route(&self, abbreviation: &str) -> usize {
        let Some(first) = abbreviation.chars().next() else {
            return self.fallback;
        };
        let letter: String = first.to_lowercase().collect();
        self.sections
            .iter()
            .position(|section| section.name().to_lowercase() == letter)
            .unwrap_or(self.fallback)
    }

    /// Delete a user-created entry.
    ///
    /// Every entry carrying `id` is removed and observers are notified.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] for an unknown id and
    /// [`Error::ProtectedEntry`] for seed entries. In both cases the store is
    /// unchanged and no notification is sent.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<Entry> {
        let entry = self.entry(id).ok_or(Error::EntryNotFound(id))?;
        if !entry.is_custom() {
            debug!("Refusing to delete seed entry '{}'", entry.abbreviation());
            return Err(Error::ProtectedEntry {
                abbreviation: entry.abbreviation.clone(),
            });
        }

        let removed = entry.clone();

        let mut count = 0;
        for section in &mut self.sections {
            let before = section.entries.len();
            section.entries.retain(|entry| entry.id != id);
            count += before - section.entries.len();
        }
        if count > 1 {
            warn!("Removed {} entries sharing id {}", count, id);
        }
        debug!("Deleted '{}'", removed.abbreviation());
        self.dirty = true;

        self.signal.notify(&FavoritesChange::Deleted(id));
        Ok(removed)
    }

    /// Assign the favorite flag. Observers are notified even if the value
    /// doesn't change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] for an unknown id.
    pub fn set_favorite(&mut self, id: EntryId, favorite: bool) -> Result<()> {
        let entry = self.entry_mut(id)?;
        if entry.favorite != Some(favorite) {
            entry.favorite = Some(favorite);
            self.dirty = true;
        }
        self.signal
            .notify(&FavoritesChange::Assigned { id, favorite });
        Ok(())
    }

    /// Flip the favorite flag and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] for an unknown id.
    pub fn toggle_favorite(&mut self, id: EntryId) -> Result<bool> {
        let favorite = !self.entry(id).ok_or(Error::EntryNotFound(id))?.is_favorite();
        self.set_favorite(id, favorite)?;
        Ok(favorite)
    }

    /// Edit abbreviation, term, or comment of an entry.
    ///
    /// A new abbreviation is routed like a created entry, so the entry may
    /// land in a different section. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] for an unknown id.
    pub fn update_entry(&mut self, id: EntryId, update: EntryUpdate) -> Result<bool> {
        let (section_index, entry_index) = self.locate(id)?;
        let entry = &mut self.sections[section_index].entries[entry_index];

        let mut changed = false;
        let mut renamed = false;
        if let Some(abbreviation) = update.abbreviation {
            if entry.abbreviation != abbreviation {
                entry.abbreviation = abbreviation;
                changed = true;
                renamed = true;
            }
        }
        if let Some(term) = update.term {
            if entry.term != term {
                entry.term = term;
                changed = true;
            }
        }
        if let Some(comment) = update.comment {
            let comment = Some(comment).filter(|c| !c.is_empty());
            if entry.comment != comment {
                entry.comment = comment;
                changed = true;
            }
        }

        if renamed {
            let entry = self.sections[section_index].entries.remove(entry_index);
            let target = self.route(&entry.abbreviation);
            if target != section_index {
                debug!(
                    "Moving {} from '{}' to '{}'",
                    entry.abbreviation,
                    self.sections[section_index].name(),
                    self.sections[target].name()
                );
            }
            self.sections[target].insert(entry);
        }
        if changed {
            self.dirty = true;
        }
        Ok(changed)
    }

    fn locate(&self, id: EntryId) -> Result<(usize, usize)> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section_index, section)| {
                section
                    .entries
                    .iter()
                    .position(|entry| entry.id == id)
                    .map(|entry_index| (section_index, entry_index))
            })
            .ok_or(Error::EntryNotFound(id))
    }

    fn entry_mut(&mut self, id: EntryId) -> Result<&mut Entry> {
        let (section_index, entry_index) = self.locate(id)?;
        Ok(&mut self.sections[section_index].entries[entry_index])
    }

    /// Serialize all sections and atomically overwrite the document.
    ///
    /// On failure the in-memory store is untouched and stays dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&mut self) -> Result<()> {
        let bytes = persist::encode(&self.sections, self.pretty)?;
        persist::write_atomic(&self.path, &bytes)?;
        self.dirty = false;
        info!("Saved {} entries to {}", self.len(), self.path.display());
        Ok(())
    }
}
