//! Favorites change notifications.
//!
//! The store owns a [`FavoritesSignal`] and fires it synchronously whenever
//! something may have changed the favorites view: an entry was created or
//! deleted, or a favorite flag was assigned. Observers are told what happened
//! but are expected to recompute [`Store::favorites`](crate::Store::favorites)
//! rather than apply a diff.

use crate::model::EntryId;

/// What caused a favorites notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesChange {
    /// A new entry was created.
    Created(EntryId),
    /// A custom entry was deleted.
    Deleted(EntryId),
    /// An entry's favorite flag was assigned.
    Assigned {
        /// The entry whose flag was assigned.
        id: EntryId,
        /// The new value.
        favorite: bool,
    },
}

impl FavoritesChange {
    /// The entry the change refers to.
    #[must_use]
    pub fn entry_id(&self) -> EntryId {
        match self {
            Self::Created(id) | Self::Deleted(id) | Self::Assigned { id, .. } => *id,
        }
    }
}

/// Receiver of favorites notifications.
pub trait FavoritesObserver {
    /// Called before the mutating store operation returns.
    fn favorites_changed(&self, change: &FavoritesChange);
}

impl<F> FavoritesObserver for F
where
    F: Fn(&FavoritesChange),
{
    fn favorites_changed(&self, change: &FavoritesChange) {
        self(change);
    }
}

/// Handle returned by [`FavoritesSignal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Synchronous publish/subscribe list.
#[derive(Default)]
pub struct FavoritesSignal {
    next_id: u64,
    observers: Vec<(SubscriptionId, Box<dyn FavoritesObserver>)>,
}

impl std::fmt::Debug for FavoritesSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesSignal")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl FavoritesSignal {
    /// Create a signal with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: Box<dyn FavoritesObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Check if nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notify every observer, in subscription order.
    pub fn notify(&self, change: &FavoritesChange) {
        tracing::trace!(?change, observers = self.observers.len(), "favorites changed");
        for (_, observer) in &self.observers {
            observer.favorites_changed(change);
        }
    }
}
