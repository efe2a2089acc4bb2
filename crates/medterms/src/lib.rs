//! `medterms` - A pocket reference for medical abbreviations
//!
//! This library provides the abbreviation store (sorted sections, favorites,
//! search, protected deletion, atomic saving) and the converter that turns a
//! raw text dump into seed data.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod signal;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Entry, EntryId, Section};
pub use signal::{FavoritesChange, FavoritesObserver, SubscriptionId};
pub use store::{EntryUpdate, LoadedFrom, Seed, Store, StoreStats};
