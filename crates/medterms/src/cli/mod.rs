//! Command-line interface for medterms.
//!
//! This module provides the CLI structure, entry lookup, and output
//! rendering for the `medterms` binary.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, EditCommand, EntryRef, FavoritesCommand, IngestCommand,
    ListCommand, OutputFormat, SearchCommand, ShowCommand, StatusCommand,
};

use crate::error::{Error, Result};
use crate::model::EntryId;
use crate::store::Store;

/// medterms - A pocket reference for medical abbreviations
///
/// Browse, search, favorite, and extend a list of medical abbreviations
/// stored as a JSON document.
#[derive(Debug, Parser)]
#[command(name = "medterms")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors; command results are still printed
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List favorites followed by every section
    List(ListCommand),

    /// List favorite entries
    Favorites(FavoritesCommand),

    /// Search abbreviations and terms
    Search(SearchCommand),

    /// Show a single entry
    Show(ShowCommand),

    /// Add a new entry
    Add(AddCommand),

    /// Change the term, comment, or abbreviation of an entry
    Edit(EditCommand),

    /// Toggle whether an entry is a favorite
    Favorite(EntryRef),

    /// Delete an entry you added
    Delete(EntryRef),

    /// Convert a raw text dump into seed JSON and CSV
    Ingest(IngestCommand),

    /// Show dataset status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

/// Resolve an abbreviation (and optional 1-based index) to one entry.
///
/// # Errors
///
/// Returns [`Error::NoMatch`] if nothing matches or the index is out of
/// range, and [`Error::Ambiguous`] if several entries match and no index was
/// given.
pub fn resolve(store: &Store, entry: &EntryRef) -> Result<EntryId> {
    let matches = store.find(&entry.abbreviation);
    let no_match = || Error::NoMatch {
        abbreviation: entry.abbreviation.clone(),
    };

    match (entry.index, matches.as_slice()) {
        (_, []) => Err(no_match()),
        (None, [only]) => Ok(only.id()),
        (None, many) => Err(Error::Ambiguous {
            abbreviation: entry.abbreviation.clone(),
            count: many.len(),
        }),
        (Some(index), many) => index
            .checked_sub(1)
            .and_then(|i| many.get(i))
            .map(|found| found.id())
            .ok_or_else(no_match),
    }
}
