//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments shared by commands that address one entry.
#[derive(Debug, Clone, Args)]
pub struct EntryRef {
    /// Abbreviation of the entry (case-insensitive)
    pub abbreviation: String,

    /// Which match to use when several entries share the abbreviation (1-based)
    #[arg(short, long)]
    pub index: Option<usize>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show this section (e.g. "A" or "#")
    #[arg(short, long)]
    pub section: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Favorites command arguments.
#[derive(Debug, Args)]
pub struct FavoritesCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in abbreviations and terms (empty lists everything)
    #[arg(default_value = "")]
    pub query: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// The entry to show
    #[command(flatten)]
    pub entry: EntryRef,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// The abbreviation
    pub abbreviation: String,

    /// What it stands for
    pub term: String,

    /// Optional note
    #[arg(short, long)]
    pub comment: Option<String>,

    /// Don't add the new entry to favorites
    #[arg(long)]
    pub no_favorite: bool,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// The entry to edit
    #[command(flatten)]
    pub entry: EntryRef,

    /// New term
    #[arg(short, long)]
    pub term: Option<String>,

    /// New comment (empty string removes it)
    #[arg(short, long)]
    pub comment: Option<String>,

    /// New abbreviation
    #[arg(long, value_name = "ABBREVIATION")]
    pub rename: Option<String>,
}

/// Ingest command arguments.
#[derive(Debug, Args)]
pub struct IngestCommand {
    /// Raw text dump to convert
    pub input: PathBuf,

    /// Where to write the CSV (defaults to the configured `csv_file`)
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Where to write the JSON (defaults to the configured `json_file`)
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
