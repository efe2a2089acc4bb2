//! Error types for medterms.
//!
//! This module defines all error types used throughout the medterms crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::EntryId;

/// The main error type for medterms operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Document Errors ===
    /// Failed to read a dataset document (the seed or a saved copy).
    #[error("failed to read document at {path}: {source}")]
    DocumentRead {
        /// Path to the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A dataset document did not match the expected shape.
    #[error("failed to parse document {origin}: {source}")]
    DocumentParse {
        /// Where the document came from (a path, or the bundled seed).
        origin: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write a document to disk.
    #[error("failed to write {path}: {source}")]
    DocumentWrite {
        /// Path that was being written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Entry Errors ===
    /// No entry carries the given identity.
    #[error("no entry with id {0}")]
    EntryNotFound(EntryId),

    /// The entry came from the seed and cannot be deleted.
    #[error("entry '{abbreviation}' is part of the seed dataset and cannot be deleted")]
    ProtectedEntry {
        /// Abbreviation of the protected entry.
        abbreviation: String,
    },

    /// No entry has the requested abbreviation.
    #[error("no entry with abbreviation '{abbreviation}'")]
    NoMatch {
        /// The abbreviation that was looked up.
        abbreviation: String,
    },

    /// Several entries share the requested abbreviation.
    #[error("{count} entries match '{abbreviation}'; pick one with --index")]
    Ambiguous {
        /// The abbreviation that was looked up.
        abbreviation: String,
        /// How many entries matched.
        count: usize,
    },

    /// Caller supplied an unusable value.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the problem.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV output failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A specialized Result type for medterms operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a config validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error is a rejected delete of a seed entry.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::ProtectedEntry { .. })
    }

    /// Check if this error means the addressed entry does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EntryNotFound(_) | Self::NoMatch { .. })
    }
}
