//! Reading and writing dataset documents.
//!
//! Writes go through a temporary file in the target directory that is synced
//! and then renamed over the destination, so readers see either the old file
//! or the complete new one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::Section;

/// Seed document compiled into the binary.
pub const BUNDLED_SEED: &str = include_str!("../../data/MedicalTerms.json");

/// Where the initial dataset comes from when no saved document exists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Seed {
    /// The document compiled into the binary.
    #[default]
    Bundled,
    /// A seed file on disk, e.g. fresh ingestion output.
    File(PathBuf),
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled => write!(f, "bundled seed"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Which document a store was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedFrom {
    /// The user's saved document.
    Document(PathBuf),
    /// The seed, because no saved document could be read.
    Seed(Seed),
}

/// Read the saved document at `path`, falling back to `seed`.
///
/// A missing or unreadable document is not an error; an unreadable seed or
/// any document that does not parse is.
pub(crate) fn read_sections(path: &Path, seed: &Seed) -> Result<(Vec<Section>, LoadedFrom)> {
    match fs::read(path) {
        Ok(bytes) => {
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            let sections = parse(&bytes, &path.display().to_string())?;
            return Ok((sections, LoadedFrom::Document(path.to_path_buf())));
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("No saved document at {}, using {}", path.display(), seed);
        }
        Err(err) => {
            warn!(
                "Could not read {} ({}), falling back to {}",
                path.display(),
                err,
                seed
            );
        }
    }

    let sections = match seed {
        Seed::Bundled => parse(BUNDLED_SEED.as_bytes(), "bundled seed")?,
        Seed::File(seed_path) => {
            let bytes = fs::read(seed_path).map_err(|source| Error::DocumentRead {
                path: seed_path.clone(),
                source,
            })?;
            parse(&bytes, &seed_path.display().to_string())?
        }
    };
    Ok((sections, LoadedFrom::Seed(seed.clone())))
}

fn parse(bytes: &[u8], origin: &str) -> Result<Vec<Section>> {
    serde_json::from_slice(bytes).map_err(|source| Error::DocumentParse {
        origin: origin.to_string(),
        source,
    })
}

/// Serialize sections to JSON bytes.
pub(crate) fn encode(sections: &[Section], pretty: bool) -> Result<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(sections)?
    } else {
        serde_json::to_vec(sections)?
    };
    Ok(bytes)
}

/// Atomically replace `path` with `contents`.
///
/// Parent directories are created as needed. An existing file keeps its
/// permissions.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written, synced, or renamed into place. The previous file is left intact.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_err = |source: std::io::Error| Error::DocumentWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(write_err)?;
    temp.write_all(contents).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    // Keep the mode of the file being replaced
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_err)?;
    }
    temp.persist(path).map_err(|err| write_err(err.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
