//! Stderr logging for the `medterms` binary.
//!
//! Stdout carries command results only, so every log line goes to stderr.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// How much the binary logs. Command results are printed regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only (`-q`).
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above (`-v`).
    Verbose,
    /// Everything (`-vv` or more).
    Trace,
}

impl Verbosity {
    /// Map the `--quiet` flag and the `-v` count to a verbosity.
    ///
    /// `--quiet` wins over any number of `-v`.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Most detailed level that gets logged.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directive(self) -> String {
        format!("medterms={}", self.level())
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides `verbosity`.
///
/// Later calls are no-ops.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
