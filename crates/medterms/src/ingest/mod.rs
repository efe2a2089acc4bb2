//! Offline conversion of a raw abbreviation dump into seed data.
//!
//! The dump has one record per line:
//!
//! - `ABBR\u{00A0}: term` or `ABBR: term` lines become entries.
//! - Any other line is a section header (`#`, `A`..`Z`). Headers are
//!   matched after trimming; unknown and blank headers select `#`.
//!
//! CSV rows mirror the input line for line, header text included as written.
//!
//! The result is a semicolon-delimited CSV for spreadsheets and a JSON
//! document in the store's format. Entries keep input order; the store
//! sorts them when it loads the document.
//!
//! # Example
//!
//! ```
//! use medterms::ingest;
//!
//! let ingestion = ingest::parse("B\nBP\u{00A0}: blood pressure\n");
//! assert_eq!(ingestion.entry_count(), 1);
//!
//! let csv = ingest::to_csv(&ingestion, b';').unwrap();
//! assert_eq!(csv, b"B\nBP;blood pressure\n");
//! ```

mod output;
mod parser;

pub use output::{to_csv, to_json, write_outputs};
pub use parser::{
    parse, parse_line, section_for_header, Ingestion, Row, FALLBACK_SEPARATOR,
    PRIMARY_SEPARATOR,
};
