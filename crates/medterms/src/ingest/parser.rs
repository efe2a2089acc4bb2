//! Line parser for raw abbreviation dumps.

use tracing::{debug, trace};

use crate::model::{empty_sections, Entry, Section, FALLBACK_SECTION, SECTION_NAMES};

/// Separator used throughout the source dump: no-break space, colon, space.
pub const PRIMARY_SEPARATOR: &str = "\u{00A0}: ";

/// Separator used by lines that lack the no-break space.
pub const FALLBACK_SEPARATOR: &str = ": ";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// A line without a separator, kept verbatim; selects the current section.
    Header(String),
    /// An abbreviation and its term.
    Entry {
        /// Text before the first separator.
        abbreviation: String,
        /// Everything after the first separator.
        term: String,
    },
}

impl Row {
    /// Fields as they appear in the CSV output.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::Header(name) => vec![name.as_str()],
            Self::Entry { abbreviation, term } => vec![abbreviation.as_str(), term.as_str()],
        }
    }
}

/// Split a line into a header or an entry.
///
/// The no-break-space separator is tried first, then the plain one. Only the
/// first occurrence splits; later occurrences stay in the term.
#[must_use]
pub fn parse_line(line: &str) -> Row {
    let split = line
        .split_once(PRIMARY_SEPARATOR)
        .or_else(|| line.split_once(FALLBACK_SEPARATOR));

    match split {
        Some((abbreviation, term)) => Row::Entry {
            abbreviation: abbreviation.to_string(),
            term: term.to_string(),
        },
        None => Row::Header(line.to_string()),
    }
}

/// Resolve a header to a section name. Surrounding whitespace is ignored and
/// unknown or blank headers map to `#`.
#[must_use]
pub fn section_for_header(header: &str) -> &'static str {
    let header = header.trim();
    SECTION_NAMES
        .iter()
        .find(|name| **name == header)
        .copied()
        .unwrap_or(FALLBACK_SECTION)
}

/// Result of parsing a whole dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingestion {
    /// Every parsed row in input order.
    pub rows: Vec<Row>,
    /// All sections in fixed order, entries in input order.
    pub sections: Vec<Section>,
}

impl Ingestion {
    /// Number of entry rows.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Number of header rows.
    #[must_use]
    pub fn header_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, Row::Header(_)))
            .count()
    }
}

/// Parse a raw dump.
///
/// Entry rows are appended to the most recently selected section, which is
/// `#` until the first header. A blank line is a header too: it selects `#`
/// and is kept as an empty row.
#[must_use]
pub fn parse(input: &str) -> Ingestion {
    let mut sections = empty_sections();
    let mut rows = Vec::new();
    let mut current = 0;

    for line in input.lines() {
        let row = parse_line(line);
        match &row {
            Row::Header(header) => {
                let name = section_for_header(header);
                if name == FALLBACK_SECTION && header.trim() != FALLBACK_SECTION {
                    debug!("Unrecognized header '{}', using '{}'", header, name);
                }
                current = sections
                    .iter()
                    .position(|section| section.name() == name)
                    .unwrap_or(0);
            }
            Row::Entry { abbreviation, term } => {
                trace!("{} -> {}", abbreviation, sections[current].name());
                sections[current].push(Entry::seeded(abbreviation.as_str(), term.as_str()));
            }
        }
        rows.push(row);
    }

    Ingestion { rows, sections }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(abbreviation: &str, term: &str) -> Row {
        Row::Entry {
            abbreviation: abbreviation.to_string(),
            term: term.to_string(),
        }
    }

    #[test]
    fn test_parse_line_primary_separator() {
        assert_eq!(parse_line("ABC\u{00A0}: some term"), entry("ABC", "some term"));
    }

    #[test]
    fn test_parse_line_fallback_separator() {
        assert_eq!(parse_line("ABC: some term"), entry("ABC", "some term"));
    }

    #[test]
    fn test_parse_line_repeated_separator_stays_in_term() {
        assert_eq!(
            parse_line("Ref\u{00A0}: see\u{00A0}: elsewhere"),
            entry("Ref", "see\u{00A0}: elsewhere")
        );
        assert_eq!(
            parse_line("Note: ratio: 2: 1"),
            entry("Note", "ratio: 2: 1")
        );
    }

    #[test]
    fn test_parse_line_primary_wins_over_fallback() {
        assert_eq!(
            parse_line("A: B\u{00A0}: C"),
            entry("A: B", "C")
        );
    }

    #[test]
    fn test_parse_line_header() {
        assert_eq!(parse_line("B"), Row::Header("B".to_string()));
        assert_eq!(parse_line("  C \t"), Row::Header("  C \t".to_string()));
        assert_eq!(parse_line(""), Row::Header(String::new()));
    }

    #[test]
    fn test_section_for_header() {
        assert_eq!(section_for_header("B"), "B");
        assert_eq!(section_for_header("#"), "#");
        assert_eq!(section_for_header("ZZ"), "#");
        assert_eq!(section_for_header("b"), "#");
        assert_eq!(section_for_header("  C \t"), "C");
        assert_eq!(section_for_header(""), "#");
        assert_eq!(section_for_header("   "), "#");
    }

    #[test]
    fn test_parse_routes_entries_to_current_section() {
        let input = "A\nACE\u{00A0}: angiotensin-converting enzyme\nB\nBP: blood pressure\nBMI\u{00A0}: body mass index\n";
        let ingestion = parse(input);

        assert_eq!(ingestion.rows.len(), 5);
        assert_eq!(ingestion.header_count(), 2);
        assert_eq!(ingestion.entry_count(), 3);

        let b = &ingestion.sections[2];
        assert_eq!(b.name(), "B");
        let abbreviations: Vec<_> = b.entries().iter().map(Entry::abbreviation).collect();
        assert_eq!(abbreviations, vec!["BP", "BMI"]);
    }

    #[test]
    fn test_parse_unknown_header_selects_fallback() {
        let ingestion = parse("C\nZZ\nXYZ: something\n");

        assert_eq!(ingestion.sections[0].len(), 1);
        assert_eq!(ingestion.sections[0].entries()[0].abbreviation(), "XYZ");
        assert!(ingestion.sections[3].is_empty());
    }

    #[test]
    fn test_parse_entries_before_any_header_go_to_fallback() {
        let ingestion = parse("5-FU: fluorouracil\n");
        assert_eq!(ingestion.sections[0].entries()[0].term(), "fluorouracil");
    }

    #[test]
    fn test_parse_keeps_all_sections_and_input_order() {
        let ingestion = parse("D\nDVT: deep vein thrombosis\nDM: diabetes mellitus\n");

        assert_eq!(ingestion.sections.len(), 27);
        assert!(!ingestion.sections[4].is_sorted());
        assert_eq!(ingestion.sections[4].entries()[0].abbreviation(), "DVT");
    }

    #[test]
    fn test_parse_blank_line_selects_fallback() {
        let ingestion = parse("A\nACE: x\n\nABG: y\n");

        assert_eq!(ingestion.rows.len(), 4);
        assert_eq!(ingestion.rows[2], Row::Header(String::new()));
        assert_eq!(ingestion.header_count(), 2);

        let names = |section: &Section| -> Vec<String> {
            section
                .entries()
                .iter()
                .map(|entry| entry.abbreviation().to_string())
                .collect()
        };
        assert_eq!(names(&ingestion.sections[1]), vec!["ACE"]);
        assert_eq!(names(&ingestion.sections[0]), vec!["ABG"]);
    }

    #[test]
    fn test_parse_crlf_and_whitespace_lines() {
        let ingestion = parse("E\r\nECG: electrocardiogram\r\n   \r\nEEG: electroencephalogram");

        assert_eq!(ingestion.rows.len(), 4);
        assert_eq!(ingestion.rows[0], Row::Header("E".to_string()));
        assert_eq!(ingestion.rows[2], Row::Header("   ".to_string()));
        assert_eq!(ingestion.sections[5].len(), 1);
        assert_eq!(ingestion.sections[5].entries()[0].term(), "electrocardiogram");
        assert_eq!(ingestion.sections[0].entries()[0].abbreviation(), "EEG");
    }

    #[test]
    fn test_parse_padded_header_selects_section() {
        let ingestion = parse("  D \nDM: diabetes mellitus\n");

        assert_eq!(ingestion.rows[0], Row::Header("  D ".to_string()));
        assert_eq!(ingestion.sections[4].len(), 1);
        assert!(ingestion.sections[0].is_empty());
    }

    #[test]
    fn test_row_fields() {
        assert_eq!(Row::Header("A".to_string()).fields(), vec!["A"]);
        assert_eq!(entry("BP", "blood pressure").fields(), vec!["BP", "blood pressure"]);
    }
}
