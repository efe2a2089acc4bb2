//! Text rendering for command output.

use std::fmt::Write as _;

use serde_json::json;
use tabled::{settings::Style, Table, Tabled};

use super::OutputFormat;
use crate::error::Result;
use crate::model::{Entry, Section};

const FAVORITE_MARK: &str = "*";

/// Render an entry as `ABBR: term (comment)`.
#[must_use]
pub fn entry_text(entry: &Entry) -> String {
    let mut text = format!("{}: {}", entry.abbreviation(), entry.term());
    if let Some(comment) = entry.comment() {
        let _ = write!(text, " ({comment})");
    }
    text
}

/// Render one entry as a list line, marking favorites with `*`.
#[must_use]
pub fn entry_line(entry: &Entry) -> String {
    let mark = if entry.is_favorite() { FAVORITE_MARK } else { " " };
    format!("{mark} {}", entry_text(entry))
}

/// Render a flat list of entries.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn entries(entries: &[&Entry], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(entries
            .iter()
            .map(|entry| entry_line(entry) + "\n")
            .collect()),
        OutputFormat::Table => Ok(table(entries)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)? + "\n"),
    }
}

/// Render the favorites block followed by each section.
///
/// Empty sections are skipped in text output and kept in JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn listing(favorites: &[&Entry], sections: &[&Section], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let value = json!({
            "favorites": favorites,
            "sections": sections,
        });
        return Ok(serde_json::to_string_pretty(&value)? + "\n");
    }

    let mut out = String::new();
    if !favorites.is_empty() {
        out.push_str("Favorites\n");
        out.push_str(&entries(favorites, format)?);
    }
    for section in sections.iter().filter(|section| !section.is_empty()) {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", section.name());
        let rows: Vec<&Entry> = section.entries().iter().collect();
        out.push_str(&entries(&rows, format)?);
    }
    Ok(out)
}

/// Render every field of one entry.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn detail(entry: &Entry, section: &str, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(entry)? + "\n");
    }

    let mut out = String::new();
    let _ = writeln!(out, "Abbreviation: {}", entry.abbreviation());
    let _ = writeln!(out, "Term:         {}", entry.term());
    let _ = writeln!(out, "Comment:      {}", entry.comment().unwrap_or("-"));
    let _ = writeln!(out, "Section:      {section}");
    let _ = writeln!(out, "Favorite:     {}", yes_no(entry.is_favorite()));
    let _ = writeln!(out, "Added by you: {}", yes_no(entry.is_custom()));
    Ok(out)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Fav")]
    favorite: &'static str,
    #[tabled(rename = "Abbreviation")]
    abbreviation: String,
    #[tabled(rename = "Term")]
    term: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&Entry> for EntryRow {
    fn from(entry: &Entry) -> Self {
        Self {
            favorite: if entry.is_favorite() { FAVORITE_MARK } else { "" },
            abbreviation: entry.abbreviation().to_string(),
            term: entry.term().to_string(),
            comment: entry.comment().unwrap_or("").to_string(),
        }
    }
}

fn table(entries: &[&Entry]) -> String {
    let rows: Vec<EntryRow> = entries.iter().map(|entry| EntryRow::from(*entry)).collect();
    Table::new(rows).with(Style::rounded()).to_string() + "\n"
}
