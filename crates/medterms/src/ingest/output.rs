//! CSV and JSON renderings of an ingestion.

use std::path::Path;

use tracing::info;

use super::parser::Ingestion;
use crate::error::Result;
use crate::store::write_atomic;

/// Render every row as delimiter-separated values.
///
/// Headers produce one field, entries two. No header record is written and
/// fields are only quoted when they need to be.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn to_csv(ingestion: &Ingestion, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_writer(Vec::new());

    for row in &ingestion.rows {
        writer.write_record(row.fields())?;
    }

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()).into())
}

/// Render all sections as a pretty-printed JSON document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(ingestion: &Ingestion) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(&ingestion.sections)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write the CSV and JSON renderings to disk.
///
/// # Errors
///
/// Returns an error if rendering or writing either file fails.
pub fn write_outputs(
    ingestion: &Ingestion,
    csv_path: &Path,
    json_path: &Path,
    delimiter: u8,
) -> Result<()> {
    write_atomic(csv_path, &to_csv(ingestion, delimiter)?)?;
    write_atomic(json_path, &to_json(ingestion)?)?;

    info!(
        "Wrote {} rows to {} and {} entries to {}",
        ingestion.rows.len(),
        csv_path.display(),
        ingestion.entry_count(),
        json_path.display()
    );
    Ok(())
}
