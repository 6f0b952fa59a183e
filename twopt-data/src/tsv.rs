//! Shared TSV reading for the campaign tables.

use std::fs::File;
use std::path::Path;

use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::error::DataError;

/// A raw table row plus its 1-based line number (for error reporting).
pub type RawRow = (usize, Vec<String>);

/// Reads a tab-separated file into raw rows.
///
/// Blank lines and lines starting with `#` are skipped. The reader sniffs a
/// UTF-8 BOM, which some exports carry.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = DecodeReaderBytesBuilder::new().build(file);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(decoded);

    let table = table_name(path);
    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|source| DataError::Csv {
            table: table.clone(),
            source,
        })?;
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        if is_blank(&fields) || fields[0].starts_with('#') {
            continue;
        }
        rows.push((i + 1, fields));
    }
    Ok(rows)
}

/// Enforces the table's field count on a row.
pub fn expect_arity(
    table: &str,
    line: usize,
    fields: &[String],
    expected: usize,
) -> Result<(), DataError> {
    if fields.len() < expected {
        return Err(DataError::Schema {
            table: table.to_string(),
            line,
            expected,
            got: fields.len(),
        });
    }
    Ok(())
}

pub fn table_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_blank(fields: &[String]) -> bool {
    fields.iter().all(|f| f.trim().is_empty())
}
