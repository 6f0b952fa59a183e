use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading campaign tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record in {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// The file does not match the table's field count. The historical
    /// exports came in more than one arity; only the documented one is
    /// accepted.
    #[error("{table} line {line}: expected {expected} fields, got {got}")]
    Schema {
        table: String,
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("{table} line {line}: amount {value:?} is not a number")]
    BadAmount {
        table: String,
        line: usize,
        value: String,
    },
}
