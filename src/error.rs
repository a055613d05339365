//! Error handling for FMF reading and writing.
//!
//! Fatal errors abort a read or write outright. Table parse errors are
//! localized: the reader keeps them per table and carries on with the rest
//! of the file.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FmfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error on {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is empty, no control line to read: {path}")]
    EmptyFile { path: PathBuf },

    #[error(
        "Malformed control comment fragment '{fragment}': {reason}. \
         Presumably a key and its value are not separated by a colon"
    )]
    HeaderSyntax { fragment: String, reason: String },

    #[error("Failed to parse table {table}: {reason}")]
    TableParse {
        table: String,
        line: Option<usize>,
        reason: String,
    },

    #[error("Invalid delimiter {delimiter:?}: {reason}")]
    InvalidDelimiter { delimiter: String, reason: String },

    #[error("Invalid number format '{spec}': {reason}")]
    InvalidNumberFormat { spec: String, reason: String },

    #[error("Export failed: {message}")]
    Export { message: String },
}

impl FmfError {
    /// Create an I/O error bound to the file being accessed
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Create a control comment syntax error
    pub fn header_syntax(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::HeaderSyntax {
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }

    /// Create a table parse error, optionally pointing at a file line
    pub fn table_parse(
        table: impl Into<String>,
        line: Option<usize>,
        reason: impl Into<String>,
    ) -> Self {
        Self::TableParse {
            table: table.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Create an error for a delimiter the control line cannot carry
    pub fn invalid_delimiter(delimiter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDelimiter {
            delimiter: delimiter.into(),
            reason: reason.into(),
        }
    }

    /// Create a number format error
    pub fn invalid_number_format(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNumberFormat {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    /// Whether this error only affects a single table rather than the whole file
    pub fn is_localized(&self) -> bool {
        matches!(self, Self::TableParse { .. })
    }
}

impl From<polars::error::PolarsError> for FmfError {
    fn from(error: polars::error::PolarsError) -> Self {
        Self::Export {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FmfError>;
