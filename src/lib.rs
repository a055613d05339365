//! FMF Processor Library
//!
//! Reads and writes FMF, a line-oriented text format for scientific data: a
//! control comment, `[section]` blocks of `key: value` metadata and tabular
//! payloads whose columns carry physical units.
//!
//! This library provides tools for:
//! - Parsing the control line and indexing every section in a single pass
//! - Extracting single or multiple tables with unit-annotated columns
//! - Writing files back with configurable delimiters and number formats
//! - Consistency checks that report problems as structured diagnostics
//! - Exporting tables to Parquet or CSV through polars
//!
//! ```rust,no_run
//! use fmf_processor::{WriterConfig, read_fmf, write_fmf};
//!
//! # fn example() -> fmf_processor::Result<()> {
//! let document = read_fmf("measurement.fmf")?;
//! let metadata = document.metadata();
//! if let Some(tables) = document.into_tables() {
//!     write_fmf("measurement-copy", &metadata, &tables, &WriterConfig::default())?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod models;
pub mod reader;
pub mod units;
pub mod writer;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::{ReaderConfig, WriterConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{FmfError, Result};
pub use models::{
    Cell, Column, ColumnDefinition, ColumnKind, Delimiter, FileInfo, Metadata, Table, Tables,
};
pub use reader::{FmfDocument, FmfReader, read_fmf};
pub use units::{Unit, UnitRegistry};
pub use writer::{FmfWriter, NumberFormat, WriteReport, create_file, write_fmf};
