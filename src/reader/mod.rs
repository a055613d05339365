//! FMF reader
//!
//! Reads a whole file into memory and runs the read pipeline over its lines.
//!
//! ## Architecture
//!
//! - [`header`] - control line parsing (version, comment character, delimiter)
//! - [`scanner`] - single-pass line classification into sections
//! - [`metadata`] - the resulting [`MetadataIndex`] with per-section bookkeeping
//! - [`extractor`] - table payload extraction and column typing
//!
//! Units are attached by [`crate::units::annotate_column`] during extraction.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fmf_processor::reader::read_fmf;
//!
//! # fn example() -> fmf_processor::Result<()> {
//! let document = read_fmf("measurement.fmf")?;
//! for table in &document.tables {
//!     println!("{}: {} rows", table.name(), table.height());
//! }
//! for diagnostic in &document.diagnostics {
//!     println!("{}", diagnostic);
//! }
//! # Ok(())
//! # }
//! ```

pub mod extractor;
pub mod header;
pub mod metadata;
pub mod scanner;

#[cfg(test)]
mod tests;

pub use extractor::TableExtractor;
pub use header::{ControlLine, parse_control_line};
pub use metadata::MetadataIndex;
pub use scanner::{LineClass, SectionScanner, classify_line};

use crate::config::ReaderConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::models::{FileInfo, Metadata, Table, Tables};
use crate::units::UnitRegistry;
use crate::{FmfError, Result};
use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info};

/// Everything recovered from one file
#[derive(Debug)]
pub struct FmfDocument {
    pub file_info: FileInfo,
    pub index: MetadataIndex,
    /// Successfully extracted tables, in declaration order
    pub tables: Vec<Table>,
    /// Tables that failed to parse, one error each
    pub table_errors: Vec<FmfError>,
    pub diagnostics: Diagnostics,
}

impl FmfDocument {
    /// Key/value metadata without payload sections, ready to be written back
    pub fn metadata(&self) -> Metadata {
        self.index.metadata()
    }

    /// Table of a symbol in a multi-table file
    pub fn table(&self, symbol: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.symbol.as_deref() == Some(symbol))
    }

    /// The `*data` table of a single-table file
    pub fn single_table(&self) -> Option<&Table> {
        if self.file_info.is_multiple {
            None
        } else {
            self.tables.first()
        }
    }

    pub fn has_table_errors(&self) -> bool {
        !self.table_errors.is_empty()
    }

    /// Tables in the shape the writer accepts
    pub fn into_tables(self) -> Option<Tables> {
        if self.file_info.is_multiple {
            let tables: IndexMap<String, Table> = self
                .tables
                .into_iter()
                .filter_map(|t| t.symbol.clone().map(|symbol| (symbol, t)))
                .collect();
            Some(Tables::Multiple(tables))
        } else {
            self.tables.into_iter().next().map(Tables::Single)
        }
    }
}

/// Reader for FMF files
#[derive(Debug, Clone)]
pub struct FmfReader {
    config: ReaderConfig,
    registry: UnitRegistry,
}

impl Default for FmfReader {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}

impl FmfReader {
    pub fn new(config: ReaderConfig) -> Self {
        let registry = config.unit_registry();
        Self { config, registry }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read and parse a file
    pub fn read_path(&self, path: &Path) -> Result<FmfDocument> {
        info!("Reading FMF file: {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| FmfError::file_access(path, e))?;
        let content = decode(bytes);

        let file_name = path.to_string_lossy();
        let document = self.read_str(&content, Some(file_name.as_ref())).map_err(|e| match e {
            FmfError::EmptyFile { .. } => FmfError::EmptyFile {
                path: path.to_path_buf(),
            },
            other => other,
        })?;

        info!(
            "Read {} table(s) from {} ({} diagnostics)",
            document.tables.len(),
            path.display(),
            document.diagnostics.len()
        );
        Ok(document)
    }

    /// Parse file content already in memory
    pub fn read_str(&self, content: &str, file_name: Option<&str>) -> Result<FmfDocument> {
        let lines: Vec<&str> = content.lines().collect();
        let first = lines.first().ok_or_else(|| FmfError::EmptyFile {
            path: file_name.unwrap_or_default().into(),
        })?;

        let mut diagnostics = Diagnostics::new();
        let control = parse_control_line(first, &self.config.comment_markers)?;
        if control.missing_markers {
            diagnostics.push(
                DiagnosticKind::ControlComment,
                format!(
                    "first line starts with '{}' but has no '-*-' control markers, using defaults",
                    control.comment_char
                ),
            );
        }

        if control.empty_delimiter {
            diagnostics.push(
                DiagnosticKind::ControlComment,
                format!(
                    "empty delimiter in control line, using '{}'",
                    control.delimiter.control_value()
                ),
            );
        }

        let index = SectionScanner::new(control.comment_char).scan(&lines);
        let file_info = FileInfo {
            file_name: file_name.map(str::to_string),
            version: control.version,
            comment_char: control.comment_char,
            delimiter: control.delimiter,
            encoding: control.encoding,
            is_multiple: index.is_multiple(),
            extra: control.extra,
        };
        debug!(
            "File info: version={}, multiple={}, sections={}",
            file_info.version,
            file_info.is_multiple,
            index.sections().len()
        );

        let (tables, table_errors) =
            TableExtractor::new(&lines, &index, &file_info, &self.registry)
                .with_unit_annotation(self.config.annotate_units)
                .extract_all(&mut diagnostics);

        Ok(FmfDocument {
            file_info,
            index,
            tables,
            table_errors,
            diagnostics,
        })
    }
}

/// Decode file bytes as UTF-8, falling back to Latin-1
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            debug!("Content is not valid UTF-8, decoding as Latin-1");
            e.into_bytes().iter().map(|&b| b as char).collect()
        }
    }
}

/// Read a file with the default configuration
pub fn read_fmf(path: impl AsRef<Path>) -> Result<FmfDocument> {
    FmfReader::default().read_path(path.as_ref())
}
