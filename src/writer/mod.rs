//! FMF writer
//!
//! Serialises a control line, metadata sections and tables in that order.
//! Output goes to any [`Write`] sink; [`write_fmf`] covers the common case of
//! writing a complete file by name.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fmf_processor::config::WriterConfig;
//! use fmf_processor::reader::read_fmf;
//! use fmf_processor::writer::write_fmf;
//!
//! # fn example() -> fmf_processor::Result<()> {
//! let document = read_fmf("input.fmf")?;
//! let metadata = document.metadata();
//! if let Some(tables) = document.into_tables() {
//!     let report = write_fmf("copy", &metadata, &tables, &WriterConfig::default())?;
//!     println!("wrote {}", report.path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod checks;
pub mod number_format;

#[cfg(test)]
mod tests;

pub use checks::{check_sections, check_table_symbols};
pub use number_format::{FloatStyle, NumberFormat};

use crate::config::WriterConfig;
use crate::constants::{CONTROL_MARKER, DATA_SECTION, FMF_SUFFIX, control_keys, data_section};
use crate::diagnostics::Diagnostics;
use crate::models::{Cell, Metadata, Table, Tables};
use crate::{FmfError, Result};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output path for a requested name
///
/// `.fmf` is appended unless the name already contains it, compared
/// case-insensitively anywhere in the name.
pub fn resolve_file_name(name: &str) -> PathBuf {
    if name.to_lowercase().contains(FMF_SUFFIX) {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{}{}", name, FMF_SUFFIX))
    }
}

/// Create (or truncate) the output file for a requested name
pub fn create_file(name: &str) -> Result<(PathBuf, File)> {
    let path = resolve_file_name(name);
    let file = File::create(&path).map_err(|e| FmfError::file_access(&path, e))?;
    debug!("Created output file: {}", path.display());
    Ok((path, file))
}

/// Reject a configured delimiter the control line cannot carry
pub fn check_delimiter(config: &WriterConfig) -> Result<()> {
    match config.delimiter.as_ref() {
        Some(delimiter) => match delimiter.control_line_problem() {
            Some(reason) => Err(FmfError::invalid_delimiter(
                delimiter.write_separator(),
                reason,
            )),
            None => Ok(()),
        },
        None => Ok(()),
    }
}

/// Render the control line for a configuration, newline included
pub fn control_line(config: &WriterConfig) -> String {
    let mut line = format!(
        "{} {} {}: {}",
        config.comment_char,
        CONTROL_MARKER,
        control_keys::VERSION,
        config.version
    );
    if let Some(encoding) = &config.encoding {
        line.push_str(&format!("; {}: {}", control_keys::ENCODING, encoding));
    }
    if let Some(delimiter) = &config.delimiter {
        line.push_str(&format!(
            "; {}: {}",
            control_keys::DELIMITER,
            delimiter.control_value()
        ));
    }
    line.push_str(&format!(" {} \n", CONTROL_MARKER));
    line
}

/// Streaming FMF writer
///
/// Call [`append_header`](Self::append_header) first, then any number of
/// metadata and table appends, then [`finish`](Self::finish).
#[derive(Debug)]
pub struct FmfWriter<W: Write> {
    sink: W,
    config: WriterConfig,
    separator: String,
    diagnostics: Diagnostics,
}

impl FmfWriter<BufWriter<File>> {
    /// Writer for a new file, named by [`resolve_file_name`]
    pub fn create(name: &str, config: WriterConfig) -> Result<(PathBuf, Self)> {
        let (path, file) = create_file(name)?;
        Ok((path, Self::new(BufWriter::new(file), config)))
    }
}

impl<W: Write> FmfWriter<W> {
    pub fn new(sink: W, config: WriterConfig) -> Self {
        let separator = config.cell_delimiter().write_separator().to_string();
        Self {
            sink,
            config,
            separator,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Diagnostics recorded so far
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Write the control line
    ///
    /// Fails before writing anything when the delimiter cannot be read back
    /// from the control line.
    pub fn append_header(&mut self) -> Result<()> {
        check_delimiter(&self.config)?;
        let line = control_line(&self.config);
        self.sink.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Check and write metadata sections as `[name]` followed by `key: value` lines
    pub fn append_section(&mut self, metadata: &Metadata) -> Result<()> {
        check_sections(metadata, &mut self.diagnostics);

        for (name, entries) in metadata {
            writeln!(self.sink, "[{}]", name)?;
            for (key, value) in entries {
                writeln!(self.sink, "{}: {}", key, value)?;
            }
        }
        debug!("Wrote {} metadata sections", metadata.len());
        Ok(())
    }

    /// Write every table under its payload section header
    pub fn append_tables(&mut self, tables: &Tables) -> Result<()> {
        match tables {
            Tables::Single(table) => {
                writeln!(self.sink, "[{}]", DATA_SECTION)?;
                self.append_table(table)?;
            }
            Tables::Multiple(tables) => {
                for (symbol, table) in tables {
                    writeln!(self.sink, "[{}]", data_section(symbol))?;
                    self.append_table(table)?;
                }
            }
        }
        Ok(())
    }

    /// Write the rows of one table, without a section header
    pub fn append_table(&mut self, table: &Table) -> Result<()> {
        for row in &table.rows {
            let line = row
                .iter()
                .map(|cell| self.render_cell(cell))
                .collect::<Vec<_>>()
                .join(&self.separator);
            writeln!(self.sink, "{}", line)?;
        }
        debug!("Wrote table {} ({} rows)", table.name(), table.height());
        Ok(())
    }

    /// Compare `*table definitions` with the tables about to be written
    pub fn check_table_symbols(
        &mut self,
        tables: &IndexMap<String, Table>,
        metadata: &Metadata,
    ) -> bool {
        check_table_symbols(tables, metadata, &mut self.diagnostics)
    }

    fn render_cell(&self, cell: &Cell) -> String {
        match cell {
            Cell::Quantity { value, .. } | Cell::Number(value) => {
                self.config.number_format.format(*value)
            }
            Cell::Text(text) => text.clone(),
        }
    }

    /// Flush the sink and hand back it and the diagnostics
    pub fn finish(mut self) -> Result<(W, Diagnostics)> {
        self.sink.flush()?;
        Ok((self.sink, self.diagnostics))
    }
}

/// Outcome of [`write_fmf`]
#[derive(Debug, Clone)]
pub struct WriteReport {
    /// Path actually written, `.fmf` suffix included
    pub path: PathBuf,
    pub diagnostics: Diagnostics,
}

fn write_document<W: Write>(
    writer: &mut FmfWriter<W>,
    metadata: &Metadata,
    tables: &Tables,
) -> Result<()> {
    writer.append_header()?;
    writer.append_section(metadata)?;
    writer.append_tables(tables)?;
    if let Tables::Multiple(tables) = tables {
        writer.check_table_symbols(tables, metadata);
    }
    Ok(())
}

/// Write a complete file: control line, metadata, then tables
pub fn write_fmf(
    name: &str,
    metadata: &Metadata,
    tables: &Tables,
    config: &WriterConfig,
) -> Result<WriteReport> {
    check_delimiter(config)?;
    let (path, mut writer) = FmfWriter::create(name, config.clone())?;
    info!("Writing FMF file: {}", path.display());

    write_document(&mut writer, metadata, tables)?;
    let (_, diagnostics) = writer.finish()?;

    info!(
        "Wrote {} ({} table(s), {} diagnostics)",
        path.display(),
        tables.len(),
        diagnostics.len()
    );
    Ok(WriteReport { path, diagnostics })
}

/// Render a complete document in memory
pub fn write_to_string(
    metadata: &Metadata,
    tables: &Tables,
    config: &WriterConfig,
) -> Result<(String, Diagnostics)> {
    let mut writer = FmfWriter::new(Vec::new(), config.clone());
    write_document(&mut writer, metadata, tables)?;
    let (bytes, diagnostics) = writer.finish()?;
    let content = String::from_utf8(bytes)
        .map_err(|e| FmfError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    Ok((content, diagnostics))
}

/// Whether a path looks like an FMF file by its extension
pub fn has_fmf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("fmf"))
}
