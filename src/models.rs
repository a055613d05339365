//! Core data structures for FMF files.
//!
//! Defines file-level information derived from the control line, section
//! bookkeeping, column definitions and the unit-annotated tables exchanged
//! with callers.

use crate::constants::{
    CONTROL_MARKER, DATA_SECTION, DEFAULT_COMMENT_CHAR, DEFAULT_VERSION,
    WHITESPACE_WRITE_SEPARATOR, delimiter_aliases,
};
use crate::units::Unit;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Ordered key/value entries of one section
pub type SectionEntries = IndexMap<String, String>;

/// Ordered mapping of section name to its entries
pub type Metadata = IndexMap<String, SectionEntries>;

static UNIT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)\[(.*)\]").expect("unit suffix pattern is valid")
});

/// Field delimiter of tabular payloads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delimiter {
    #[default]
    Tab,
    /// Any run of whitespace when reading, a fixed run of spaces when writing
    Whitespace,
    Literal(String),
}

impl Delimiter {
    /// Resolve a control line delimiter value, expanding aliases
    pub fn from_control_value(value: &str) -> Self {
        match value {
            "\t" | delimiter_aliases::TAB_ESCAPED => Delimiter::Tab,
            delimiter_aliases::WHITESPACE => Delimiter::Whitespace,
            delimiter_aliases::SEMICOLON => Delimiter::Literal(";".to_string()),
            other => Delimiter::Literal(other.to_string()),
        }
    }

    /// Render as a control line value, using the same aliases the parser reads
    pub fn control_value(&self) -> String {
        match self {
            Delimiter::Tab => delimiter_aliases::TAB_ESCAPED.to_string(),
            Delimiter::Whitespace => delimiter_aliases::WHITESPACE.to_string(),
            Delimiter::Literal(s) if s == ";" => delimiter_aliases::SEMICOLON.to_string(),
            Delimiter::Literal(s) if s == "\t" => delimiter_aliases::TAB_ESCAPED.to_string(),
            Delimiter::Literal(s) => s.clone(),
        }
    }

    /// Why this delimiter cannot be written to a control line, if it cannot
    ///
    /// The value sits between `;`-separated fragments and the closing `-*-`,
    /// with surrounding spaces trimmed on read.
    pub fn control_line_problem(&self) -> Option<&'static str> {
        let Delimiter::Literal(s) = self else {
            return None;
        };
        if s == ";" || s == "\t" {
            None
        } else if s.is_empty() {
            Some("delimiter is empty")
        } else if s.chars().all(char::is_whitespace) {
            Some("whitespace-only delimiters do not survive the control line, use 'whitespace'")
        } else if s.contains(';') {
            Some("';' separates control line fragments, use 'semicolon' for a lone ';'")
        } else if s.contains(CONTROL_MARKER) {
            Some("delimiter contains the '-*-' control marker")
        } else if s.contains(['\n', '\r']) {
            Some("delimiter contains a line break")
        } else {
            None
        }
    }

    /// Split a payload line into fields
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Tab => line.split('\t').collect(),
            Delimiter::Whitespace => line.split_whitespace().collect(),
            Delimiter::Literal(s) => line.split(s.as_str()).collect(),
        }
    }

    /// Concrete separator written between cells
    pub fn write_separator(&self) -> &str {
        match self {
            Delimiter::Tab => "\t",
            Delimiter::Whitespace => WHITESPACE_WRITE_SEPARATOR,
            Delimiter::Literal(s) => s,
        }
    }
}

/// File-level information derived from the control line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub file_name: Option<String>,
    pub version: String,
    pub comment_char: char,
    pub delimiter: Delimiter,
    pub encoding: Option<String>,
    /// Whether the file declares `*table definitions`
    pub is_multiple: bool,
    /// Control line keys with no dedicated field
    pub extra: IndexMap<String, String>,
}

impl Default for FileInfo {
    fn default() -> Self {
        Self {
            file_name: None,
            version: DEFAULT_VERSION.to_string(),
            comment_char: DEFAULT_COMMENT_CHAR,
            delimiter: Delimiter::Tab,
            encoding: None,
            is_multiple: false,
            extra: IndexMap::new(),
        }
    }
}

/// Position and extent of one section within the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    pub name: String,
    /// Zero-based line index of the `[name]` header
    pub start_line: usize,
    /// Comment lines inside the section
    pub comment_count: usize,
    /// Lines from the header up to the next header or end of file
    pub length: usize,
}

impl SectionInfo {
    /// First line after the section header
    pub fn payload_start(&self) -> usize {
        self.start_line + 1
    }

    /// One past the last line of the section
    pub fn end_line(&self) -> usize {
        self.start_line + self.length
    }

    /// Rows expected in a payload section: length minus comments minus the header
    pub fn expected_rows(&self) -> usize {
        self.length
            .saturating_sub(self.comment_count)
            .saturating_sub(1)
    }
}

/// One entry of a `*data definitions` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Key of the definition entry
    pub label: String,
    /// Value of the definition entry, e.g. `l [m]`
    pub raw_spec: String,
}

impl ColumnDefinition {
    pub fn new(label: impl Into<String>, raw_spec: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            raw_spec: raw_spec.into(),
        }
    }

    /// Text between the brackets of the spec, if it carries any
    pub fn unit_text(&self) -> Option<&str> {
        UNIT_SUFFIX
            .captures(&self.raw_spec)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str())
    }

    /// Spec with the unit suffix removed
    pub fn symbol(&self) -> &str {
        UNIT_SUFFIX
            .captures(&self.raw_spec)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or_else(|| self.raw_spec.trim())
    }
}

/// How the values of a column were typed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// A column of a table: its definition plus the resolved unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub definition: ColumnDefinition,
    pub unit: Unit,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(definition: ColumnDefinition, unit: Unit, kind: ColumnKind) -> Self {
        Self {
            definition,
            unit,
            kind,
        }
    }

    pub fn label(&self) -> &str {
        &self.definition.label
    }
}

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Numeric value tagged with its column unit
    Quantity { value: f64, unit: Unit },
    /// Numeric value without a unit tag
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn quantity(value: f64, unit: Unit) -> Self {
        Cell::Quantity { value, unit }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Numeric magnitude, if the cell is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Quantity { value, .. } | Cell::Number(value) => Some(*value),
            Cell::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<&Unit> {
        match self {
            Cell::Quantity { unit, .. } => Some(unit),
            _ => None,
        }
    }
}

/// An extracted or caller-built table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Symbol linking the table to its sections in multi-table files
    pub symbol: Option<String>,
    /// Key of the table in `*table definitions`
    pub title: Option<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            symbol: None,
            title: None,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.label() == label)
    }

    /// Cells of one column, top to bottom
    pub fn column_cells(&self, label: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(label)?;
        Some(self.rows.iter().filter_map(|row| row.get(index)).collect())
    }

    /// Numeric magnitudes of one column; `None` if any cell is textual
    pub fn column_values(&self, label: &str) -> Option<Vec<f64>> {
        self.column_cells(label)?
            .into_iter()
            .map(Cell::as_f64)
            .collect()
    }

    /// Display name of the table: symbol, then title, then `*data`
    pub fn name(&self) -> &str {
        self.symbol
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(DATA_SECTION)
    }
}

/// Tables handed to the writer or returned to callers
#[derive(Debug, Clone, PartialEq)]
pub enum Tables {
    Single(Table),
    /// Tables keyed by symbol, in the collection's order
    Multiple(IndexMap<String, Table>),
}

impl Tables {
    pub fn len(&self) -> usize {
        match self {
            Tables::Single(_) => 1,
            Tables::Multiple(tables) => tables.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Table for a symbol; a single table answers to any symbol lookup of `None`
    pub fn get(&self, symbol: Option<&str>) -> Option<&Table> {
        match (self, symbol) {
            (Tables::Single(table), None) => Some(table),
            (Tables::Multiple(tables), Some(symbol)) => tables.get(symbol),
            _ => None,
        }
    }
}

impl From<Table> for Tables {
    fn from(table: Table) -> Self {
        Tables::Single(table)
    }
}

impl From<IndexMap<String, Table>> for Tables {
    fn from(tables: IndexMap<String, Table>) -> Self {
        Tables::Multiple(tables)
    }
}
