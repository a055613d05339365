//! Table extraction
//!
//! Locates each table's definitions and payload purely through the
//! [`MetadataIndex`], splits payload rows with the file's delimiter and types
//! every column. A malformed table is reported on its own and never affects
//! the other tables of the file.

use super::metadata::MetadataIndex;
use crate::constants::{
    DATA_DEFINITIONS_SECTION, DATA_SECTION, data_definitions_section, data_section,
};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::models::{Cell, Column, ColumnDefinition, ColumnKind, FileInfo, SectionInfo, Table};
use crate::units::{Unit, UnitRegistry, annotate_column};
use crate::{FmfError, Result};
use tracing::debug;

/// Parse a numeric field; empty fields are missing values
fn parse_number(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        Some(f64::NAN)
    } else {
        trimmed.parse::<f64>().ok()
    }
}

/// Extracts the tables of one file
#[derive(Debug)]
pub struct TableExtractor<'a> {
    lines: &'a [&'a str],
    index: &'a MetadataIndex,
    file_info: &'a FileInfo,
    registry: &'a UnitRegistry,
    annotate_units: bool,
}

impl<'a> TableExtractor<'a> {
    pub fn new(
        lines: &'a [&'a str],
        index: &'a MetadataIndex,
        file_info: &'a FileInfo,
        registry: &'a UnitRegistry,
    ) -> Self {
        Self {
            lines,
            index,
            file_info,
            registry,
            annotate_units: true,
        }
    }

    /// Leave numeric cells without a unit tag
    pub fn with_unit_annotation(mut self, annotate_units: bool) -> Self {
        self.annotate_units = annotate_units;
        self
    }

    /// Extract every table the file declares
    ///
    /// Single-table files yield `*data`; multi-table files yield one table per
    /// `*table definitions` entry, in that order. Failures are returned
    /// alongside the successful tables and recorded as diagnostics.
    pub fn extract_all(&self, diagnostics: &mut Diagnostics) -> (Vec<Table>, Vec<FmfError>) {
        let mut tables = Vec::new();
        let mut errors = Vec::new();

        let targets: Vec<(Option<&str>, Option<&str>)> = if self.index.is_multiple() {
            self.index
                .table_definitions()
                .into_iter()
                .map(|(title, symbol)| (Some(symbol), Some(title)))
                .collect()
        } else {
            vec![(None, None)]
        };

        for (symbol, title) in targets {
            match self.extract(symbol, title, diagnostics) {
                Ok(table) => tables.push(table),
                Err(e) => {
                    let section = symbol
                        .map(data_section)
                        .unwrap_or_else(|| DATA_SECTION.to_string());
                    diagnostics.push_for_section(
                        DiagnosticKind::TableParse,
                        section,
                        e.to_string(),
                    );
                    errors.push(e);
                }
            }
        }

        (tables, errors)
    }

    /// Extract one table; `None` selects the single `*data` table
    pub fn extract(
        &self,
        symbol: Option<&str>,
        title: Option<&str>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Table> {
        let definitions_name = symbol
            .map(data_definitions_section)
            .unwrap_or_else(|| DATA_DEFINITIONS_SECTION.to_string());
        let data_name = symbol
            .map(data_section)
            .unwrap_or_else(|| DATA_SECTION.to_string());
        let table_name = symbol.unwrap_or(DATA_SECTION);

        let definitions = self.index.section(&definitions_name).ok_or_else(|| {
            FmfError::table_parse(
                table_name,
                None,
                format!("missing section '[{}]'", definitions_name),
            )
        })?;
        let info = self.index.info(&data_name).ok_or_else(|| {
            FmfError::table_parse(table_name, None, format!("missing section '[{}]'", data_name))
        })?;

        let column_defs: Vec<ColumnDefinition> = definitions
            .iter()
            .map(|(label, spec)| ColumnDefinition::new(label.clone(), spec.clone()))
            .collect();

        let fields = self.split_payload(table_name, info, column_defs.len())?;
        debug!(
            "Table {}: {} rows of {} columns (lines {}..{})",
            table_name,
            fields.len(),
            column_defs.len(),
            info.payload_start(),
            info.end_line()
        );
        if fields.len() != info.expected_rows() {
            debug!(
                "Table {}: {} blank line(s) skipped in payload",
                table_name,
                info.expected_rows().saturating_sub(fields.len())
            );
        }

        let mut columns = Vec::with_capacity(column_defs.len());
        for (index, definition) in column_defs.into_iter().enumerate() {
            let unit = if self.annotate_units {
                annotate_column(&definition, self.registry, diagnostics, &definitions_name)
            } else {
                Unit::Dimensionless
            };
            let numeric = fields
                .iter()
                .all(|row| parse_number(row[index]).is_some());
            let kind = if numeric {
                ColumnKind::Numeric
            } else {
                ColumnKind::Text
            };
            columns.push(Column::new(definition, unit, kind));
        }

        let rows = fields
            .iter()
            .map(|row| {
                row.iter()
                    .zip(columns.iter())
                    .map(|(field, column)| self.cell(field, column))
                    .collect()
            })
            .collect();

        Ok(Table {
            symbol: symbol.map(str::to_string),
            title: title.map(str::to_string),
            columns,
            rows,
        })
    }

    /// Split the payload lines of a data section into rows of fields
    fn split_payload(
        &self,
        table_name: &str,
        info: &SectionInfo,
        width: usize,
    ) -> Result<Vec<Vec<&'a str>>> {
        let comment_char = self.file_info.comment_char;
        let end = info.end_line().min(self.lines.len());
        // Comment lines are already discounted; only blank lines can make this shrink
        let mut rows = Vec::with_capacity(info.expected_rows());

        for line_no in info.payload_start()..end {
            let line = self.lines[line_no];
            if line.starts_with(comment_char) || line.trim().is_empty() {
                continue;
            }

            let fields = self.file_info.delimiter.split(line);
            if fields.len() != width {
                return Err(FmfError::table_parse(
                    table_name,
                    Some(line_no + 1),
                    format!(
                        "line {} has {} fields, expected {}",
                        line_no + 1,
                        fields.len(),
                        width
                    ),
                ));
            }
            rows.push(fields);
        }

        Ok(rows)
    }

    fn cell(&self, field: &str, column: &Column) -> Cell {
        match column.kind {
            ColumnKind::Text => Cell::Text(field.to_string()),
            ColumnKind::Numeric => {
                let value = parse_number(field).unwrap_or(f64::NAN);
                if self.annotate_units {
                    Cell::quantity(value, column.unit.clone())
                } else {
                    Cell::Number(value)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number(" 2e3 "), Some(2000.0));
        assert!(parse_number("").unwrap().is_nan());
        assert!(parse_number("NAN").unwrap().is_nan());
        assert_eq!(parse_number("abc"), None);
    }
}
