//! Export of extracted tables through polars
//!
//! Numeric columns become `f64` columns named `label [unit]`, text columns
//! become string columns named after their label. Units live only in the
//! column names, so exported files stay readable by any parquet or CSV tool.

use crate::models::{Cell, Table};
use crate::{FmfError, Result};
use polars::prelude::{
    Column as FrameColumn, CsvWriter, DataFrame, ParquetCompression, ParquetWriter, SerWriter,
};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Output format for exported tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Parquet,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Parquet => "parquet",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Column name carrying the unit, e.g. `length [m]`
fn frame_column_name(table: &Table, index: usize) -> String {
    let column = &table.columns[index];
    if column.unit.is_dimensionless() {
        column.label().to_string()
    } else {
        format!("{} [{}]", column.label(), column.unit)
    }
}

fn render_text(cell: Option<&Cell>) -> String {
    match cell {
        Some(Cell::Text(text)) => text.clone(),
        Some(Cell::Quantity { value, .. }) | Some(Cell::Number(value)) => value.to_string(),
        None => String::new(),
    }
}

/// Convert a table into a polars frame
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(table.width());

    for index in 0..table.width() {
        let name = frame_column_name(table, index);
        let cells: Vec<Option<&Cell>> = table.rows.iter().map(|row| row.get(index)).collect();

        let numeric: Option<Vec<f64>> = cells.iter().map(|c| c.and_then(Cell::as_f64)).collect();
        let column = match numeric {
            Some(values) => FrameColumn::new(name.into(), values),
            None => {
                let values: Vec<String> = cells.into_iter().map(render_text).collect();
                FrameColumn::new(name.into(), values)
            }
        };
        columns.push(column);
    }

    let df = DataFrame::new(columns)?;
    debug!(
        "Built frame for table {}: {} rows x {} columns",
        table.name(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Write a table as Snappy-compressed parquet
pub fn write_parquet(table: &Table, path: &Path) -> Result<()> {
    let mut df = table_to_dataframe(table)?;
    let file = File::create(path).map_err(|e| FmfError::file_access(path, e))?;

    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .finish(&mut df)
        .map_err(|e| FmfError::export(format!("Failed to write {}: {}", path.display(), e)))?;

    info!("Exported table {} to {}", table.name(), path.display());
    Ok(())
}

/// Write a table as CSV with a header row
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut df = table_to_dataframe(table)?;
    let mut file = File::create(path).map_err(|e| FmfError::file_access(path, e))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| FmfError::export(format!("Failed to write {}: {}", path.display(), e)))?;

    info!("Exported table {} to {}", table.name(), path.display());
    Ok(())
}

/// Write a table in the given format
pub fn export_table(table: &Table, path: &Path, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Parquet => write_parquet(table, path),
        ExportFormat::Csv => write_csv(table, path),
    }
}
