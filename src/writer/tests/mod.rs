//! Test fixtures shared by the writer test modules

use crate::models::{Cell, Column, ColumnDefinition, ColumnKind, Metadata, SectionEntries, Table};
use crate::units::Unit;

mod header_tests;

/// Build metadata from `(section, [(key, value)])` pairs
pub fn metadata(sections: &[(&str, &[(&str, &str)])]) -> Metadata {
    sections
        .iter()
        .map(|(name, entries)| {
            let entries: SectionEntries = entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            (name.to_string(), entries)
        })
        .collect()
}

/// Numeric table with one column per label
pub fn numeric_table(labels: &[&str], rows: &[&[f64]]) -> Table {
    let columns = labels
        .iter()
        .map(|label| {
            Column::new(
                ColumnDefinition::new(*label, *label),
                Unit::Dimensionless,
                ColumnKind::Numeric,
            )
        })
        .collect();
    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(|v| Cell::Number(*v)).collect());
    }
    table
}
