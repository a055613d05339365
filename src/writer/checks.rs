//! Consistency checks run before writing
//!
//! Nothing here stops a write. Problems become diagnostics so callers can
//! decide whether an incomplete file is acceptable.

use crate::constants::{
    DATA_DEFINITIONS_SECTION, REFERENCE_SECTION, TABLE_DEFINITIONS_SECTION,
    data_definitions_section,
};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::models::{Metadata, Table};
use indexmap::IndexMap;
use std::collections::BTreeSet;

fn missing_section(diagnostics: &mut Diagnostics, section: &str) {
    diagnostics.push_for_section(
        DiagnosticKind::MissingSection,
        section,
        format!("cannot find '{}' section", section),
    );
}

/// Check the metadata for the sections every file should carry
///
/// `*reference` is always expected. Single-table metadata needs
/// `*data definitions`; metadata with `*table definitions` needs one
/// `*data definitions: <symbol>` per declared symbol. Returns whether
/// everything was found.
pub fn check_sections(metadata: &Metadata, diagnostics: &mut Diagnostics) -> bool {
    let before = diagnostics.len();

    if !metadata.contains_key(REFERENCE_SECTION) {
        missing_section(diagnostics, REFERENCE_SECTION);
    }

    match metadata.get(TABLE_DEFINITIONS_SECTION) {
        Some(definitions) => {
            for symbol in definitions.values() {
                let section = data_definitions_section(symbol);
                if !metadata.contains_key(&section) {
                    missing_section(diagnostics, &section);
                }
            }
        }
        None => {
            if !metadata.contains_key(DATA_DEFINITIONS_SECTION) {
                missing_section(diagnostics, DATA_DEFINITIONS_SECTION);
            }
        }
    }

    diagnostics.len() == before
}

/// Compare the symbols of `*table definitions` with the supplied tables
///
/// The comparison ignores order. Returns whether both sets agree.
pub fn check_table_symbols(
    tables: &IndexMap<String, Table>,
    metadata: &Metadata,
    diagnostics: &mut Diagnostics,
) -> bool {
    let Some(definitions) = metadata.get(TABLE_DEFINITIONS_SECTION) else {
        diagnostics.push(
            DiagnosticKind::MissingTableDefinitions,
            format!(
                "cannot find key/section {}, thus cannot check consistency of table symbols",
                TABLE_DEFINITIONS_SECTION
            ),
        );
        return false;
    };

    let declared: BTreeSet<&str> = definitions.values().map(String::as_str).collect();
    let supplied: BTreeSet<&str> = tables.keys().map(String::as_str).collect();
    if declared == supplied {
        return true;
    }

    let without_table: Vec<&str> = declared.difference(&supplied).copied().collect();
    let undeclared: Vec<&str> = supplied.difference(&declared).copied().collect();
    diagnostics.push_for_section(
        DiagnosticKind::TableSymbolMismatch,
        TABLE_DEFINITIONS_SECTION,
        format!(
            "table definitions symbols not equal to the table symbols (declared without table: [{}], tables not declared: [{}])",
            without_table.join(", "),
            undeclared.join(", ")
        ),
    );
    false
}
