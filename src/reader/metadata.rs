//! Metadata index built by the section scanner
//!
//! Holds every section's key/value entries in file order together with the
//! line bookkeeping needed to carve tabular payloads out of the file.

use crate::constants::{TABLE_DEFINITIONS_SECTION, is_payload_section};
use crate::models::{Metadata, SectionEntries, SectionInfo};
use indexmap::IndexMap;
use serde::Serialize;

/// Immutable snapshot of a file's sections
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataIndex {
    sections: Metadata,
    section_info: IndexMap<String, SectionInfo>,
    total_lines: usize,
}

impl MetadataIndex {
    pub(crate) fn new(
        sections: Metadata,
        section_info: IndexMap<String, SectionInfo>,
        total_lines: usize,
    ) -> Self {
        Self {
            sections,
            section_info,
            total_lines,
        }
    }

    /// Entries of a section
    pub fn section(&self, name: &str) -> Option<&SectionEntries> {
        self.sections.get(name)
    }

    /// Line bookkeeping of a section
    pub fn info(&self, name: &str) -> Option<&SectionInfo> {
        self.section_info.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Section names in file order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Line bookkeeping of every section in file order
    pub fn section_infos(&self) -> impl Iterator<Item = &SectionInfo> {
        self.section_info.values()
    }

    /// Every section, payload sections included
    pub fn sections(&self) -> &Metadata {
        &self.sections
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Whether the file declares `*table definitions`
    pub fn is_multiple(&self) -> bool {
        self.table_definitions_entries().is_some()
    }

    fn table_definitions_entries(&self) -> Option<&SectionEntries> {
        self.sections
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(TABLE_DEFINITIONS_SECTION))
            .map(|(_, entries)| entries)
    }

    /// `(title, symbol)` pairs of `*table definitions` in file order
    pub fn table_definitions(&self) -> Vec<(&str, &str)> {
        self.table_definitions_entries()
            .map(|entries| {
                entries
                    .iter()
                    .map(|(title, symbol)| (title.as_str(), symbol.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Table symbols named by `*table definitions`
    pub fn table_symbols(&self) -> Vec<&str> {
        self.table_definitions()
            .into_iter()
            .map(|(_, symbol)| symbol)
            .collect()
    }

    /// Key/value metadata without the tabular payload sections
    ///
    /// This is the shape the writer accepts, so a document read from disk can
    /// be written back unchanged.
    pub fn metadata(&self) -> Metadata {
        self.sections
            .iter()
            .filter(|(name, _)| !is_payload_section(name))
            .map(|(name, entries)| (name.clone(), entries.clone()))
            .collect()
    }

    /// Sum of all section lengths; equals the line count after the first
    /// section header when section names are unique
    pub fn covered_lines(&self) -> usize {
        self.section_info.values().map(|info| info.length).sum()
    }
}
