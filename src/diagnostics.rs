//! Structured, non-fatal diagnostics
//!
//! Readers and writers accumulate diagnostics instead of printing them, so
//! callers can inspect exactly what was tolerated. Every entry is mirrored to
//! `tracing` at warn level when it is recorded.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Category of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// First line starts with a comment marker but carries no `-*-` pair
    ControlComment,
    /// Column unit text unknown to the unit system, column made dimensionless
    UnrecognizedUnit,
    /// A table could not be extracted
    TableParse,
    /// A required section is absent from metadata being written
    MissingSection,
    /// `*table definitions` symbols differ from the supplied tables
    TableSymbolMismatch,
    /// No `*table definitions` to compare supplied tables against
    MissingTableDefinitions,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::ControlComment => "control-comment",
            DiagnosticKind::UnrecognizedUnit => "unrecognized-unit",
            DiagnosticKind::TableParse => "table-parse",
            DiagnosticKind::MissingSection => "missing-section",
            DiagnosticKind::TableSymbolMismatch => "table-symbol-mismatch",
            DiagnosticKind::MissingTableDefinitions => "missing-table-definitions",
        };
        f.write_str(name)
    }
}

/// A single diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Section the diagnostic refers to, when there is one
    pub section: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Ordered collection of diagnostics produced by one read or write call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic without a section reference
    pub fn push(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.record(Diagnostic {
            kind,
            message: message.into(),
            section: None,
        });
    }

    /// Record a diagnostic tied to a section
    pub fn push_for_section(
        &mut self,
        kind: DiagnosticKind,
        section: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.record(Diagnostic {
            kind,
            message: message.into(),
            section: Some(section.into()),
        });
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Append every entry of another collection
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.entries.iter().filter(|d| d.kind == kind).collect()
    }

    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    /// Whether any message contains the given text
    pub fn mentions(&self, text: &str) -> bool {
        self.entries.iter().any(|d| d.message.contains(text))
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_query() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.push(DiagnosticKind::MissingSection, "cannot find '*reference' section");
        diagnostics.push_for_section(
            DiagnosticKind::UnrecognizedUnit,
            "*data definitions",
            "furlong not recognised as a unit",
        );

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.has_kind(DiagnosticKind::MissingSection));
        assert!(!diagnostics.has_kind(DiagnosticKind::TableParse));
        assert!(diagnostics.mentions("*reference"));
        assert_eq!(diagnostics.of_kind(DiagnosticKind::UnrecognizedUnit).len(), 1);
        assert_eq!(
            diagnostics.of_kind(DiagnosticKind::UnrecognizedUnit)[0]
                .section
                .as_deref(),
            Some("*data definitions")
        );
    }

    #[test]
    fn test_display_includes_kind() {
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::TableSymbolMismatch,
            message: "symbols differ".to_string(),
            section: None,
        };
        assert_eq!(diagnostic.to_string(), "[table-symbol-mismatch] symbols differ");
    }
}
