//! Format constants for FMF files
//!
//! Reserved section names, control line vocabulary and the defaults that
//! apply when a file carries no control comment.

// =============================================================================
// Reserved Section Names
// =============================================================================

/// Free-form key/value metadata, required in every file
pub const REFERENCE_SECTION: &str = "*reference";

/// Column definitions of the only table (single-table files)
pub const DATA_DEFINITIONS_SECTION: &str = "*data definitions";

/// Maps table titles to table symbols, present only in multi-table files
pub const TABLE_DEFINITIONS_SECTION: &str = "*table definitions";

/// Tabular payload of the only table (single-table files)
pub const DATA_SECTION: &str = "*data";

/// Name of the definitions section for a table symbol
pub fn data_definitions_section(symbol: &str) -> String {
    format!("{}: {}", DATA_DEFINITIONS_SECTION, symbol)
}

/// Name of the payload section for a table symbol
pub fn data_section(symbol: &str) -> String {
    format!("{}: {}", DATA_SECTION, symbol)
}

/// Whether a section holds a tabular payload rather than key/value metadata
pub fn is_payload_section(name: &str) -> bool {
    name == DATA_SECTION || name.starts_with("*data: ")
}

// =============================================================================
// Control Line
// =============================================================================

/// Marker enclosing the key/value pairs of the control comment
pub const CONTROL_MARKER: &str = "-*-";

/// Comment characters recognised on the first line
pub const DEFAULT_COMMENT_MARKERS: &[char] = &[';', '#'];

/// Comment character used when the first line is not a control comment
pub const DEFAULT_COMMENT_CHAR: char = ';';

/// Format version used when the first line is not a control comment
pub const DEFAULT_VERSION: &str = "1.1";

/// Control line keys
pub mod control_keys {
    pub const VERSION: &str = "fmf-version";
    pub const ENCODING: &str = "encoding";
    pub const CODING: &str = "coding";
    pub const DELIMITER: &str = "delimiter";
}

/// Delimiter aliases understood by the control line
pub mod delimiter_aliases {
    pub const WHITESPACE: &str = "whitespace";
    pub const SEMICOLON: &str = "semicolon";
    /// Escaped tab as it appears in the control line
    pub const TAB_ESCAPED: &str = "\\t";
}

// =============================================================================
// Writing
// =============================================================================

/// Marker appended to output names that do not already mention it
pub const FMF_SUFFIX: &str = ".fmf";

/// Concrete separator written for the whitespace delimiter alias
pub const WHITESPACE_WRITE_SEPARATOR: &str = "    ";

/// Number format used when the caller gives none
pub const DEFAULT_NUMBER_FORMAT: &str = "%G";

/// Precision used by number formats that do not state one
pub const DEFAULT_PRECISION: usize = 6;

/// Unit name attached to columns without a recognised unit
pub const DIMENSIONLESS: &str = "dimensionless";
