//! Configuration for reading and writing FMF files.
//!
//! Both configurations serialise with serde so they can be stored alongside
//! a processing job, and expose `with_*` builders for programmatic use.

use crate::constants::{DEFAULT_COMMENT_CHAR, DEFAULT_COMMENT_MARKERS, DEFAULT_VERSION};
use crate::models::Delimiter;
use crate::units::UnitRegistry;
use crate::writer::NumberFormat;
use serde::{Deserialize, Serialize};

/// Reader settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Characters accepted as the comment marker of the control line
    pub comment_markers: Vec<char>,

    /// Tag numeric cells with their column unit; plain numbers otherwise
    pub annotate_units: bool,

    /// Extra symbols the unit system accepts as independent base units
    pub custom_units: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            comment_markers: DEFAULT_COMMENT_MARKERS.to_vec(),
            annotate_units: true,
            custom_units: Vec::new(),
        }
    }
}

impl ReaderConfig {
    /// Accept an additional comment marker on the control line
    pub fn with_comment_marker(mut self, marker: char) -> Self {
        if !self.comment_markers.contains(&marker) {
            self.comment_markers.push(marker);
        }
        self
    }

    /// Leave numeric cells untagged
    pub fn without_unit_annotation(mut self) -> Self {
        self.annotate_units = false;
        self
    }

    /// Register a custom unit symbol
    pub fn with_custom_unit(mut self, symbol: impl Into<String>) -> Self {
        self.custom_units.push(symbol.into());
        self
    }

    /// Unit registry honouring the custom units
    pub fn unit_registry(&self) -> UnitRegistry {
        UnitRegistry::with_custom_units(self.custom_units.iter().cloned())
    }
}

/// Writer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Format version written into the control line
    pub version: String,

    /// Comment character starting the control line
    pub comment_char: char,

    /// Encoding declared in the control line, omitted when `None`
    pub encoding: Option<String>,

    /// Delimiter declared in the control line and used between cells;
    /// `None` omits the declaration and separates cells with tabs
    pub delimiter: Option<Delimiter>,

    /// Format applied to numeric cells
    pub number_format: NumberFormat,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            comment_char: DEFAULT_COMMENT_CHAR,
            encoding: None,
            delimiter: None,
            number_format: NumberFormat::default(),
        }
    }
}

impl WriterConfig {
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_comment_char(mut self, comment_char: char) -> Self {
        self.comment_char = comment_char;
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
        self.number_format = number_format;
        self
    }

    /// Delimiter actually used between cells
    pub fn cell_delimiter(&self) -> Delimiter {
        self.delimiter.clone().unwrap_or_default()
    }
}
