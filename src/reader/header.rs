//! Control line parsing
//!
//! The first line of an FMF file may be a control comment such as
//! `; -*- fmf-version: 1.0; delimiter: \t -*-`, declaring the comment
//! character, format version, encoding and delimiter. Everything else in the
//! file is interpreted through these settings, so a malformed fragment is
//! fatal.

use crate::constants::{
    CONTROL_MARKER, DEFAULT_COMMENT_CHAR, DEFAULT_VERSION, control_keys,
};
use crate::models::Delimiter;
use crate::{FmfError, Result};
use indexmap::IndexMap;
use tracing::debug;

/// Settings recovered from the first line
#[derive(Debug, Clone, PartialEq)]
pub struct ControlLine {
    pub version: String,
    pub comment_char: char,
    pub delimiter: Delimiter,
    pub encoding: Option<String>,
    /// Keys without a dedicated field
    pub extra: IndexMap<String, String>,
    /// The first line started with a comment marker
    pub is_control_comment: bool,
    /// A comment marker was present but the `-*-` markers were not
    pub missing_markers: bool,
    /// The delimiter key was present with an empty value
    pub empty_delimiter: bool,
}

impl Default for ControlLine {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            comment_char: DEFAULT_COMMENT_CHAR,
            delimiter: Delimiter::Tab,
            encoding: None,
            extra: IndexMap::new(),
            is_control_comment: false,
            missing_markers: false,
            empty_delimiter: false,
        }
    }
}

/// Parse the first line of a file
///
/// Lines that do not start with one of `comment_markers` yield the defaults:
/// version "1.1", tab delimiter and `;` comments.
pub fn parse_control_line(line: &str, comment_markers: &[char]) -> Result<ControlLine> {
    let line = line.strip_prefix('\u{feff}').unwrap_or(line);
    let mut control = ControlLine::default();

    let Some(first) = line.chars().next() else {
        return Ok(control);
    };
    if !comment_markers.contains(&first) {
        debug!("First line is not a control comment, using defaults");
        return Ok(control);
    }

    control.comment_char = first;
    control.is_control_comment = true;

    let Some(body) = line.split(CONTROL_MARKER).nth(1) else {
        control.missing_markers = true;
        return Ok(control);
    };

    for fragment in body.split(';') {
        if fragment.trim().is_empty() {
            continue;
        }

        let (key, value) = fragment.split_once(':').ok_or_else(|| {
            FmfError::header_syntax(fragment.trim(), "missing ':' between key and value")
        })?;
        let key = key.trim();
        // Only spaces are stripped so a literal tab delimiter survives
        let value = value.trim_matches(' ');

        match key {
            control_keys::VERSION => control.version = value.to_string(),
            control_keys::ENCODING | control_keys::CODING => {
                control.encoding = Some(value.to_string())
            }
            control_keys::DELIMITER if value.is_empty() => control.empty_delimiter = true,
            control_keys::DELIMITER => control.delimiter = Delimiter::from_control_value(value),
            _ => {
                control.extra.insert(key.to_string(), value.to_string());
            }
        }
    }

    debug!(
        "Control line: version={}, comment='{}', delimiter={:?}",
        control.version, control.comment_char, control.delimiter
    );
    Ok(control)
}
