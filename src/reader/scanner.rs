//! Single-pass section scanner
//!
//! Every line is classified, in priority order, as a comment, a section
//! header, a `key: value` entry or unclassified free text. The scan state
//! (the open section and the header positions seen so far) is an explicit
//! value threaded through each step.

use super::metadata::MetadataIndex;
use crate::models::{Metadata, SectionEntries, SectionInfo};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.*)\]").expect("section header pattern is valid"));

static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?): (.*)").expect("key/value pattern is valid"));

/// Classification of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    Comment,
    SectionHeader(&'a str),
    KeyValue(&'a str, &'a str),
    Unclassified,
}

/// Classify a line given the file's comment character
pub fn classify_line(line: &str, comment_char: char) -> LineClass<'_> {
    if line.starts_with(comment_char) {
        return LineClass::Comment;
    }

    if let Some(caps) = SECTION_HEADER.captures(line) {
        if let Some(name) = caps.get(1) {
            return LineClass::SectionHeader(name.as_str());
        }
    }

    if let Some(caps) = KEY_VALUE.captures(line) {
        if let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) {
            return LineClass::KeyValue(key.as_str(), value.as_str());
        }
    }

    LineClass::Unclassified
}

/// State carried from one line to the next
#[derive(Debug, Default)]
struct ScanState {
    current: Option<String>,
    sections: Metadata,
    comment_counts: IndexMap<String, usize>,
    /// Every header occurrence as (name, line)
    headers: Vec<(String, usize)>,
    skipped: usize,
}

impl ScanState {
    fn apply(mut self, line_no: usize, class: LineClass<'_>) -> Self {
        match class {
            LineClass::Comment => {
                if let Some(current) = &self.current {
                    if let Some(count) = self.comment_counts.get_mut(current) {
                        *count += 1;
                    }
                }
            }
            LineClass::SectionHeader(name) => {
                // A repeated header restarts the section
                self.sections.insert(name.to_string(), SectionEntries::new());
                self.comment_counts.insert(name.to_string(), 0);
                self.headers.push((name.to_string(), line_no));
                self.current = Some(name.to_string());
            }
            LineClass::KeyValue(key, value) => match &self.current {
                Some(current) => {
                    if let Some(entries) = self.sections.get_mut(current) {
                        entries.insert(key.to_string(), value.to_string());
                    }
                }
                None => self.skipped += 1,
            },
            LineClass::Unclassified => self.skipped += 1,
        }
        self
    }

    fn finish(self, total_lines: usize) -> MetadataIndex {
        let mut section_info = IndexMap::new();

        for (i, (name, start_line)) in self.headers.iter().enumerate() {
            let next_start = self
                .headers
                .get(i + 1)
                .map(|(_, line)| *line)
                .unwrap_or(total_lines);
            let comment_count = self.comment_counts.get(name).copied().unwrap_or(0);

            section_info.insert(
                name.clone(),
                SectionInfo {
                    name: name.clone(),
                    start_line: *start_line,
                    comment_count,
                    length: next_start - start_line,
                },
            );
        }

        debug!(
            "Scanned {} lines: {} sections, {} lines skipped",
            total_lines,
            section_info.len(),
            self.skipped
        );

        MetadataIndex::new(self.sections, section_info, total_lines)
    }
}

/// Builds a [`MetadataIndex`] from the lines of a file
#[derive(Debug, Clone)]
pub struct SectionScanner {
    comment_char: char,
}

impl SectionScanner {
    pub fn new(comment_char: char) -> Self {
        Self { comment_char }
    }

    /// Scan all lines, the control line included
    ///
    /// A control comment is a comment seen before any section is open and
    /// therefore leaves no trace; files without one may start directly with
    /// a section header.
    pub fn scan(&self, lines: &[&str]) -> MetadataIndex {
        let state = lines
            .iter()
            .enumerate()
            .fold(ScanState::default(), |state, (line_no, line)| {
                state.apply(line_no, classify_line(line, self.comment_char))
            });
        state.finish(lines.len())
    }
}
