//! Test fixtures shared by the reader test modules
//!
//! Each builder returns complete file content; line numbers quoted in the
//! tests refer to the zero-based position in these fixtures.

use super::{FmfDocument, FmfReader};

mod reader_tests;
mod scanner_tests;

/// Join lines into file content with a trailing newline
pub fn content(lines: &[&str]) -> String {
    let mut content = lines.join("\n");
    content.push('\n');
    content
}

/// Single table of two columns, one with a unit
///
/// Section starts: `*reference` 1, `*data definitions` 4, `*data` 7;
/// ten lines in total.
pub fn single_table_content() -> String {
    content(&[
        "; -*- fmf-version: 1.0; encoding: utf-8; delimiter: \\t -*-",
        "[*reference]",
        "title: Length measurement",
        "creator: Lab",
        "[*data definitions]",
        "length: l [m]",
        "count: n",
        "[*data]",
        "1\t2",
        "3\t4",
    ])
}

/// Two tables declared through `*table definitions`
pub fn multi_table_content() -> String {
    content(&[
        "; -*- fmf-version: 1.1; delimiter: \\t -*-",
        "[*reference]",
        "title: Two tables",
        "[*table definitions]",
        "First: A",
        "Second: B",
        "[*data definitions: A]",
        "time: t [s]",
        "voltage: U [V]",
        "[*data definitions: B]",
        "name: label",
        "temperature: T [K]",
        "[*data: A]",
        "0\t1.5",
        "1\t2.5",
        "2\t3.5",
        "[*data: B]",
        "alpha\t10",
        "beta\t20",
    ])
}

pub fn read(content: &str) -> FmfDocument {
    FmfReader::default()
        .read_str(content, Some("fixture.fmf"))
        .expect("fixture should parse")
}
