//! Tests for the reader entry points

use super::super::{FmfReader, read_fmf};
use super::{content, multi_table_content, read, single_table_content};
use crate::config::ReaderConfig;
use crate::diagnostics::DiagnosticKind;
use crate::error::FmfError;
use crate::models::{Cell, Delimiter, Tables};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_file_info_from_control_line() {
    let document = read(&single_table_content());
    let info = &document.file_info;

    assert_eq!(info.version, "1.0");
    assert_eq!(info.encoding.as_deref(), Some("utf-8"));
    assert_eq!(info.delimiter, Delimiter::Tab);
    assert_eq!(info.comment_char, ';');
    assert_eq!(info.file_name.as_deref(), Some("fixture.fmf"));
    assert!(!info.is_multiple);
}

#[test]
fn test_defaults_without_control_line() {
    let document = read(&content(&[
        "[*reference]",
        "title: t",
        "[*data definitions]",
        "a: a",
        "[*data]",
        "1",
    ]));

    assert_eq!(document.file_info.version, "1.1");
    assert_eq!(document.file_info.delimiter, Delimiter::Tab);
    assert!(document.diagnostics.is_empty());
    assert_eq!(document.tables.len(), 1);
}

#[test]
fn test_comment_without_control_markers() {
    let document = read(&content(&[
        "; plain first line",
        "[*data definitions]",
        "a: a",
        "[*data]",
        "1",
    ]));

    assert!(document.diagnostics.has_kind(DiagnosticKind::ControlComment));
    assert_eq!(document.file_info.version, "1.1");
    assert_eq!(document.tables.len(), 1);
}

#[test]
fn test_empty_delimiter_falls_back_to_tab() {
    let document = read(&content(&[
        "; -*- fmf-version: 1.1; delimiter:   -*- ",
        "[*data definitions]",
        "a: a",
        "b: b",
        "[*data]",
        "1\t2",
    ]));

    assert_eq!(document.file_info.delimiter, Delimiter::Tab);
    assert!(document.diagnostics.mentions("empty delimiter"));
    assert!(!document.has_table_errors());
    assert_eq!(document.single_table().unwrap().column_values("b"), Some(vec![2.0]));
}

#[test]
fn test_malformed_control_line_is_fatal() {
    let result = FmfReader::default().read_str(
        &content(&["; -*- fmf-version 1.0 -*-", "[*reference]"]),
        None,
    );
    assert!(matches!(result, Err(FmfError::HeaderSyntax { .. })));
}

#[test]
fn test_empty_content() {
    let result = FmfReader::default().read_str("", None);
    assert!(matches!(result, Err(FmfError::EmptyFile { .. })));
}

#[test]
fn test_metadata_excludes_payload() {
    let document = read(&single_table_content());
    let metadata = document.metadata();

    let names: Vec<&str> = metadata.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["*reference", "*data definitions"]);
    assert_eq!(metadata["*data definitions"]["length"], "l [m]");
}

#[test]
fn test_into_tables_shapes() {
    match read(&single_table_content()).into_tables() {
        Some(Tables::Single(table)) => assert_eq!(table.height(), 2),
        other => panic!("expected a single table, got {:?}", other),
    }

    match read(&multi_table_content()).into_tables() {
        Some(Tables::Multiple(tables)) => {
            let symbols: Vec<&str> = tables.keys().map(String::as_str).collect();
            assert_eq!(symbols, vec!["A", "B"]);
        }
        other => panic!("expected multiple tables, got {:?}", other),
    }
}

#[test]
fn test_without_unit_annotation() {
    let reader = FmfReader::new(ReaderConfig::default().without_unit_annotation());
    let document = reader.read_str(&single_table_content(), None).unwrap();
    let table = document.single_table().unwrap();

    assert_eq!(table.rows[0][0], Cell::Number(1.0));
    assert!(table.columns[0].unit.is_dimensionless());
}

#[test]
fn test_read_fmf_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(single_table_content().as_bytes()).unwrap();
    file.flush().unwrap();

    let document = read_fmf(file.path()).unwrap();
    assert_eq!(document.tables.len(), 1);
    assert_eq!(
        document.file_info.file_name.as_deref(),
        Some(file.path().to_string_lossy().as_ref())
    );
}

#[test]
fn test_latin1_content_is_decoded() {
    let mut bytes = b"[*reference]\nunit note: ".to_vec();
    bytes.push(0xB5);
    bytes.extend_from_slice(b"m\n");

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let document = read_fmf(file.path()).unwrap();
    assert_eq!(document.metadata()["*reference"]["unit note"], "\u{b5}m");
}

#[test]
fn test_missing_and_empty_files() {
    let missing = read_fmf("/nonexistent/dir/missing.fmf");
    assert!(matches!(missing, Err(FmfError::FileAccess { .. })));

    let empty = NamedTempFile::new().unwrap();
    match read_fmf(empty.path()) {
        Err(FmfError::EmptyFile { path }) => assert_eq!(path, empty.path()),
        other => panic!("expected EmptyFile, got {:?}", other),
    }
}
