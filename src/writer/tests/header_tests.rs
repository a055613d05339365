//! Tests for output naming and the control line

use super::super::{FmfWriter, control_line, create_file, has_fmf_extension, resolve_file_name};
use crate::config::WriterConfig;
use crate::error::FmfError;
use crate::models::Delimiter;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn header(config: WriterConfig) -> String {
    let mut writer = FmfWriter::new(Vec::new(), config);
    writer.append_header().unwrap();
    let (bytes, _) = writer.finish().unwrap();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_resolve_file_name() {
    assert_eq!(resolve_file_name("fmf"), PathBuf::from("fmf.fmf"));
    assert_eq!(resolve_file_name("fffmf"), PathBuf::from("fffmf.fmf"));
    assert_eq!(resolve_file_name("f.fmf"), PathBuf::from("f.fmf"));
    assert_eq!(resolve_file_name("data.FMF"), PathBuf::from("data.FMF"));
    // Any occurrence counts, not just a trailing extension
    assert_eq!(resolve_file_name("a.fmf.bak"), PathBuf::from("a.fmf.bak"));
}

#[test]
fn test_create_file_appends_suffix() {
    let dir = TempDir::new().unwrap();
    let requested = dir.path().join("measurement");

    let (path, _file) = create_file(requested.to_str().unwrap()).unwrap();
    assert_eq!(path, dir.path().join("measurement.fmf"));
    assert!(path.exists());
}

#[test]
fn test_create_file_truncates() {
    let dir = TempDir::new().unwrap();
    let existing = dir.path().join("old.fmf");
    std::fs::write(&existing, "previous content").unwrap();

    let (path, _file) = create_file(existing.to_str().unwrap()).unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "");
}

#[test]
fn test_header_with_all_fields() {
    let config = WriterConfig::default()
        .with_version("1.0")
        .with_encoding("uft-8")
        .with_delimiter(Delimiter::Tab);
    assert_eq!(
        header(config),
        "; -*- fmf-version: 1.0; encoding: uft-8; delimiter: \\t -*- \n"
    );
}

#[test]
fn test_header_defaults() {
    assert_eq!(header(WriterConfig::default()), "; -*- fmf-version: 1.1 -*- \n");
}

#[test]
fn test_header_variants() {
    let config = WriterConfig::default()
        .with_comment_char('#')
        .with_delimiter(Delimiter::Whitespace);
    assert_eq!(
        control_line(&config),
        "# -*- fmf-version: 1.1; delimiter: whitespace -*- \n"
    );

    let config = WriterConfig::default().with_delimiter(Delimiter::Literal(";".to_string()));
    assert_eq!(
        control_line(&config),
        "; -*- fmf-version: 1.1; delimiter: semicolon -*- \n"
    );

    let config = WriterConfig::default().with_encoding("latin-1");
    assert_eq!(
        control_line(&config),
        "; -*- fmf-version: 1.1; encoding: latin-1 -*- \n"
    );
}

#[test]
fn test_has_fmf_extension() {
    assert!(has_fmf_extension(Path::new("a/b.fmf")));
    assert!(has_fmf_extension(Path::new("B.FMF")));
    assert!(!has_fmf_extension(Path::new("b.csv")));
    assert!(!has_fmf_extension(Path::new("fmf")));
}

#[test]
fn test_header_rejects_unreadable_delimiters() {
    for delimiter in ["", " ", "  ", ",;", "a-*-b"] {
        let config =
            WriterConfig::default().with_delimiter(Delimiter::Literal(delimiter.to_string()));
        let mut writer = FmfWriter::new(Vec::new(), config);
        let result = writer.append_header();
        assert!(
            matches!(result, Err(FmfError::InvalidDelimiter { .. })),
            "delimiter {:?} should be rejected",
            delimiter
        );
        let (bytes, _) = writer.finish().unwrap();
        assert!(bytes.is_empty());
    }

    let config = WriterConfig::default().with_delimiter(Delimiter::Literal("\t".to_string()));
    assert_eq!(header(config), "; -*- fmf-version: 1.1; delimiter: \\t -*- \n");
}
