//! Tests for line classification and section bookkeeping

use super::super::scanner::{LineClass, SectionScanner, classify_line};
use super::{content, multi_table_content, single_table_content};

fn lines(content: &str) -> Vec<&str> {
    content.lines().collect()
}

#[test]
fn test_classify_line_priority() {
    assert_eq!(classify_line("; [*data]", ';'), LineClass::Comment);
    assert_eq!(
        classify_line("[*data definitions]", ';'),
        LineClass::SectionHeader("*data definitions")
    );
    assert_eq!(
        classify_line("title: A: B", ';'),
        LineClass::KeyValue("title", "A: B")
    );
    assert_eq!(classify_line("1\t2", ';'), LineClass::Unclassified);
    assert_eq!(classify_line("key:value", ';'), LineClass::Unclassified);
    assert_eq!(classify_line("# note", '#'), LineClass::Comment);
    assert_eq!(classify_line("; note", '#'), LineClass::Unclassified);
}

#[test]
fn test_section_lengths_and_positions() {
    let content = single_table_content();
    let lines = lines(&content);
    let index = SectionScanner::new(';').scan(&lines);

    assert_eq!(index.total_lines(), 10);

    let reference = index.info("*reference").unwrap();
    assert_eq!(reference.start_line, 1);
    assert_eq!(reference.length, 3);

    let definitions = index.info("*data definitions").unwrap();
    assert_eq!(definitions.start_line, 4);
    assert_eq!(definitions.length, 3);

    let data = index.info("*data").unwrap();
    assert_eq!(data.start_line, 7);
    assert_eq!(data.length, 3);
    assert_eq!(data.expected_rows(), 2);

    // Every line after the control line belongs to exactly one section
    assert_eq!(index.covered_lines(), index.total_lines() - 1);
}

#[test]
fn test_key_value_entries_in_file_order() {
    let content = single_table_content();
    let lines = lines(&content);
    let index = SectionScanner::new(';').scan(&lines);

    let reference = index.section("*reference").unwrap();
    let keys: Vec<&str> = reference.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["title", "creator"]);
    assert_eq!(reference["title"], "Length measurement");

    let names: Vec<&str> = index.section_names().collect();
    assert_eq!(names, vec!["*reference", "*data definitions", "*data"]);
}

#[test]
fn test_comments_counted_per_section() {
    let content = content(&[
        "; -*- fmf-version: 1.1 -*-",
        "; header remark",
        "[*reference]",
        "; reference remark",
        "title: t",
        "[*data definitions]",
        "a: a",
        "[*data]",
        "; first",
        "1",
        "; second",
        "2",
    ]);
    let lines = lines(&content);
    let index = SectionScanner::new(';').scan(&lines);

    assert_eq!(index.info("*reference").unwrap().comment_count, 1);
    assert_eq!(index.info("*data definitions").unwrap().comment_count, 0);

    let data = index.info("*data").unwrap();
    assert_eq!(data.comment_count, 2);
    assert_eq!(data.length, 5);
    assert_eq!(data.expected_rows(), 2);
}

#[test]
fn test_lines_before_first_section_are_ignored() {
    let content = content(&["stray text", "key: value", "[*reference]", "title: t"]);
    let lines = lines(&content);
    let index = SectionScanner::new(';').scan(&lines);

    assert_eq!(index.sections().len(), 1);
    assert_eq!(index.section("*reference").unwrap().len(), 1);
    assert_eq!(index.info("*reference").unwrap().start_line, 2);
}

#[test]
fn test_file_starting_with_section_header() {
    let content = content(&["[*reference]", "title: t", "[*data]", "1"]);
    let lines = lines(&content);
    let index = SectionScanner::new(';').scan(&lines);

    assert_eq!(index.info("*reference").unwrap().start_line, 0);
    assert_eq!(index.covered_lines(), index.total_lines());
}

#[test]
fn test_multi_table_index() {
    let content = multi_table_content();
    let lines = lines(&content);
    let index = SectionScanner::new(';').scan(&lines);

    assert!(index.is_multiple());
    assert_eq!(index.table_definitions(), vec![("First", "A"), ("Second", "B")]);
    assert_eq!(index.table_symbols(), vec!["A", "B"]);

    let metadata = index.metadata();
    assert!(metadata.contains_key("*data definitions: A"));
    assert!(!metadata.contains_key("*data: A"));
    assert!(!metadata.contains_key("*data: B"));
    assert_eq!(index.info("*data: B").unwrap().length, 3);
}

#[test]
fn test_table_definitions_match_case_insensitively() {
    let content = content(&["[*Table Definitions]", "First: A"]);
    let lines = lines(&content);
    let index = SectionScanner::new(';').scan(&lines);

    assert!(index.is_multiple());
    assert_eq!(index.table_symbols(), vec!["A"]);
}
