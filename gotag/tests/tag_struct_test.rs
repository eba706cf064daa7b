//! End-to-end tests for tagging a struct in a file on disk.
#![allow(clippy::unwrap_used, clippy::needless_raw_string_hashes)]

use gotag::error::TagError;
use gotag::tagger::{FieldOutcome, FilePosition, TagSpec};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const INPUT: &str = "package main

type Foo struct {
\tFoo string `json:\"-\"`
\tBar map[int]interface{}
\tbaz int

\tNax struct {
\t\tHello string
\t}
}";

fn write_fixture(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("foo.go");
    fs::write(&path, body).unwrap();
    path
}

fn tag(body: &str, offset: usize, tag: &str, prefix: &str, suffix: &str) -> String {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, body);
    let mut position = FilePosition::from_spec(&format!("{}:#{offset}", path.display())).unwrap();
    position
        .tag_struct(&TagSpec::new(tag, prefix, suffix).unwrap())
        .unwrap();
    position.render().unwrap()
}

// =============================================================================
// Tagging
// =============================================================================

#[test]
fn test_json_tags() {
    let expected = "package main

type Foo struct {
\tFoo string              `json:\"-\"`
\tBar map[int]interface{} `json:\"Bar\"`
\tbaz int

\tNax struct {
\t\tHello string
\t} `json:\"Nax\"`
}
";
    assert_eq!(tag(INPUT, 30, "json", "", ""), expected);
}

#[test]
fn test_xml_tags_append_to_existing() {
    let expected = "package main

type Foo struct {
\tFoo string              `json:\"-\" xml:\"Foo\"`
\tBar map[int]interface{} `xml:\"Bar\"`
\tbaz int

\tNax struct {
\t\tHello string
\t} `xml:\"Nax\"`
}
";
    assert_eq!(tag(INPUT, 30, "xml", "", ""), expected);
}

#[test]
fn test_prefix_and_suffix() {
    let expected = "package main

type Foo struct {
\tFoo string              `json:\"-\"`
\tBar map[int]interface{} `json:\"JSONBar,omitempty\"`
\tbaz int

\tNax struct {
\t\tHello string
\t} `json:\"JSONNax,omitempty\"`
}
";
    assert_eq!(tag(INPUT, 30, "json", "JSON", ",omitempty"), expected);
}

#[test]
fn test_innermost_struct_is_tagged() {
    let offset = INPUT.find("Hello").unwrap();
    let expected = "package main

type Foo struct {
\tFoo string `json:\"-\"`
\tBar map[int]interface{}
\tbaz int

\tNax struct {
\t\tHello string `json:\"Hello\"`
\t}
}
";
    assert_eq!(tag(INPUT, offset, "json", "", ""), expected);
}

#[test]
fn test_tagging_twice_is_stable() {
    let once = tag(INPUT, 30, "json", "", "");
    let twice = tag(&once, 30, "json", "", "");
    assert_eq!(once, twice);
}

#[test]
fn test_untouched_file_round_trips() {
    let dir = TempDir::new().unwrap();
    let body = format!("{INPUT}\n");
    let path = write_fixture(&dir, &body);
    let position = FilePosition::open(&path, 30).unwrap();
    assert_eq!(position.render().unwrap(), body);
}

#[test]
fn test_report_describes_each_field() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, INPUT);
    let mut position = FilePosition::open(&path, 30).unwrap();
    let report = position
        .tag_struct(&TagSpec::new("json", "", "").unwrap())
        .unwrap();

    let outcomes: Vec<FieldOutcome> = report.fields.iter().map(|f| f.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            FieldOutcome::AlreadyTagged,
            FieldOutcome::Added,
            FieldOutcome::Unexported,
            FieldOutcome::Added,
        ]
    );
    assert_eq!(report.start_line, 3);
}

#[test]
fn test_interpreted_tag_literal_is_extended() {
    let body = "package main\n\ntype T struct {\n\tA int \"json:\\\"a\\\"\"\n\tB int\n}\n";
    let expected =
        "package main\n\ntype T struct {\n\tA int \"json:\\\"a\\\" xml:\\\"A\\\"\"\n\tB int `xml:\"B\"`\n}\n";
    assert_eq!(tag(body, 22, "xml", "", ""), expected);
}

#[test]
fn test_blank_tag_is_replaced() {
    let body = "package main\n\ntype T struct {\n\tA int ``\n}\n";
    assert_eq!(
        tag(body, 22, "json", "", ""),
        "package main\n\ntype T struct {\n\tA int `json:\"A\"`\n}\n"
    );
}

#[test]
fn test_code_outside_struct_is_preserved() {
    let body = "package main\n\nimport \"fmt\"\n\n// T is documented.\ntype T struct {\n\tName string\n}\n\nfunc main() {\n\tfmt.Println(T{Name:   \"x\"})\n}\n";
    let offset = body.find("Name string").unwrap();
    let expected = "package main\n\nimport \"fmt\"\n\n// T is documented.\ntype T struct {\n\tName string `json:\"Name\"`\n}\n\nfunc main() {\n\tfmt.Println(T{Name:   \"x\"})\n}\n";
    assert_eq!(tag(body, offset, "json", "", ""), expected);
}

// =============================================================================
// One-line struct
// =============================================================================

const ONE_LINE: &str = "package main\n\ntype Foo struct { Foo string `json:\"-\"`; Bar map[int]interface{}; baz int; Nax struct{ Hello string } }\n";

fn one_line_offset() -> usize {
    ONE_LINE.find(" Foo string").unwrap() + 1
}

#[test]
fn test_one_line_json_tags() {
    let expected = "package main

type Foo struct {
\tFoo string              `json:\"-\"`
\tBar map[int]interface{} `json:\"Bar\"`
\tbaz int
\tNax struct{ Hello string } `json:\"Nax\"`
}
";
    assert_eq!(tag(ONE_LINE, one_line_offset(), "json", "", ""), expected);
}

#[test]
fn test_one_line_xml_tags() {
    let expected = "package main

type Foo struct {
\tFoo string              `json:\"-\" xml:\"Foo\"`
\tBar map[int]interface{} `xml:\"Bar\"`
\tbaz int
\tNax struct{ Hello string } `xml:\"Nax\"`
}
";
    assert_eq!(tag(ONE_LINE, one_line_offset(), "xml", "", ""), expected);
}

#[test]
fn test_one_line_prefix_and_suffix() {
    let expected = "package main

type Foo struct {
\tFoo string              `json:\"-\"`
\tBar map[int]interface{} `json:\"JSONBar,omitempty\"`
\tbaz int
\tNax struct{ Hello string } `json:\"JSONNax,omitempty\"`
}
";
    assert_eq!(
        tag(ONE_LINE, one_line_offset(), "json", "JSON", ",omitempty"),
        expected
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_position_without_separator() {
    let err = FilePosition::from_spec("file.go").unwrap_err();
    assert_eq!(err.to_string(), r#""file.go": invalid file position"#);
}

#[test]
fn test_position_with_non_numeric_offset() {
    let err = FilePosition::from_spec("file.go:#a").unwrap_err();
    assert_eq!(err.to_string(), r#""file.go:#a": non-numeric line number"#);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.go");
    let err = FilePosition::from_spec(&format!("{}:#30", path.display())).unwrap_err();
    assert!(matches!(err, TagError::FileNotFound { .. }));
    assert!(err.to_string().starts_with("no such file: "));
}

#[test]
fn test_empty_file_is_not_go() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "");
    let err = FilePosition::from_spec(&format!("{}:#30", path.display())).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("{}:1:1: expected 'package', found 'EOF'", path.display())
    );
}

#[test]
fn test_offset_outside_any_struct() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, INPUT);
    let mut position = FilePosition::open(&path, 0).unwrap();
    let err = position
        .tag_struct(&TagSpec::new("json", "", "").unwrap())
        .unwrap_err();
    assert!(matches!(err, TagError::NotFound { offset: 0 }));
}

#[test]
fn test_invalid_tag_name() {
    let err = TagSpec::new("js on", "", "").unwrap_err();
    assert_eq!(err.to_string(), r#"invalid tag name "js on""#);
}

#[test]
fn test_backquote_in_prefix_or_suffix() {
    let err = TagSpec::new("json", "a`b", "").unwrap_err();
    assert!(matches!(err, TagError::InvalidTagValue { .. }));
    assert_eq!(
        err.to_string(),
        "invalid tag value part \"a`b\": must not contain a backquote"
    );
    assert!(TagSpec::new("json", "", ",`omitempty").is_err());
}
