use std::path::Path;

use super::*;
use crate::decl::{Declaration, RecordDecl};
use crate::render::render;

fn sig(name: &str) -> Signature {
    render(&Declaration::Record(RecordDecl {
        name: name.to_string(),
        fields: vec![],
    }))
}

fn output(report: Report<Vec<u8>>) -> (String, ReportStats) {
    let (bytes, stats) = report.finish().unwrap();
    (String::from_utf8(bytes).unwrap(), stats)
}

#[test]
fn writes_path_prefixed_lines() {
    let mut report = Report::new(Vec::new());
    let path = Path::new("pkg/a.go");
    let mut file = report.file(path);
    assert!(file.emit(&sig("A")).unwrap());
    assert!(file.emit(&sig("B")).unwrap());

    let (text, stats) = output(report);
    assert_eq!(text, "pkg/a.go: struct A {  }\npkg/a.go: struct B {  }\n");
    assert_eq!(stats.lines, 2);
    assert_eq!(stats.files, 1);
}

#[test]
fn drops_duplicates_within_a_file() {
    let mut report = Report::new(Vec::new());
    let path = Path::new("a.go");
    let mut file = report.file(path);
    assert!(file.emit(&sig("A")).unwrap());
    assert!(!file.emit(&sig("A")).unwrap());
    assert!(file.emit(&sig("B")).unwrap());
    assert!(!file.emit(&sig("A")).unwrap());

    let (text, stats) = output(report);
    assert_eq!(text, "a.go: struct A {  }\na.go: struct B {  }\n");
    assert_eq!(stats.declarations, 4);
    assert_eq!(stats.duplicates, 2);
}

#[test]
fn dedup_state_resets_per_file() {
    let mut report = Report::new(Vec::new());
    let a = Path::new("a.go");
    let b = Path::new("b.go");
    report.file(a).emit(&sig("Shared")).unwrap();
    report.file(b).emit(&sig("Shared")).unwrap();

    let (text, stats) = output(report);
    assert_eq!(text, "a.go: struct Shared {  }\nb.go: struct Shared {  }\n");
    assert_eq!(stats.files, 2);
    assert_eq!(stats.duplicates, 0);
}

#[test]
fn empty_signature_is_never_written() {
    let mut report = Report::new(Vec::new());
    let path = Path::new("a.go");
    assert!(!report.file(path).emit(&Signature::default()).unwrap());

    let (text, stats) = output(report);
    assert!(text.is_empty());
    assert_eq!(stats.declarations, 0);
}

#[test]
fn emit_all_preserves_first_seen_order() {
    let mut report = Report::new(Vec::new());
    let path = Path::new("a.go");
    let signatures = vec![sig("C"), sig("A"), sig("C"), sig("B")];
    let written = report.file(path).emit_all(&signatures).unwrap();
    assert_eq!(written, 3);

    let (text, _) = output(report);
    let names: Vec<&str> = text.lines().collect();
    assert_eq!(names, vec!["a.go: struct C {  }", "a.go: struct A {  }", "a.go: struct B {  }"]);
}

#[test]
fn diagnostics_write_one_line_per_error() {
    let mut diagnostics = Diagnostics::new(Vec::new());
    diagnostics.file_error(Path::new("bad.go"), &"3:1: syntax error").unwrap();
    diagnostics.error(&"permission denied").unwrap();
    assert_eq!(diagnostics.count(), 2);

    let text = String::from_utf8(diagnostics.into_inner()).unwrap();
    assert_eq!(text, "bad.go: 3:1: syntax error\npermission denied\n");
}
