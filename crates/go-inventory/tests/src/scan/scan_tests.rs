use std::{
    fs,
    sync::atomic::{AtomicU64, Ordering},
};

use super::*;

fn test_dir() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("go_inventory_scan_test_{}_{id}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn texts(signatures: &[Signature]) -> Vec<&str> {
    signatures.iter().map(Signature::as_str).collect()
}

fn run(settings: ScanSettings) -> (String, String, ReportStats) {
    let mut report = Report::new(Vec::new());
    let mut diagnostics = Diagnostics::new(Vec::new());
    let stats = Scanner::new(settings).run(&mut report, &mut diagnostics).unwrap();
    let (out, _) = report.finish().unwrap();
    let err = diagnostics.into_inner();
    (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap(), stats)
}

#[test]
fn scan_source_renders_in_source_order() {
    let src = r#"package geometry

func Add(a, b int) int { return a + b }

type Point struct {
	X, Y int
}

var Origin = Point{0, 0}
"#;
    let signatures = scan_source(src).unwrap();
    assert_eq!(texts(&signatures), vec![
        "function Add(a, b) int",
        "struct Point { X, Y }",
        "var Origin = Point{0, 0}",
    ]);
}

#[test]
fn scan_source_drops_repeated_signatures() {
    let src = r#"package p

func init() {}

var _ = 1

func init() {}

var _ = 1
"#;
    let signatures = scan_source(src).unwrap();
    assert_eq!(texts(&signatures), vec!["function init()", "var _ = 1"]);
}

#[test]
fn scan_source_reports_parse_failure() {
    assert!(scan_source("package p\n\nfunc (\n").is_err());
}

#[test]
fn run_isolates_parse_failures() {
    let dir = test_dir();
    fs::write(dir.join("bad.go"), "package p\n\nfunc Broken( {\n").unwrap();
    fs::write(dir.join("good.go"), "package p\n\nfunc Add(a, b int) int { return a + b }\n").unwrap();

    let (out, err, stats) = run(ScanSettings {
        root: dir.clone(),
        ..ScanSettings::default()
    });

    let good = dir.join("good.go");
    assert_eq!(out, format!("{}: function Add(a, b) int\n", good.display()));
    let bad = dir.join("bad.go");
    let lines: Vec<&str> = err.lines().collect();
    assert_eq!(lines.len(), 1, "exactly one diagnostic expected, got: {err}");
    assert!(lines[0].starts_with(&format!("{}: ", bad.display())), "unexpected diagnostic: {}", lines[0]);
    assert_eq!(stats.parse_failures, 1);
    assert_eq!(stats.files, 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_diagnoses_invalid_utf8_instead_of_replacing_bytes() {
    let dir = test_dir();
    fs::write(dir.join("latin1.go"), b"package p\n\nvar s = \"\xff\xfe\"\n").unwrap();

    let (out, err, stats) = run(ScanSettings {
        root: dir.clone(),
        ..ScanSettings::default()
    });

    assert!(out.is_empty(), "report: {out}");
    assert_eq!(err, format!("{}: 3:10: illegal UTF-8 encoding\n", dir.join("latin1.go").display()));
    assert_eq!(stats.parse_failures, 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_reports_same_declaration_once_per_file() {
    let dir = test_dir();
    let src = "package p\n\ntype Point struct{ X, Y int }\n";
    fs::write(dir.join("a.go"), src).unwrap();
    fs::write(dir.join("b.go"), src).unwrap();

    let (out, err, _) = run(ScanSettings {
        root: dir.clone(),
        ..ScanSettings::default()
    });

    assert!(err.is_empty());
    assert_eq!(
        out,
        format!(
            "{}: struct Point {{ X, Y }}\n{}: struct Point {{ X, Y }}\n",
            dir.join("a.go").display(),
            dir.join("b.go").display()
        )
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parallel_run_matches_sequential_output() {
    let dir = test_dir();
    for i in 0..12 {
        let src = format!("package p\n\nfunc F{i}(x int) error {{ return nil }}\n\nvar V{i} = {i}\n");
        fs::write(dir.join(format!("f{i:02}.go")), src).unwrap();
    }
    fs::write(dir.join("broken.go"), "package p\nfunc {\n").unwrap();

    let sequential = run(ScanSettings {
        root: dir.clone(),
        ..ScanSettings::default()
    });
    let parallel = run(ScanSettings {
        root: dir.clone(),
        worker_threads: 4,
        ..ScanSettings::default()
    });

    assert_eq!(sequential.0, parallel.0);
    assert_eq!(sequential.1, parallel.1);
    assert_eq!(sequential.2, parallel.2);
    assert_eq!(sequential.0.lines().count(), 24);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_root_is_diagnosed_not_fatal() {
    let dir = test_dir();
    let (out, err, stats) = run(ScanSettings {
        root: dir.join("nope"),
        ..ScanSettings::default()
    });
    assert!(out.is_empty());
    assert_eq!(err.lines().count(), 1);
    assert_eq!(stats.walk_errors, 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_error_display_includes_path() {
    let err = ScanError::Parse {
        path: PathBuf::from("x.go"),
        error: ParseError {
            line: 2,
            column: 6,
            message: "syntax error".into(),
        },
    };
    assert_eq!(err.to_string(), "x.go: 2:6: syntax error");
    assert_eq!(err.detail(), "2:6: syntax error");
    assert_eq!(err.path(), Some(Path::new("x.go")));
}
