#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use go_inventory::{Diagnostics, Report, ReportStats, Scanner, config::ScanSettings};

pub fn fixture_root(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Unique, empty temporary directory for one test.
pub fn temp_dir(tag: &str) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("go_inventory_{tag}_{}_{id}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write_file(
    root: &Path,
    relative: &str,
    content: &str,
) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

pub struct Outcome {
    pub report: String,
    pub diagnostics: String,
    pub stats: ReportStats,
}

/// Scan `settings.root` and return report and diagnostics with the root
/// prefix replaced by `<root>` so snapshots are machine independent.
pub fn scan(settings: ScanSettings) -> Outcome {
    let root = settings.root.clone();
    let mut report = Report::new(Vec::new());
    let mut diagnostics = Diagnostics::new(Vec::new());
    let stats = Scanner::new(settings).run(&mut report, &mut diagnostics).expect("scan must not fail");
    let (out, _) = report.finish().unwrap();

    Outcome {
        report: relativize(&String::from_utf8(out).unwrap(), &root),
        diagnostics: relativize(&String::from_utf8(diagnostics.into_inner()).unwrap(), &root),
        stats,
    }
}

pub fn scan_root(root: &Path) -> Outcome {
    scan(ScanSettings {
        root: root.to_path_buf(),
        ..ScanSettings::default()
    })
}

fn relativize(
    text: &str,
    root: &Path,
) -> String {
    text.replace(&format!("{}{}", root.display(), std::path::MAIN_SEPARATOR), "<root>/")
}
