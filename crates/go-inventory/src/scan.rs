//! The per-run pipeline: walk, parse, extract, render, emit.
//!
//! Files are independent. In parallel mode they are processed on a rayon
//! pool but emitted in walk order, so the report is byte-identical to a
//! sequential run.

use std::{
    collections::HashSet,
    fmt::{Display, Formatter},
    io::{self, Write},
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ScanSettings;
use crate::decl::Declarations;
use crate::render::{Signature, render};
use crate::report::{Diagnostics, Report, ReportStats};
use crate::syntax::{ParseError, SyntaxTree};
use crate::walker::SourceWalker;

/// Parse one file and return its unique signatures in first-seen order.
pub fn scan_source(source: &str) -> Result<Vec<Signature>, ParseError> {
    let tree = SyntaxTree::parse(source)?;
    let mut seen = HashSet::new();
    let signatures = Declarations::new(&tree)
        .filter(|decl| !decl.is_empty())
        .map(|decl| render(&decl))
        .filter(|signature| seen.insert(signature.clone()))
        .collect();
    Ok(signatures)
}

pub struct Scanner {
    settings: ScanSettings,
}

impl Scanner {
    pub fn new(settings: ScanSettings) -> Self {
        Self {
            settings,
        }
    }

    /// Scan the configured root, writing report lines and diagnostics.
    ///
    /// Per-file failures are diagnosed and skipped; only a failing sink or
    /// thread pool aborts the run.
    pub fn run<W: Write, E: Write>(
        &self,
        report: &mut Report<W>,
        diagnostics: &mut Diagnostics<E>,
    ) -> Result<ReportStats, ScanError> {
        let walker = SourceWalker::new(&self.settings);
        info!("Scanning {}", walker.root().display());

        let threads = self.settings.resolved_worker_threads();
        if threads > 1 {
            self.run_parallel(&walker, threads, report, diagnostics)?;
        } else {
            for item in walker.files() {
                let outcome = match item {
                    Ok(path) => scan_path(path),
                    Err(error) => FileOutcome::WalkFailed(error),
                };
                record(outcome, report, diagnostics)?;
            }
        }

        let stats = report.stats();
        info!(
            "Scan complete: {} file(s), {} line(s), {} duplicate(s) dropped, {} parse failure(s), {} walk error(s)",
            stats.files, stats.lines, stats.duplicates, stats.parse_failures, stats.walk_errors
        );
        Ok(stats)
    }

    fn run_parallel<W: Write, E: Write>(
        &self,
        walker: &SourceWalker,
        threads: usize,
        report: &mut Report<W>,
        diagnostics: &mut Diagnostics<E>,
    ) -> Result<(), ScanError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("go-inventory-worker-{i}"))
            .build()
            .map_err(|error| ScanError::Pool(error.to_string()))?;
        debug!("Scanning with {threads} worker thread(s)");

        let items: Vec<_> = walker.files().collect();
        let outcomes: Vec<FileOutcome> = pool.install(|| {
            items
                .into_par_iter()
                .map(|item| match item {
                    Ok(path) => scan_path(path),
                    Err(error) => FileOutcome::WalkFailed(error),
                })
                .collect()
        });

        for outcome in outcomes {
            record(outcome, report, diagnostics)?;
        }
        Ok(())
    }
}

enum FileOutcome {
    Scanned {
        path: PathBuf,
        signatures: Vec<Signature>,
    },
    Failed {
        path: PathBuf,
        error: ScanError,
    },
    WalkFailed(ScanError),
}

fn scan_path(path: PathBuf) -> FileOutcome {
    debug!("Parsing {}", path.display());
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) => {
            let error = ScanError::Read {
                path: path.clone(),
                source,
            };
            return FileOutcome::Failed {
                path,
                error,
            };
        },
    };

    let source = match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(error) => {
            let error = ParseError::invalid_utf8(error.as_bytes(), &error.utf8_error());
            return FileOutcome::Failed {
                error: ScanError::Parse {
                    path: path.clone(),
                    error,
                },
                path,
            };
        },
    };

    match scan_source(&source) {
        Ok(signatures) => FileOutcome::Scanned {
            path,
            signatures,
        },
        Err(error) => FileOutcome::Failed {
            error: ScanError::Parse {
                path: path.clone(),
                error,
            },
            path,
        },
    }
}

fn record<W: Write, E: Write>(
    outcome: FileOutcome,
    report: &mut Report<W>,
    diagnostics: &mut Diagnostics<E>,
) -> Result<(), ScanError> {
    match outcome {
        FileOutcome::Scanned {
            path,
            signatures,
        } => {
            let written = report.file(&path).emit_all(&signatures).map_err(ScanError::Io)?;
            debug!("{}: {written} declaration(s)", path.display());
        },
        FileOutcome::Failed {
            path,
            error,
        } => {
            debug!("Skipping {}: {}", path.display(), error.detail());
            if matches!(error, ScanError::Parse { .. }) {
                report.stats_mut().parse_failures += 1;
            }
            diagnostics.file_error(&path, &error.detail()).map_err(ScanError::Io)?;
        },
        FileOutcome::WalkFailed(error) => {
            debug!("Walk error: {error}");
            report.stats_mut().walk_errors += 1;
            diagnostics.error(&error).map_err(ScanError::Io)?;
        },
    }
    Ok(())
}

#[derive(Debug)]
pub enum ScanError {
    Walk(walkdir::Error),
    Read {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        path: PathBuf,
        error: ParseError,
    },
    Io(io::Error),
    Pool(String),
}

impl ScanError {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Walk(error) => error.path(),
            Self::Read {
                path, ..
            }
            | Self::Parse {
                path, ..
            } => Some(path.as_path()),
            Self::Io(_) | Self::Pool(_) => None,
        }
    }

    /// The error text without the file path, for `PATH: ERROR` lines.
    pub fn detail(&self) -> String {
        match self {
            Self::Read {
                source, ..
            } => source.to_string(),
            Self::Parse {
                error, ..
            } => error.to_string(),
            other => other.to_string(),
        }
    }
}

impl Display for ScanError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Walk(error) => write!(f, "{error}"),
            Self::Read {
                path,
                source,
            } => write!(f, "{}: {source}", path.display()),
            Self::Parse {
                path,
                error,
            } => write!(f, "{}: {error}", path.display()),
            Self::Io(error) => write!(f, "cannot write report: {error}"),
            Self::Pool(reason) => write!(f, "cannot start worker pool: {reason}"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Walk(error) => Some(error),
            Self::Read {
                source, ..
            } => Some(source),
            Self::Parse {
                error, ..
            } => Some(error),
            Self::Io(error) => Some(error),
            Self::Pool(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/src/scan/scan_tests.rs"]
mod tests;
