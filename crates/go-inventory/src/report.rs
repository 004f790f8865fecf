//! Report and diagnostic sinks.
//!
//! [`Report`] writes `PATH: SIGNATURE` lines. Deduplication is scoped to a
//! single [`FileReport`]: every call to [`Report::file`] starts from an empty
//! set, so the same signature in two files is printed twice.

use std::{
    collections::HashSet,
    fmt::Display,
    io::{self, Write},
    path::Path,
};

use tracing::trace;

use crate::render::Signature;

/// Counters gathered over one run. Logged, never written to the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub files: usize,
    pub declarations: usize,
    pub lines: usize,
    pub duplicates: usize,
    pub parse_failures: usize,
    pub walk_errors: usize,
}

pub struct Report<W: Write> {
    out: W,
    stats: ReportStats,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            stats: ReportStats::default(),
        }
    }

    /// Start reporting a new file with a fresh emitted set.
    pub fn file<'r>(
        &'r mut self,
        path: &'r Path,
    ) -> FileReport<'r, W> {
        self.stats.files += 1;
        FileReport {
            report: self,
            path,
            emitted: HashSet::new(),
        }
    }

    pub fn stats(&self) -> ReportStats {
        self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut ReportStats {
        &mut self.stats
    }

    pub fn finish(mut self) -> io::Result<(W, ReportStats)> {
        self.out.flush()?;
        Ok((self.out, self.stats))
    }
}

pub struct FileReport<'r, W: Write> {
    report: &'r mut Report<W>,
    path: &'r Path,
    emitted: HashSet<Signature>,
}

impl<W: Write> FileReport<'_, W> {
    /// Write `signature` unless this file already printed it.
    ///
    /// Returns whether a line was written. Empty signatures are dropped.
    pub fn emit(
        &mut self,
        signature: &Signature,
    ) -> io::Result<bool> {
        if signature.is_empty() {
            return Ok(false);
        }
        self.report.stats.declarations += 1;

        if self.emitted.contains(signature) {
            self.report.stats.duplicates += 1;
            trace!(path = %self.path.display(), %signature, "duplicate declaration dropped");
            return Ok(false);
        }

        writeln!(self.report.out, "{}: {}", self.path.display(), signature)?;
        self.emitted.insert(signature.clone());
        self.report.stats.lines += 1;
        Ok(true)
    }

    pub fn emit_all<'s>(
        &mut self,
        signatures: impl IntoIterator<Item = &'s Signature>,
    ) -> io::Result<usize> {
        let mut written = 0;
        for signature in signatures {
            if self.emit(signature)? {
                written += 1;
            }
        }
        Ok(written)
    }
}

/// Sink for per-file and walk-level errors, one line each.
pub struct Diagnostics<W: Write> {
    out: W,
    count: usize,
}

impl<W: Write> Diagnostics<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            count: 0,
        }
    }

    /// `PATH: ERROR`
    pub fn file_error(
        &mut self,
        path: &Path,
        error: &dyn Display,
    ) -> io::Result<()> {
        self.count += 1;
        writeln!(self.out, "{}: {error}", path.display())
    }

    /// Bare error text, for failures not tied to a readable file.
    pub fn error(
        &mut self,
        error: &dyn Display,
    ) -> io::Result<()> {
        self.count += 1;
        writeln!(self.out, "{error}")
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
#[path = "../tests/src/report/report_tests.rs"]
mod tests;
