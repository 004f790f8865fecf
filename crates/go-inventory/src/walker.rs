use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanSettings;
use crate::scan::ScanError;

/// Discovers candidate source files under the scan root.
///
/// Traversal errors are yielded as [`ScanError::Walk`] and never end the walk.
pub struct SourceWalker {
    root: PathBuf,
    extensions: Vec<String>,
    excluded_prefixes: Vec<PathBuf>,
    follow_links: bool,
    skip_hidden: bool,
    sort: bool,
    max_file_size_bytes: u64,
}

impl SourceWalker {
    pub fn new(settings: &ScanSettings) -> Self {
        Self {
            root: settings.root.clone(),
            extensions: settings.extensions.clone(),
            excluded_prefixes: settings.excluded_prefixes().iter().map(|p| normalize_path(p)).collect(),
            follow_links: settings.follow_links,
            skip_hidden: settings.skip_hidden,
            sort: settings.sort,
            max_file_size_bytes: settings.max_file_size_bytes(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let mut walk = WalkDir::new(&self.root).follow_links(self.follow_links);
        if self.sort {
            walk = walk.sort_by_file_name();
        }

        walk.into_iter()
            .filter_entry(move |entry| self.should_descend(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) => self.accept(&entry).then(|| Ok(entry.into_path())),
                Err(error) => Some(Err(ScanError::Walk(error))),
            })
    }

    fn should_descend(
        &self,
        entry: &DirEntry,
    ) -> bool {
        if !self.excluded_prefixes.is_empty() && is_path_excluded(&normalize_path(entry.path()), &self.excluded_prefixes)
        {
            debug!("Excluded from scan: {}", entry.path().display());
            return false;
        }

        if !self.skip_hidden || entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        !entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
    }

    fn accept(
        &self,
        entry: &DirEntry,
    ) -> bool {
        if !entry.file_type().is_file() {
            return false;
        }

        let path = entry.path();
        if !entry.file_name().to_str().is_some_and(|name| self.has_source_suffix(name)) {
            return false;
        }

        if let Ok(metadata) = entry.metadata()
            && metadata.len() > self.max_file_size_bytes
        {
            debug!("Skipping large source file ({} bytes): {}", metadata.len(), path.display());
            return false;
        }

        true
    }

    /// Suffix match on the whole name, so a file called just `.go` counts.
    fn has_source_suffix(
        &self,
        name: &str,
    ) -> bool {
        self.extensions.iter().any(|ext| {
            name.strip_suffix(ext.as_str()).is_some_and(|stem| stem.ends_with('.'))
        })
    }
}

pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn is_path_excluded(
    path: &Path,
    excluded_prefixes: &[PathBuf],
) -> bool {
    excluded_prefixes.iter().any(|prefix| path.starts_with(prefix))
}

#[cfg(test)]
#[path = "../tests/src/walker/walker_tests.rs"]
mod tests;
