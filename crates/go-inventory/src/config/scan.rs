use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
};

use serde::Deserialize;

pub const DEFAULT_EXTENSION: &str = "go";
pub const MIN_MAX_FILE_SIZE_KB: u64 = 16;
pub const MAX_MAX_FILE_SIZE_KB: u64 = 1024 * 64;
pub const MIN_WORKER_THREADS: usize = 1;
pub const MAX_WORKER_THREADS: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub follow_links: bool,
    pub skip_hidden: bool,
    pub sort: bool,
    pub max_file_size_kb: u64,
    /// `0` resolves to the available parallelism, `1` keeps the run sequential.
    pub worker_threads: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            exclude_paths: Vec::new(),
            follow_links: false,
            skip_hidden: false,
            sort: true,
            max_file_size_kb: 4096,
            worker_threads: 1,
        }
    }
}

impl ScanSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: ScanSettingsPatch,
    ) {
        if let Some(v) = patch.root {
            self.root = v;
        }
        if let Some(v) = patch.extensions {
            self.extensions = v;
        }
        if let Some(v) = patch.exclude_paths {
            self.exclude_paths = v;
        }
        if let Some(v) = patch.follow_links {
            self.follow_links = v;
        }
        if let Some(v) = patch.skip_hidden {
            self.skip_hidden = v;
        }
        if let Some(v) = patch.sort {
            self.sort = v;
        }
        if let Some(v) = patch.max_file_size_kb {
            self.max_file_size_kb = v;
        }
        if let Some(v) = patch.worker_threads {
            self.worker_threads = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.max_file_size_kb = self.max_file_size_kb.clamp(MIN_MAX_FILE_SIZE_KB, MAX_MAX_FILE_SIZE_KB);
        if self.worker_threads != 0 {
            self.worker_threads = self.worker_threads.clamp(MIN_WORKER_THREADS, MAX_WORKER_THREADS);
        }

        let mut seen = HashSet::new();
        self.extensions = self
            .extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .filter(|ext| seen.insert(ext.clone()))
            .collect();
        if self.extensions.is_empty() {
            self.extensions.push(DEFAULT_EXTENSION.to_string());
        }

        let mut seen = HashSet::new();
        self.exclude_paths = self
            .exclude_paths
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .filter(|p| seen.insert(p.clone()))
            .collect();
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_kb.saturating_mul(1024)
    }

    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            return std::thread::available_parallelism().map(|n| n.get()).unwrap_or(MIN_WORKER_THREADS);
        }
        self.worker_threads
    }

    /// Exclusions as paths; relative entries are taken relative to the root.
    pub fn excluded_prefixes(&self) -> Vec<PathBuf> {
        self.exclude_paths
            .iter()
            .map(PathBuf::from)
            .map(|path| if path.is_absolute() { path } else { self.root.join(path) })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct ScanSettingsPatch {
    pub(crate) root: Option<PathBuf>,
    pub(crate) extensions: Option<Vec<String>>,
    pub(crate) exclude_paths: Option<Vec<String>>,
    pub(crate) follow_links: Option<bool>,
    pub(crate) skip_hidden: Option<bool>,
    pub(crate) sort: Option<bool>,
    pub(crate) max_file_size_kb: Option<u64>,
    pub(crate) worker_threads: Option<usize>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
