//! Layered configuration.
//!
//! Settings are split into one file per category. [`Settings`] aggregates
//! them and is built exactly once at startup: defaults, then an optional
//! `go-inventory.toml`, then command-line overrides. Each layer is a `*Patch`
//! struct whose `None` fields leave the previous value alone; `normalize()`
//! runs after the last layer.

pub(crate) mod logging;
pub(crate) mod scan;

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

pub use logging::{LogFormat, LogLevel, LoggingSettings};
use logging::LoggingSettingsPatch;
pub use scan::{
    DEFAULT_EXTENSION, MAX_MAX_FILE_SIZE_KB, MAX_WORKER_THREADS, MIN_MAX_FILE_SIZE_KB, MIN_WORKER_THREADS,
    ScanSettings,
};
use scan::ScanSettingsPatch;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "go-inventory.toml";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub scan: ScanSettings,
    pub logging: LoggingSettings,
}

/// Command-line values that override the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub verbosity: u8,
    pub log_format: Option<LogFormat>,
    pub worker_threads: Option<usize>,
    pub exclude_paths: Vec<String>,
    pub extensions: Vec<String>,
    pub no_sort: bool,
}

impl Settings {
    /// Resolve settings for a run.
    ///
    /// An explicit `config` path must exist and parse. Without one, the first
    /// `go-inventory.toml` found from the scan root upwards is used, if any.
    pub fn load(
        config: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let root = overrides.root.clone().unwrap_or_else(|| ScanSettings::default().root);
        let path = match config {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(&root),
        };

        let mut settings = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_overrides(overrides);
        settings.normalize();
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let patch: SettingsPatch = toml::from_str(content)?;
        let mut settings = Self::default();
        settings.apply_patch(patch);
        settings.normalize();
        Ok(settings)
    }

    fn apply_patch(
        &mut self,
        patch: SettingsPatch,
    ) {
        if let Some(p) = patch.scan {
            self.scan.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    fn apply_overrides(
        &mut self,
        overrides: &Overrides,
    ) {
        if let Some(root) = &overrides.root {
            self.scan.root = root.clone();
        }
        self.logging.level = self.logging.level.bumped(overrides.verbosity);
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
        if let Some(threads) = overrides.worker_threads {
            self.scan.worker_threads = threads;
        }
        self.scan.exclude_paths.extend(overrides.exclude_paths.iter().cloned());
        if !overrides.extensions.is_empty() {
            self.scan.extensions = overrides.extensions.clone();
        }
        if overrides.no_sort {
            self.scan.sort = false;
        }
    }

    fn normalize(&mut self) {
        self.scan.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct SettingsPatch {
    scan: Option<ScanSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, toml::Value>,
}

/// Walks parent directories from `start` looking for `go-inventory.toml`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start.as_path()
    };
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Display for ConfigError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Read {
                path,
                source,
            } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse {
                path,
                source,
            } => write!(f, "invalid {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read {
                source, ..
            } => Some(source),
            Self::Parse {
                source, ..
            } => Some(source),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/config/settings_tests.rs"]
mod tests;
