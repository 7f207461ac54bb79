//! Benchmark options
//!
//! Read-only configuration owned by the host. The loader borrows it to find
//! window system modules and hands it to the selected module's create entry
//! point.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides [`Options::window_system_dir`].
pub const WINDOW_SYSTEM_DIR_ENV: &str = "MARK_WINDOW_SYSTEM_DIR";

/// Module directory baked in at build time, or `window-systems` next to the
/// working directory.
pub const DEFAULT_WINDOW_SYSTEM_DIR: &str = match option_env!("MARK_WINDOW_SYSTEM_DIR") {
    Some(dir) => dir,
    None => "window-systems",
};

/// Errors raised while reading options from disk.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse options file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid options: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Presentation mode requested from the window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentMode {
    Immediate,
    Mailbox,
    #[default]
    Fifo,
    FifoRelaxed,
}

/// Host options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Directory scanned for window system modules
    pub window_system_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub present_mode: PresentMode,
    /// Frames to present before quitting; 0 runs until the window system asks to quit
    pub frames: u32,
    /// Free-form `key = value` settings interpreted by the selected module
    pub window_system_options: BTreeMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            window_system_dir: PathBuf::from(DEFAULT_WINDOW_SYSTEM_DIR),
            width: 800,
            height: 600,
            present_mode: PresentMode::default(),
            frames: 0,
            window_system_options: BTreeMap::new(),
        }
    }
}

impl Options {
    pub fn from_json_str(source: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, OptionsError> {
        let source = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&source).map_err(|source| OptionsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` in place of the process environment.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(WINDOW_SYSTEM_DIR_ENV).filter(|dir| !dir.is_empty()) {
            tracing::debug!(dir = %dir, "window system directory overridden by {WINDOW_SYSTEM_DIR_ENV}");
            self.window_system_dir = PathBuf::from(dir);
        }
    }

    pub fn window_system_option(&self, key: &str) -> Option<&str> {
        self.window_system_options.get(key).map(String::as_str)
    }
}
