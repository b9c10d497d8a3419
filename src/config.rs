//! Runtime configuration from environment variables.
//!
//! - `GLYCOSCOPE_MODEL_PATH`: model artifact (default `diabetes_model.json`)
//! - `GLYCOSCOPE_LOG_MODE`: `auto` | `file` | `stdout` (default `auto`)
//! - `GLYCOSCOPE_LOG_FILE`: log file used in file mode (default `glycoscope.log`)

use std::path::PathBuf;

/// Default relative path of the model artifact.
pub const DEFAULT_MODEL_PATH: &str = "diabetes_model.json";

/// Default log file used when logging to a file.
pub const DEFAULT_LOG_FILE: &str = "glycoscope.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise.
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            model_path: non_empty("GLYCOSCOPE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            log_mode: non_empty("GLYCOSCOPE_LOG_MODE")
                .map(|v| LogMode::parse(&v))
                .unwrap_or(defaults.log_mode),
            log_file: non_empty("GLYCOSCOPE_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        }
    }
}
