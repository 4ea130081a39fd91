//! Notebook settings, read from `<home>/config.yaml`.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{NotebookError, Result};
use crate::storage::DEFAULT_NOTE_KEY;
use crate::widget::DEFAULT_COPIED_WINDOW_MS;

/// Environment variable naming the notebook home directory
pub const HOME_ENV: &str = "NOTEBOOK_HOME";

const CONFIG_FILE: &str = "config.yaml";
const HOME_DIR_NAME: &str = ".notebook";
const MAX_COPIED_FEEDBACK_MS: u64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotebookConfig {
    /// Store key the note is saved under
    pub storage_key: String,
    /// Where exports land. Defaults to the current directory.
    pub export_dir: Option<PathBuf>,
    /// How long "copied" stays visible, in milliseconds
    pub copied_feedback_ms: u64,
    /// tracing filter used when `NOTEBOOK_LOG` is unset
    pub log_filter: String,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_NOTE_KEY.to_string(),
            export_dir: None,
            copied_feedback_ms: DEFAULT_COPIED_WINDOW_MS as u64,
            log_filter: "info".to_string(),
        }
    }
}

impl NotebookConfig {
    /// Load `<home>/config.yaml`, or the defaults when there is none.
    pub fn load(home: &Path) -> Result<Self> {
        let path = home.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(NotebookError::Config("storage_key must not be empty".to_string()));
        }
        if self.copied_feedback_ms > MAX_COPIED_FEEDBACK_MS {
            return Err(NotebookError::Config(format!(
                "copied_feedback_ms must be at most {}",
                MAX_COPIED_FEEDBACK_MS
            )));
        }
        Ok(())
    }

    pub fn copied_window(&self) -> Duration {
        Duration::milliseconds(self.copied_feedback_ms as i64)
    }

    /// Export directory, falling back to the current directory
    pub fn export_dir(&self) -> PathBuf {
        match &self.export_dir {
            Some(dir) => dir.clone(),
            None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// Pick the notebook home: the `--home` flag, then `NOTEBOOK_HOME`, then
/// `~/.notebook`, then `./.notebook`.
pub fn resolve_home(flag: Option<PathBuf>) -> PathBuf {
    resolve_home_from(flag, env::var_os(HOME_ENV), env::var_os("HOME"))
}

fn resolve_home_from(
    flag: Option<PathBuf>,
    notebook_home: Option<OsString>,
    user_home: Option<OsString>,
) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    if let Some(dir) = notebook_home.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    match user_home.filter(|d| !d.is_empty()) {
        Some(home) => PathBuf::from(home).join(HOME_DIR_NAME),
        None => PathBuf::from(HOME_DIR_NAME),
    }
}
