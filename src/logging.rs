//! File logging. The terminal belongs to the UI, so events go to
//! `<home>/notebook.log`.

use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{NotebookError, Result};

/// Environment variable overriding the configured log filter
pub const LOG_ENV: &str = "NOTEBOOK_LOG";

const LOG_FILE: &str = "notebook.log";

pub fn log_path(home: &Path) -> PathBuf {
    home.join(LOG_FILE)
}

/// Install the global subscriber. A second call in the same process keeps
/// the first subscriber.
pub fn init(home: &Path, default_filter: &str) -> Result<()> {
    let filter = build_filter(env::var(LOG_ENV).ok().as_deref(), default_filter)?;

    fs::create_dir_all(home)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(home))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    if installed.is_err() {
        tracing::debug!("logging already initialised");
    }
    Ok(())
}

/// `NOTEBOOK_LOG` wins when it parses; otherwise the configured filter must.
fn build_filter(from_env: Option<&str>, default_filter: &str) -> Result<EnvFilter> {
    if let Some(directives) = from_env {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return Ok(filter),
            Err(e) => eprintln!("Warning: ignoring {}='{}': {}", LOG_ENV, directives, e),
        }
    }

    EnvFilter::try_new(default_filter).map_err(|e| {
        NotebookError::Config(format!("invalid log filter '{}': {}", default_filter, e))
    })
}
