// src/entity/note.rs
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which view of the note is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Read,
    Edit,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Read => Mode::Edit,
            Mode::Edit => Mode::Read,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Read => write!(f, "read"),
            Mode::Edit => write!(f, "edit"),
        }
    }
}

/// The single document owned by the notebook.
///
/// Only `text` is persisted. `mode` and `last_saved_at` exist for the view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub mode: Mode,
    pub last_saved_at: Option<DateTime<Utc>>,
}

impl Note {
    pub fn new(text: String) -> Self {
        Self {
            text,
            mode: Mode::Read,
            last_saved_at: None,
        }
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }

    pub fn char_count(&self) -> usize {
        char_count(&self.text)
    }
}

/// Number of whitespace-delimited tokens that carry a letter or digit.
///
/// Bare markup tokens such as `#`, `-`, `>` or `---` are not words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}

/// Number of characters, whitespace and newlines included.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}
