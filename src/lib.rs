pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod logging;
pub mod platform;
pub mod render;
pub mod storage;
pub mod tui;
pub mod widget;

pub use config::NotebookConfig;
pub use entity::{Mode, Note, DEFAULT_DOCUMENT};
pub use error::{NotebookError, Result};
pub use render::{MarkdownRenderer, MarkupRenderer};
pub use storage::{FileStore, MemoryStore, NoteStore};
pub use widget::NotebookWidget;
