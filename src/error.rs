use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("Notebook is still loading; edits are not possible yet.")]
    NotReady,

    #[error("Notebook is in read mode. Switch to edit mode to change the text.")]
    ReadOnly,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("The interactive notebook needs a terminal. Use 'notebook show' to print the note.")]
    NotATerminal,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, NotebookError>;
