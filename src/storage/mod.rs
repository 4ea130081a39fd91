//! Local persistence for the note.
//!
//! The store is a flat key-value map of strings. The notebook uses a single
//! key; nothing here knows about modes, rendering or timestamps.

mod file_store;
mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

use crate::error::Result;

/// Key the note lives under unless the config says otherwise.
pub const DEFAULT_NOTE_KEY: &str = "markdown-notebook-content";

/// Synchronous key-value string store.
pub trait NoteStore {
    /// Read the value under `key`. `Ok(None)` means nothing was ever stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key` with `text`.
    fn set(&mut self, key: &str, text: &str) -> Result<()>;
}

impl<S: NoteStore + ?Sized> NoteStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, text: &str) -> Result<()> {
        (**self).set(key, text)
    }
}
