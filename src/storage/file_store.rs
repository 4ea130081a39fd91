use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::Result;

use super::NoteStore;

const STORE_DIR: &str = "store";

/// Stores every key as its own file under `<home>/store/`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store rooted at the notebook home. Nothing is created until
    /// the first write.
    pub fn open(home: &Path) -> Self {
        Self {
            dir: home.join(STORE_DIR),
        }
    }

    /// Directory holding the value files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key_filename(key))
    }
}

impl NoteStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, text: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write beside the target and rename over it, so a crash mid-save
        // leaves the previous note intact.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        tracing::debug!(key, bytes = text.len(), "stored value");
        Ok(())
    }
}

/// Map a key to a safe file name, distinct keys to distinct names
///
/// - Keeps ASCII alphanumerics, `-` and `_`
/// - Escapes every other byte as `%XX`
/// - Names the empty key `%`, which no escaped key can produce
fn key_filename(key: &str) -> String {
    if key.is_empty() {
        return "%.md".to_string();
    }

    let mut name = String::with_capacity(key.len() + 3);
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            name.push(byte as char);
        } else {
            name.push_str(&format!("%{:02X}", byte));
        }
    }
    name.push_str(".md");
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DEFAULT_NOTE_KEY;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_key_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path());

        assert_eq!(store.get(DEFAULT_NOTE_KEY).unwrap(), None);
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_set_then_reopen() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::open(tmp.path());
        store.set(DEFAULT_NOTE_KEY, "# Hi\n").unwrap();

        let reopened = FileStore::open(tmp.path());
        assert_eq!(
            reopened.get(DEFAULT_NOTE_KEY).unwrap().as_deref(),
            Some("# Hi\n")
        );
    }

    #[test]
    fn test_empty_value_is_not_absent() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::open(tmp.path());
        store.set(DEFAULT_NOTE_KEY, "").unwrap();

        assert_eq!(store.get(DEFAULT_NOTE_KEY).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_set_overwrites_wholesale() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::open(tmp.path());
        store.set("k", "a much longer first value").unwrap();
        store.set("k", "short").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn test_key_filename() {
        assert_eq!(key_filename("markdown-notebook-content"), "markdown-notebook-content.md");
        assert_eq!(key_filename("../etc/passwd"), "%2E%2E%2Fetc%2Fpasswd.md");
        assert_eq!(key_filename("my notes"), "my%20notes.md");
        assert_eq!(key_filename("é"), "%C3%A9.md");
        assert_eq!(key_filename(""), "%.md");
    }

    #[test]
    fn test_similar_keys_do_not_collide() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::open(tmp.path());
        store.set("my notes", "spaced").unwrap();
        store.set("my_notes", "underscored").unwrap();
        store.set("", "empty key").unwrap();
        store.set("default", "named default").unwrap();

        assert_eq!(store.get("my notes").unwrap().as_deref(), Some("spaced"));
        assert_eq!(store.get("my_notes").unwrap().as_deref(), Some("underscored"));
        assert_eq!(store.get("").unwrap().as_deref(), Some("empty key"));
        assert_eq!(store.get("default").unwrap().as_deref(), Some("named default"));
    }

    #[test]
    fn test_set_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::open(tmp.path());
        for text in ["a", "ab", "abc"] {
            store.set(DEFAULT_NOTE_KEY, text).unwrap();
        }

        let names: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["markdown-notebook-content.md".to_string()]);
    }

    #[test]
    fn test_keys_are_independent() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::open(tmp.path());
        store.set("one", "1").unwrap();
        store.set("two", "2").unwrap();

        assert_eq!(store.get("one").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("two").unwrap().as_deref(), Some("2"));
    }
}
