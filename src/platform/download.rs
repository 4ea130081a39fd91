use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NotebookError, Result};

/// Content type of an exported note
pub const MARKDOWN_MIME: &str = "text/markdown";

/// Hands a finished document to the user.
pub trait Downloader {
    /// Deliver `bytes` under `filename`, returning where it ended up.
    fn trigger_download(&mut self, filename: &str, mime: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes downloads into a directory. A taken name gets a ` (n)` suffix
/// instead of being overwritten.
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for DirectoryDownloader {
    fn trigger_download(&mut self, filename: &str, mime: &str, bytes: &[u8]) -> Result<PathBuf> {
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(NotebookError::Download(format!(
                "invalid file name '{}'",
                filename
            )));
        }

        fs::create_dir_all(&self.dir)?;
        let path = unique_path(&self.dir, filename);
        fs::write(&path, bytes)?;

        tracing::info!(path = %path.display(), mime, bytes = bytes.len(), "download written");
        Ok(path)
    }
}

/// First free path for `filename` in `dir`, appending ` (1)`, ` (2)`, ...
/// before the extension on collision.
fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };

    let mut n = 1;
    loop {
        let name = match ext {
            Some(ext) => format!("{} ({}).{}", stem, n, ext),
            None => format!("{} ({})", stem, n),
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_download_writes_bytes() {
        let tmp = TempDir::new().unwrap();
        let mut downloader = DirectoryDownloader::new(tmp.path());

        let path = downloader
            .trigger_download("notebook-2024-03-05.md", MARKDOWN_MIME, b"# Hi")
            .unwrap();

        assert_eq!(path, tmp.path().join("notebook-2024-03-05.md"));
        assert_eq!(fs::read_to_string(path).unwrap(), "# Hi");
    }

    #[test]
    fn test_download_does_not_overwrite() {
        let tmp = TempDir::new().unwrap();
        let mut downloader = DirectoryDownloader::new(tmp.path());

        downloader
            .trigger_download("notebook.md", MARKDOWN_MIME, b"first")
            .unwrap();
        let second = downloader
            .trigger_download("notebook.md", MARKDOWN_MIME, b"second")
            .unwrap();
        let third = downloader
            .trigger_download("notebook.md", MARKDOWN_MIME, b"third")
            .unwrap();

        assert_eq!(second, tmp.path().join("notebook (1).md"));
        assert_eq!(third, tmp.path().join("notebook (2).md"));
        assert_eq!(fs::read_to_string(tmp.path().join("notebook.md")).unwrap(), "first");
    }

    #[test]
    fn test_download_creates_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("exports/today");
        let mut downloader = DirectoryDownloader::new(&dir);

        let path = downloader.trigger_download("a.md", MARKDOWN_MIME, b"x").unwrap();
        assert!(path.starts_with(&dir));
        assert!(path.exists());
    }

    #[test]
    fn test_download_rejects_path_names() {
        let tmp = TempDir::new().unwrap();
        let mut downloader = DirectoryDownloader::new(tmp.path());

        let result = downloader.trigger_download("../escape.md", MARKDOWN_MIME, b"x");
        assert!(matches!(result, Err(NotebookError::Download(_))));
    }

    #[test]
    fn test_unique_path_without_extension() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("notes"), "x").unwrap();
        assert_eq!(unique_path(tmp.path(), "notes"), tmp.path().join("notes (1)"));
    }
}
