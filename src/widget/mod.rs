//! The notebook widget: one note, a read/edit switch, and the side effects
//! hanging off it (persistence, clipboard, export).
//!
//! The widget never draws itself. Hosts read its state and call its
//! operations; see `crate::tui` for the terminal host.

mod ack;
pub mod keyboard;

pub use ack::Acknowledgment;
pub use keyboard::{KeyboardHub, Shortcut, Subscription};

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use crossterm::event::KeyEvent;

use crate::entity::{Mode, Note, DEFAULT_DOCUMENT};
use crate::error::{NotebookError, Result};
use crate::platform::{Clipboard, Clock, Downloader, SystemClock, MARKDOWN_MIME};
use crate::storage::{NoteStore, DEFAULT_NOTE_KEY};

/// How long the "copied" marker stays up by default
pub const DEFAULT_COPIED_WINDOW_MS: i64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The stored note has not been read yet.
    Loading,
    Ready,
}

pub struct NotebookWidget<S, C = SystemClock> {
    store: S,
    clock: C,
    key: String,
    note: Note,
    status: Status,
    copied: Acknowledgment,
    copied_window: Duration,
    shortcuts: Option<Subscription>,
}

impl<S: NoteStore> NotebookWidget<S, SystemClock> {
    pub fn open(store: S) -> Self {
        Self::new(store, SystemClock)
    }
}

impl<S: NoteStore, C: Clock> NotebookWidget<S, C> {
    /// A widget in the `Loading` state. Call [`load`](Self::load) before
    /// editing.
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            key: DEFAULT_NOTE_KEY.to_string(),
            note: Note::new(String::new()),
            status: Status::Loading,
            copied: Acknowledgment::default(),
            copied_window: Duration::milliseconds(DEFAULT_COPIED_WINDOW_MS),
            shortcuts: None,
        }
    }

    /// Use a different store key for the note
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_copied_window(mut self, window: Duration) -> Self {
        self.copied_window = window;
        self
    }

    /// Read the stored note, falling back to the default document when
    /// nothing is stored. Leaves the widget ready in read mode.
    pub fn load(&mut self) -> Result<()> {
        if self.status == Status::Ready {
            return Ok(());
        }

        let text = match self.store.get(&self.key)? {
            Some(text) => {
                tracing::info!(key = %self.key, chars = text.len(), "loaded stored note");
                text
            }
            None => {
                tracing::info!(key = %self.key, "no stored note, starting from the default document");
                DEFAULT_DOCUMENT.to_string()
            }
        };

        self.note = Note::new(text);
        self.status = Status::Ready;
        Ok(())
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn text(&self) -> &str {
        &self.note.text
    }

    pub fn mode(&self) -> Mode {
        self.note.mode
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.note.last_saved_at
    }

    pub fn word_count(&self) -> usize {
        self.note.word_count()
    }

    pub fn char_count(&self) -> usize {
        self.note.char_count()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn toggle_mode(&mut self) {
        self.note.mode = self.note.mode.toggled();
        tracing::debug!(mode = %self.note.mode, "mode toggled");
    }

    /// Leave edit mode. Does nothing in read mode.
    pub fn return_to_read(&mut self) {
        if self.note.mode == Mode::Edit {
            self.note.mode = Mode::Read;
            tracing::debug!("returned to read mode");
        }
    }

    /// Replace the whole note and write it to the store.
    ///
    /// The in-memory text is replaced before the write, so a failed write
    /// leaves the new text in place with `last_saved_at` untouched.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        if self.status == Status::Loading {
            return Err(NotebookError::NotReady);
        }
        if self.note.mode != Mode::Edit {
            return Err(NotebookError::ReadOnly);
        }

        self.note.text = text.into();
        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        self.store.set(&self.key, &self.note.text)?;
        self.note.last_saved_at = Some(self.clock.now());
        Ok(())
    }

    /// Copy the note to `clipboard`. Only a successful copy raises the
    /// "copied" marker; a failure is logged and handed back.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard) -> Result<()> {
        match clipboard.write_text(&self.note.text) {
            Ok(()) => {
                self.copied.show(self.clock.now(), self.copied_window);
                tracing::debug!(chars = self.note.text.len(), "note copied to clipboard");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "copy to clipboard failed");
                Err(err)
            }
        }
    }

    pub fn is_copied_visible(&self) -> bool {
        self.copied.is_visible(self.clock.now())
    }

    /// `notebook-<YYYY-MM-DD>.md` for the current UTC date
    pub fn export_filename(&self) -> String {
        format!("notebook-{}.md", self.clock.now().format("%Y-%m-%d"))
    }

    /// Hand the note to `downloader` as a markdown file.
    ///
    /// Export is best effort: a failed download is logged and yields `None`.
    pub fn export(&self, downloader: &mut dyn Downloader) -> Option<PathBuf> {
        let filename = self.export_filename();
        match downloader.trigger_download(&filename, MARKDOWN_MIME, self.note.text.as_bytes()) {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!(error = %err, filename = %filename, "export failed");
                None
            }
        }
    }

    /// Start listening to `hub` for the notebook shortcuts. Mounting again
    /// replaces the previous registration.
    pub fn mount(&mut self, hub: &KeyboardHub) {
        self.shortcuts = Some(hub.subscribe());
    }

    pub fn unmount(&mut self) {
        self.shortcuts = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.shortcuts.is_some()
    }

    /// Apply a shortcut. Returns whether it changed anything.
    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> bool {
        match shortcut {
            Shortcut::ToggleMode => {
                self.toggle_mode();
                true
            }
            Shortcut::EscapeToRead => {
                let was_editing = self.note.mode == Mode::Edit;
                self.return_to_read();
                was_editing
            }
        }
    }

    /// Drain the keys delivered since the last call and apply the ones that
    /// are shortcuts. Returns how many took effect.
    pub fn process_keys(&mut self) -> usize {
        let mut handled = 0;
        while let Some(key) = self.next_key() {
            if let Some(shortcut) = Shortcut::from_key(&key) {
                if self.handle_shortcut(shortcut) {
                    handled += 1;
                }
            }
        }
        handled
    }

    fn next_key(&self) -> Option<KeyEvent> {
        self.shortcuts.as_ref()?.poll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualClock;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[derive(Default)]
    struct RecordingClipboard {
        copies: Vec<String>,
        refuse: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            if self.refuse {
                return Err(NotebookError::Clipboard("permission denied".to_string()));
            }
            self.copies.push(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingDownloader {
        downloads: Vec<(String, String, Vec<u8>)>,
        fail: bool,
    }

    impl Downloader for RecordingDownloader {
        fn trigger_download(&mut self, filename: &str, mime: &str, bytes: &[u8]) -> Result<PathBuf> {
            if self.fail {
                return Err(NotebookError::Download("disk full".to_string()));
            }
            self.downloads
                .push((filename.to_string(), mime.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(filename))
        }
    }

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).unwrap())
    }

    fn loaded<'a>(
        store: &MemoryStore,
        clock: &'a ManualClock,
    ) -> NotebookWidget<MemoryStore, &'a ManualClock> {
        let mut widget = NotebookWidget::new(store.clone(), clock);
        widget.load().unwrap();
        widget
    }

    fn ctrl_e() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL)
    }

    fn esc() -> KeyEvent {
        KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)
    }

    #[test]
    fn test_fresh_widget_uses_default_document() {
        let store = MemoryStore::new();
        let clock = clock();
        let widget = loaded(&store, &clock);

        assert_eq!(widget.status(), Status::Ready);
        assert_eq!(widget.text(), DEFAULT_DOCUMENT);
        assert_eq!(widget.mode(), Mode::Read);
        assert!(widget.last_saved_at().is_none());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_load_prefers_stored_note() {
        let store = MemoryStore::with_value(DEFAULT_NOTE_KEY, "stored");
        let clock = clock();
        let widget = loaded(&store, &clock);

        assert_eq!(widget.text(), "stored");
    }

    #[test]
    fn test_stored_empty_note_is_kept() {
        let store = MemoryStore::with_value(DEFAULT_NOTE_KEY, "");
        let clock = clock();
        let widget = loaded(&store, &clock);

        assert_eq!(widget.text(), "");
        assert_eq!(widget.word_count(), 0);
        assert_eq!(widget.char_count(), 0);
    }

    #[test]
    fn test_custom_key() {
        let store = MemoryStore::with_value("other", "elsewhere");
        let clock = clock();
        let mut widget = NotebookWidget::new(store.clone(), &clock).with_key("other");
        widget.load().unwrap();

        assert_eq!(widget.text(), "elsewhere");
    }

    #[test]
    fn test_edits_rejected_while_loading() {
        let clock = clock();
        let mut widget = NotebookWidget::new(MemoryStore::new(), &clock);
        widget.toggle_mode();

        assert!(widget.is_loading());
        assert!(matches!(widget.set_text("x"), Err(NotebookError::NotReady)));
    }

    #[test]
    fn test_edits_rejected_in_read_mode() {
        let store = MemoryStore::new();
        let clock = clock();
        let mut widget = loaded(&store, &clock);

        assert!(matches!(widget.set_text("x"), Err(NotebookError::ReadOnly)));
        assert_eq!(widget.text(), DEFAULT_DOCUMENT);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_set_text_persists_and_counts() {
        let store = MemoryStore::new();
        let clock = clock();
        let mut widget = loaded(&store, &clock);
        widget.toggle_mode();

        widget.set_text("# Hi").unwrap();

        assert_eq!(store.value(DEFAULT_NOTE_KEY).as_deref(), Some("# Hi"));
        assert_eq!(widget.mode(), Mode::Edit);
        assert_eq!(widget.word_count(), 1);
        assert_eq!(widget.char_count(), 4);
        assert_eq!(widget.last_saved_at(), Some(clock.now()));
    }

    #[test]
    fn test_every_change_is_written() {
        let store = MemoryStore::new();
        let clock = clock();
        let mut widget = loaded(&store, &clock);
        widget.toggle_mode();

        widget.set_text("a").unwrap();
        clock.advance(Duration::seconds(5));
        widget.set_text("a").unwrap();

        assert_eq!(store.write_count(), 2);
        assert_eq!(widget.last_saved_at(), Some(clock.now()));
    }

    #[test]
    fn test_reload_round_trip() {
        let store = MemoryStore::new();
        let clock = clock();
        for text in ["", "plain", "  \n\t", "# Título ✓\n\n- a\n", "line\r\nbreaks"] {
            let mut widget = loaded(&store, &clock);
            widget.toggle_mode();
            widget.set_text(text).unwrap();
            drop(widget);

            let reloaded = loaded(&store, &clock);
            assert_eq!(reloaded.text(), text);
        }
    }

    #[test]
    fn test_failed_write_propagates() {
        let store = MemoryStore::new();
        let clock = clock();
        let mut widget = loaded(&store, &clock);
        widget.toggle_mode();
        widget.set_text("saved").unwrap();
        let saved_at = widget.last_saved_at();

        store.fail_writes("quota exceeded");
        clock.advance(Duration::seconds(1));
        let result = widget.set_text("unsaved");

        assert!(matches!(result, Err(NotebookError::Storage(_))));
        assert_eq!(widget.text(), "unsaved");
        assert_eq!(widget.last_saved_at(), saved_at);
        assert_eq!(store.value(DEFAULT_NOTE_KEY).as_deref(), Some("saved"));
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let store = MemoryStore::new();
        let clock = clock();
        let mut widget = loaded(&store, &clock);

        widget.toggle_mode();
        assert_eq!(widget.mode(), Mode::Edit);
        widget.toggle_mode();
        assert_eq!(widget.mode(), Mode::Read);
    }

    #[test]
    fn test_escape_only_leaves_edit() {
        let store = MemoryStore::new();
        let clock = clock();
        let mut widget = loaded(&store, &clock);

        assert!(!widget.handle_shortcut(Shortcut::EscapeToRead));
        assert_eq!(widget.mode(), Mode::Read);

        widget.toggle_mode();
        assert!(widget.handle_shortcut(Shortcut::EscapeToRead));
        assert_eq!(widget.mode(), Mode::Read);
    }

    #[test]
    fn test_copy_shows_acknowledgment_for_window() {
        let store = MemoryStore::with_value(DEFAULT_NOTE_KEY, "copy me");
        let clock = clock();
        let mut widget = loaded(&store, &clock);
        let mut clipboard = RecordingClipboard::default();

        widget.copy(&mut clipboard).unwrap();
        assert_eq!(clipboard.copies, vec!["copy me".to_string()]);
        assert!(widget.is_copied_visible());

        clock.advance(Duration::milliseconds(1999));
        assert!(widget.is_copied_visible());
        clock.advance(Duration::milliseconds(1));
        assert!(!widget.is_copied_visible());
    }

    #[test]
    fn test_second_copy_keeps_acknowledgment_up() {
        let store = MemoryStore::new();
        let clock = clock();
        let mut widget = loaded(&store, &clock);
        let mut clipboard = RecordingClipboard::default();

        widget.copy(&mut clipboard).unwrap();
        clock.advance(Duration::seconds(1));
        widget.copy(&mut clipboard).unwrap();

        for _ in 0..19 {
            clock.advance(Duration::milliseconds(100));
            assert!(widget.is_copied_visible());
        }
        clock.advance(Duration::milliseconds(100));
        assert!(!widget.is_copied_visible());
        assert_eq!(clipboard.copies.len(), 2);
    }

    #[test]
    fn test_failed_copy_shows_no_acknowledgment() {
        let store = MemoryStore::new();
        let clock = clock();
        let mut widget = loaded(&store, &clock);
        let mut clipboard = RecordingClipboard {
            refuse: true,
            ..Default::default()
        };

        let result = widget.copy(&mut clipboard);

        assert!(matches!(result, Err(NotebookError::Clipboard(_))));
        assert!(!widget.is_copied_visible());
    }

    #[test]
    fn test_export_names_file_by_date() {
        let store = MemoryStore::with_value(DEFAULT_NOTE_KEY, "# Export\n");
        let clock = clock();
        let widget = loaded(&store, &clock);
        let mut downloader = RecordingDownloader::default();

        let path = widget.export(&mut downloader);

        assert_eq!(path, Some(PathBuf::from("notebook-2024-03-05.md")));
        assert_eq!(
            downloader.downloads,
            vec![(
                "notebook-2024-03-05.md".to_string(),
                "text/markdown".to_string(),
                b"# Export\n".to_vec()
            )]
        );
    }

    #[test]
    fn test_export_failure_is_swallowed() {
        let store = MemoryStore::new();
        let clock = clock();
        let widget = loaded(&store, &clock);
        let mut downloader = RecordingDownloader {
            fail: true,
            ..Default::default()
        };

        assert_eq!(widget.export(&mut downloader), None);
    }

    #[test]
    fn test_shortcuts_match_buttons() {
        let store = MemoryStore::new();
        let clock = clock();
        let hub = KeyboardHub::new();
        let mut widget = loaded(&store, &clock);
        widget.mount(&hub);

        hub.publish(ctrl_e());
        assert_eq!(widget.process_keys(), 1);
        assert_eq!(widget.mode(), Mode::Edit);

        hub.publish(esc());
        assert_eq!(widget.process_keys(), 1);
        assert_eq!(widget.mode(), Mode::Read);

        hub.publish(esc());
        assert_eq!(widget.process_keys(), 0);
        assert_eq!(widget.mode(), Mode::Read);

        hub.publish(ctrl_e());
        hub.publish(ctrl_e());
        assert_eq!(widget.process_keys(), 2);
        assert_eq!(widget.mode(), Mode::Read);
    }

    #[test]
    fn test_unrelated_keys_are_ignored() {
        let store = MemoryStore::new();
        let clock = clock();
        let hub = KeyboardHub::new();
        let mut widget = loaded(&store, &clock);
        widget.mount(&hub);

        hub.publish(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE));
        hub.publish(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(widget.process_keys(), 0);
        assert_eq!(widget.mode(), Mode::Read);
    }

    #[test]
    fn test_unmount_detaches_listener() {
        let store = MemoryStore::new();
        let clock = clock();
        let hub = KeyboardHub::new();
        let mut widget = loaded(&store, &clock);

        widget.mount(&hub);
        assert!(widget.is_mounted());
        assert_eq!(hub.listener_count(), 1);

        widget.unmount();
        assert!(!widget.is_mounted());
        assert_eq!(hub.listener_count(), 0);

        hub.publish(ctrl_e());
        assert_eq!(widget.process_keys(), 0);
        assert_eq!(widget.mode(), Mode::Read);
    }

    #[test]
    fn test_remount_does_not_leak() {
        let store = MemoryStore::new();
        let clock = clock();
        let hub = KeyboardHub::new();
        let mut widget = loaded(&store, &clock);

        widget.mount(&hub);
        widget.mount(&hub);
        assert_eq!(hub.listener_count(), 1);

        drop(widget);
        assert_eq!(hub.listener_count(), 0);
    }
}
