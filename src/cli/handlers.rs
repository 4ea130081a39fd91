use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::config::{self, NotebookConfig};
use crate::entity::Mode;
use crate::error::{NotebookError, Result};
use crate::logging;
use crate::platform::{DirectoryDownloader, SystemClipboard};
use crate::render::{render_plain, MarkdownRenderer, MarkupRenderer};
use crate::storage::FileStore;
use crate::tui;
use crate::widget::NotebookWidget;

/// Home directory and settings shared by every command
struct Session {
    home: PathBuf,
    config: NotebookConfig,
}

impl Session {
    fn start(home: Option<PathBuf>) -> Result<Self> {
        let home = config::resolve_home(home);
        let config = NotebookConfig::load(&home)?;
        logging::init(&home, &config.log_filter)?;
        tracing::debug!(home = %home.display(), "session started");
        Ok(Self { home, config })
    }

    fn store(&self) -> FileStore {
        FileStore::open(&self.home)
    }

    /// A widget with the stored note already loaded
    fn widget(&self) -> Result<NotebookWidget<FileStore>> {
        let mut widget = NotebookWidget::open(self.store())
            .with_key(self.config.storage_key.clone())
            .with_copied_window(self.config.copied_window());
        widget.load()?;
        Ok(widget)
    }
}

#[derive(Serialize)]
struct NoteOutput<'a> {
    text: &'a str,
    words: usize,
    characters: usize,
}

#[derive(Serialize)]
struct StatsOutput {
    words: usize,
    characters: usize,
}

#[derive(Serialize)]
struct ExportOutput {
    filename: String,
    path: PathBuf,
}

pub fn handle_open(home: Option<PathBuf>) -> Result<()> {
    let session = Session::start(home)?;
    tui::run(session.store(), &session.config)
}

pub fn handle_show(home: Option<PathBuf>, json: bool) -> Result<()> {
    let session = Session::start(home)?;
    let widget = session.widget()?;

    if json {
        let output = NoteOutput {
            text: widget.text(),
            words: widget.word_count(),
            characters: widget.char_count(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(widget.text());
    }

    Ok(())
}

pub fn handle_render(home: Option<PathBuf>) -> Result<()> {
    let session = Session::start(home)?;
    let widget = session.widget()?;

    let rendered = MarkdownRenderer::new().render(widget.text());
    print_text(&render_plain(&rendered));

    Ok(())
}

pub fn handle_stats(home: Option<PathBuf>, json: bool) -> Result<()> {
    let session = Session::start(home)?;
    let widget = session.widget()?;

    let stats = StatsOutput {
        words: widget.word_count(),
        characters: widget.char_count(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{} words", stats.words);
        println!("{} characters", stats.characters);
    }

    Ok(())
}

pub fn handle_export(home: Option<PathBuf>, dir: Option<PathBuf>, json: bool) -> Result<()> {
    let session = Session::start(home)?;
    let widget = session.widget()?;

    let dir = dir.unwrap_or_else(|| session.config.export_dir());
    let mut downloader = DirectoryDownloader::new(dir.clone());
    let filename = widget.export_filename();

    // The widget only logs export failures; here the user is waiting on it.
    let path = widget.export(&mut downloader).ok_or_else(|| {
        NotebookError::Download(format!(
            "could not write {} into {} (see {})",
            filename,
            dir.display(),
            logging::log_path(&session.home).display()
        ))
    })?;

    if json {
        let output = ExportOutput { filename, path };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Exported {}", path.display());
    }

    Ok(())
}

/// X11 and Wayland only serve a copy while the copying process is alive.
const SELECTION_NEEDS_OWNER: bool = cfg!(all(
    unix,
    not(any(target_os = "macos", target_os = "ios", target_os = "android"))
));

pub fn handle_copy(home: Option<PathBuf>, hold_secs: u64) -> Result<()> {
    let session = Session::start(home)?;
    let mut widget = session.widget()?;

    if SELECTION_NEEDS_OWNER && hold_secs > 0 {
        eprintln!(
            "Holding the clipboard for up to {}s until another program takes it over...",
            hold_secs
        );
    }
    widget.copy(&mut SystemClipboard::holding(Duration::from_secs(hold_secs)))?;
    println!("Copied {} characters to the clipboard", widget.char_count());

    Ok(())
}

pub fn handle_import(home: Option<PathBuf>, file: Option<PathBuf>, stdin: bool) -> Result<()> {
    let session = Session::start(home)?;

    let text = match file {
        Some(path) if !stdin => fs::read_to_string(path)?,
        _ => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            content
        }
    };

    let mut widget = session.widget()?;
    if widget.mode() != Mode::Edit {
        widget.toggle_mode();
    }
    widget.set_text(text)?;

    let path = widget.store().path_for(&session.config.storage_key);
    println!(
        "Imported {} words, {} characters into {}",
        widget.word_count(),
        widget.char_count(),
        path.display()
    );

    Ok(())
}

pub fn handle_path(home: Option<PathBuf>) -> Result<()> {
    let session = Session::start(home)?;
    println!("{}", session.store().path_for(&session.config.storage_key).display());
    Ok(())
}

fn print_text(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}
