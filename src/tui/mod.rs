//! Full-screen terminal host for the notebook widget.

mod view;

use std::cell::Cell;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tui_textarea::TextArea;

use crate::config::NotebookConfig;
use crate::entity::Mode;
use crate::error::{NotebookError, Result};
use crate::platform::{Clipboard, Clock, DirectoryDownloader, Downloader, SystemClipboard};
use crate::render::{MarkdownRenderer, MarkupRenderer};
use crate::storage::NoteStore;
use crate::widget::{KeyboardHub, NotebookWidget};

/// How often the loop wakes without input, so the "copied" marker expires
/// on time.
const TICK_RATE: Duration = Duration::from_millis(100);
const PAGE_SCROLL: u16 = 10;

/// Open the notebook on the terminal until the user quits.
pub fn run<S: NoteStore>(store: S, config: &NotebookConfig) -> Result<()> {
    if !atty::is(atty::Stream::Stdout) || !atty::is(atty::Stream::Stdin) {
        return Err(NotebookError::NotATerminal);
    }

    let widget = NotebookWidget::open(store)
        .with_key(config.storage_key.clone())
        .with_copied_window(config.copied_window());
    let mut app = App::new(
        widget,
        Box::new(SystemClipboard::new()),
        Box::new(DirectoryDownloader::new(config.export_dir())),
    );

    let mut terminal = setup_terminal()?;
    let result = app.event_loop(&mut terminal);
    restore_terminal(&mut terminal)?;
    result
}

/// Host-level commands, the terminal stand-ins for the copy, export and
/// toggle buttons plus scrolling and quitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Copy,
    Export,
    Quit,
    ScrollUp(u16),
    ScrollDown(u16),
    ScrollTop,
}

fn action_for(key: &KeyEvent, mode: Mode) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('y') => Some(Action::Copy),
            KeyCode::Char('s') => Some(Action::Export),
            KeyCode::Char('q') | KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    if mode == Mode::Edit {
        return None;
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp(1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown(1)),
        KeyCode::PageUp => Some(Action::ScrollUp(PAGE_SCROLL)),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(Action::ScrollDown(PAGE_SCROLL)),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::ScrollTop),
        _ => None,
    }
}

fn editor_for(text: &str) -> TextArea<'static> {
    let mut editor = TextArea::new(text.split('\n').map(String::from).collect());
    editor.set_placeholder_text("# Start writing your markdown here...");
    editor
}

pub(crate) struct App<S, C> {
    widget: NotebookWidget<S, C>,
    hub: KeyboardHub,
    editor: TextArea<'static>,
    renderer: MarkdownRenderer,
    clipboard: Box<dyn Clipboard>,
    downloader: Box<dyn Downloader>,
    scroll: u16,
    /// Text width of the preview at the last draw, 0 before the first one
    preview_width: Cell<u16>,
    status: Option<String>,
    should_quit: bool,
}

impl<S: NoteStore, C: Clock> App<S, C> {
    pub(crate) fn new(
        widget: NotebookWidget<S, C>,
        clipboard: Box<dyn Clipboard>,
        downloader: Box<dyn Downloader>,
    ) -> Self {
        Self {
            widget,
            hub: KeyboardHub::new(),
            editor: editor_for(""),
            renderer: MarkdownRenderer::new(),
            clipboard,
            downloader,
            scroll: 0,
            preview_width: Cell::new(0),
            status: None,
            should_quit: false,
        }
    }

    /// Finish loading and start listening for shortcuts.
    fn start(&mut self) -> Result<()> {
        self.widget.load()?;
        self.widget.mount(&self.hub);
        self.editor = editor_for(self.widget.text());
        Ok(())
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        // One frame of the loading placeholder before the store is read.
        terminal.draw(|frame| view::draw(frame, self))?;
        self.start()?;

        while !self.should_quit {
            terminal.draw(|frame| view::draw(frame, self))?;

            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        self.widget.unmount();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        self.hub.publish(key);
        if self.widget.process_keys() > 0 {
            return;
        }

        if let Some(action) = action_for(&key, self.widget.mode()) {
            self.apply(action);
            return;
        }

        if self.widget.mode() == Mode::Edit && self.editor.input(key) {
            self.commit_editor();
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Copy => {
                // Failure is already logged by the widget and not shown.
                let _ = self.widget.copy(self.clipboard.as_mut());
            }
            Action::Export => {
                if let Some(path) = self.widget.export(self.downloader.as_mut()) {
                    self.status = Some(format!("exported {}", path.display()));
                }
            }
            Action::Quit => self.should_quit = true,
            Action::ScrollUp(lines) => self.scroll = self.scroll.saturating_sub(lines),
            Action::ScrollDown(lines) => {
                let last = self.rendered_row_count().saturating_sub(1);
                self.scroll = self.scroll.saturating_add(lines).min(last);
            }
            Action::ScrollTop => self.scroll = 0,
        }
    }

    fn commit_editor(&mut self) {
        let text = self.editor.lines().join("\n");
        if let Err(err) = self.widget.set_text(text) {
            tracing::error!(error = %err, "saving note failed");
        }
    }

    /// Rows the preview takes once wrapped to its current width
    fn rendered_row_count(&self) -> u16 {
        let rendered = self.renderer.render(self.widget.text());
        let rows = match self.preview_width.get() {
            0 => rendered.lines.len(),
            width => view::preview(rendered).line_count(width),
        };
        u16::try_from(rows).unwrap_or(u16::MAX)
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(())
}
