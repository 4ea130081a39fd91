use chrono::Local;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::entity::Mode;
use crate::platform::Clock;
use crate::render::{MarkupRenderer, ACCENT};
use crate::storage::NoteStore;

use super::App;

const CHEATSHEET: [(&str, &str); 5] = [
    ("# Heading", "for headers"),
    ("**bold**", "for bold text"),
    ("*italic*", "for italic text"),
    ("- item", "for lists"),
    ("`code`", "for inline code"),
];

pub(super) fn draw<S: NoteStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>) {
    let page = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(frame.area());

    draw_page_header(frame, page[0]);

    if app.widget.is_loading() {
        draw_loading(frame, page[1]);
        return;
    }

    let editing = app.widget.mode() == Mode::Edit;
    let cheatsheet_height = if editing {
        CHEATSHEET.len() as u16 + 2
    } else {
        0
    };
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(cheatsheet_height),
            Constraint::Length(1),
        ])
        .split(page[1]);

    draw_toolbar(frame, app, sections[0]);
    if editing {
        draw_editor(frame, app, sections[1]);
        draw_cheatsheet(frame, sections[2]);
    } else {
        draw_preview(frame, app, sections[1]);
    }
    draw_status(frame, app, sections[3]);
}

fn draw_page_header(frame: &mut Frame<'_>, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "notebook.md",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "// A simple markdown notebook for ideation",
            Style::default().fg(Color::Gray),
        )),
    ];
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(ACCENT));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_loading(frame: &mut Frame<'_>, area: Rect) {
    let middle = Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    };
    let placeholder = Paragraph::new("Loading notebook...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(placeholder, middle);
}

fn draw_toolbar<S: NoteStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let widget = &app.widget;
    let muted = Style::default().fg(Color::DarkGray);

    let mut status = vec![Span::styled(
        match widget.mode() {
            Mode::Read => "reading mode",
            Mode::Edit => "editing mode",
        },
        Style::default().fg(Color::Gray),
    )];
    if let Some(saved) = widget.last_saved_at() {
        status.push(Span::raw("   "));
        status.push(Span::styled(
            format!("saved {}", saved.with_timezone(&Local).format("%H:%M:%S")),
            muted,
        ));
    }

    let stats = Line::from(vec![
        Span::styled(format!("{} words", widget.word_count()), muted),
        Span::raw("   "),
        Span::styled(format!("{} characters", widget.char_count()), muted),
        Span::raw("   "),
        Span::styled("^E to toggle • ESC to read", Style::default().fg(Color::DarkGray)),
    ]);

    let copy = if widget.is_copied_visible() {
        Span::styled("✓ copied!", Style::default().fg(Color::Green))
    } else {
        Span::raw("^Y copy")
    };
    let toggle = match widget.mode() {
        Mode::Read => "^E edit",
        Mode::Edit => "^E read",
    };
    let actions = Line::from(vec![
        copy,
        Span::raw("  "),
        Span::raw("^S export"),
        Span::raw("  "),
        Span::styled(toggle, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(actions.width() as u16),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(vec![Line::from(status), stats]),
        columns[0],
    );
    frame.render_widget(
        Paragraph::new(actions).alignment(Alignment::Right),
        columns[1],
    );
}

/// The rendered note as drawn in read mode, before scrolling
pub(super) fn preview(rendered: Text<'static>) -> Paragraph<'static> {
    Paragraph::new(rendered).wrap(Wrap { trim: false })
}

fn draw_preview<S: NoteStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.preview_width.set(inner.width);
    let rendered = app.renderer.render(app.widget.text());
    frame.render_widget(preview(rendered).scroll((app.scroll, 0)), inner);
}

fn draw_editor<S: NoteStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "auto-saves to local storage",
            Style::default().fg(Color::DarkGray),
        )),
        rows[0],
    );
    frame.render_widget(&app.editor, rows[1]);
}

fn draw_cheatsheet(frame: &mut Frame<'_>, area: Rect) {
    let lines: Vec<Line> = CHEATSHEET
        .iter()
        .map(|(syntax, meaning)| {
            Line::from(vec![
                Span::raw("→ "),
                Span::styled(*syntax, Style::default().fg(ACCENT)),
                Span::raw(" "),
                Span::raw(*meaning),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::LEFT | Borders::TOP)
        .border_style(Style::default().fg(ACCENT))
        .title(Span::styled(
            "~/markdown-cheatsheet",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status<S: NoteStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let text = match &app.status {
        Some(message) => message.clone(),
        None => "^Y copy  ^S export  ^Q quit".to_string(),
    };
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
