use pulldown_cmark::{Alignment, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use super::{MarkupRenderer, ACCENT};

const RULE_WIDTH: usize = 40;
const CODE_INDENT: &str = "    ";
const QUOTE_PREFIX: &str = "│ ";

/// CommonMark plus the GitHub extensions notes tend to use: tables,
/// strikethrough, task lists and footnotes.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES,
        }
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkupRenderer for MarkdownRenderer {
    fn render(&self, text: &str) -> Text<'static> {
        let mut writer = Writer::default();
        for event in Parser::new_ext(text, self.options) {
            writer.handle(event);
        }
        writer.finish()
    }
}

enum Container {
    Quote,
    /// `marker` is printed on the item's first line, `indent` spaces after.
    Item {
        indent: usize,
        marker: Option<String>,
    },
}

struct LinkState {
    dest: String,
    text: String,
}

struct TableState {
    alignments: Vec<Alignment>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
    header_rows: usize,
}

impl TableState {
    fn new(alignments: Vec<Alignment>) -> Self {
        Self {
            alignments,
            rows: Vec::new(),
            row: Vec::new(),
            cell: String::new(),
            header_rows: 0,
        }
    }

    fn end_cell(&mut self) {
        let cell = std::mem::take(&mut self.cell);
        self.row.push(cell.trim().to_string());
    }

    fn end_row(&mut self) {
        let row = std::mem::take(&mut self.row);
        self.rows.push(row);
    }

    fn column_widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.alignments.len());

        (0..columns)
            .map(|col| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

/// Walks parser events and lays them out as lines.
#[derive(Default)]
struct Writer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    containers: Vec<Container>,
    lists: Vec<Option<u64>>,
    links: Vec<LinkState>,
    table: Option<TableState>,
    code_block: Option<String>,
    needs_blank: bool,
}

impl Writer {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let style = self.style().patch(inline_code_style());
                self.push_text(&code, style);
            }
            Event::Html(html) | Event::InlineHtml(html) => self.html(&html),
            Event::FootnoteReference(label) => {
                let style = self.style();
                self.push_text(&format!("[{}]", label), style);
            }
            Event::SoftBreak | Event::HardBreak => {
                if self.table.is_some() {
                    self.push_text(" ", Style::default());
                } else {
                    self.flush_line();
                }
            }
            Event::Rule => self.rule(),
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_text(marker, marker_style());
            }
            #[allow(unreachable_patterns)]
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::HtmlBlock => self.start_block(),
            Tag::Heading { level, .. } => {
                self.start_block();
                let depth = heading_depth(level);
                self.styles.push(heading_style(depth));
                let style = self.style();
                self.push_text(&format!("{} ", "#".repeat(depth)), style);
            }
            Tag::BlockQuote => {
                self.start_block();
                self.containers.push(Container::Quote);
                self.styles.push(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(_) => {
                self.start_block();
                self.code_block = Some(String::new());
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                } else {
                    self.flush_line();
                    self.needs_blank = false;
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_line();
                let marker = match self.lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{}. ", number);
                        *number += 1;
                        marker
                    }
                    _ => "- ".to_string(),
                };
                self.containers.push(Container::Item {
                    indent: marker.chars().count(),
                    marker: Some(marker),
                });
            }
            Tag::FootnoteDefinition(label) => {
                self.start_block();
                self.push_text(&format!("[{}]: ", label), marker_style());
            }
            Tag::Table(alignments) => {
                self.start_block();
                self.table = Some(TableState::new(alignments));
            }
            Tag::Emphasis => self
                .styles
                .push(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.styles.push(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self
                .styles
                .push(Style::default().add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { dest_url, .. } => {
                self.styles.push(link_style());
                self.links.push(LinkState {
                    dest: dest_url.to_string(),
                    text: String::new(),
                });
            }
            Tag::Image { dest_url, .. } => {
                self.links.push(LinkState {
                    dest: dest_url.to_string(),
                    text: String::new(),
                });
                self.styles.push(image_style());
                let style = self.style();
                self.push_text("[image: ", style);
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::HtmlBlock | TagEnd::FootnoteDefinition => {
                self.end_block()
            }
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.end_block();
            }
            TagEnd::BlockQuote => {
                self.flush_line();
                self.styles.pop();
                self.containers.pop();
                self.needs_blank = true;
            }
            TagEnd::CodeBlock => self.finish_code_block(),
            TagEnd::List(_) => {
                self.flush_line();
                self.lists.pop();
                self.needs_blank = self.lists.is_empty();
            }
            TagEnd::Item => {
                self.flush_line();
                // An empty item still shows its marker.
                let marker_pending = matches!(
                    self.containers.last(),
                    Some(Container::Item {
                        marker: Some(_),
                        ..
                    })
                );
                if marker_pending {
                    self.emit_line(true);
                }
                self.containers.pop();
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.end_cell();
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.end_row();
                    table.header_rows = table.rows.len();
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.end_row();
                }
            }
            TagEnd::Table => self.finish_table(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(link) = self.links.pop() {
                    if !link.dest.is_empty() && link.text != link.dest {
                        self.push_text(&format!(" ({})", link.dest), url_style());
                    }
                }
            }
            TagEnd::Image => {
                let style = self.style();
                self.styles.pop();
                if let Some(link) = self.links.pop() {
                    self.push_text("]", style);
                    if !link.dest.is_empty() {
                        self.push_text(&format!(" ({})", link.dest), url_style());
                    }
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = self.code_block.as_mut() {
            code.push_str(text);
            return;
        }
        let style = self.style();
        self.push_text(text, style);
    }

    fn html(&mut self, html: &str) {
        for (i, part) in html.split('\n').enumerate() {
            if i > 0 {
                self.flush_line();
            }
            if !part.is_empty() {
                self.push_text(part, html_style());
            }
        }
    }

    fn rule(&mut self) {
        self.start_block();
        self.current
            .push(Span::styled("─".repeat(RULE_WIDTH), rule_style()));
        self.emit_line(true);
        self.needs_blank = true;
    }

    fn finish_code_block(&mut self) {
        let code = self.code_block.take().unwrap_or_default();
        for line in code.lines() {
            self.current.push(Span::raw(CODE_INDENT));
            if !line.is_empty() {
                self.current
                    .push(Span::styled(line.to_string(), code_block_style()));
            }
            self.emit_line(true);
        }
        self.needs_blank = true;
    }

    fn finish_table(&mut self) {
        let Some(table) = self.table.take() else {
            return;
        };
        let widths = table.column_widths();

        for (i, row) in table.rows.iter().enumerate() {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(col, width)| {
                    let cell = row.get(col).map(String::as_str).unwrap_or("");
                    let alignment = table.alignments.get(col).copied().unwrap_or(Alignment::None);
                    pad_cell(cell, *width, alignment)
                })
                .collect();
            let style = if i < table.header_rows {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            self.current
                .push(Span::styled(cells.join(" │ ").trim_end().to_string(), style));
            self.emit_line(true);

            if i + 1 == table.header_rows {
                let rule = widths
                    .iter()
                    .map(|width| "─".repeat(*width))
                    .collect::<Vec<_>>()
                    .join("─┼─");
                self.current.push(Span::styled(rule, rule_style()));
                self.emit_line(true);
            }
        }
        self.needs_blank = true;
    }

    fn style(&self) -> Style {
        self.styles
            .iter()
            .fold(Style::default(), |acc, style| acc.patch(*style))
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if let Some(link) = self.links.last_mut() {
            link.text.push_str(text);
        }
        if let Some(table) = self.table.as_mut() {
            table.cell.push_str(text);
            return;
        }
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn start_block(&mut self) {
        self.flush_line();
        if self.needs_blank && !self.lines.is_empty() {
            self.blank_line();
        }
        self.needs_blank = false;
    }

    fn end_block(&mut self) {
        self.flush_line();
        self.needs_blank = true;
    }

    fn flush_line(&mut self) {
        self.emit_line(false);
    }

    /// Push the pending spans as a line behind the container prefixes.
    /// Without `force` nothing happens when there is nothing pending.
    fn emit_line(&mut self, force: bool) {
        if self.current.is_empty() && !force {
            return;
        }

        let mut spans = Vec::with_capacity(self.containers.len() + self.current.len());
        for container in self.containers.iter_mut() {
            match container {
                Container::Quote => spans.push(Span::styled(QUOTE_PREFIX, quote_style())),
                Container::Item { indent, marker } => match marker.take() {
                    Some(marker) => spans.push(Span::styled(marker, marker_style())),
                    None => spans.push(Span::raw(" ".repeat(*indent))),
                },
            }
        }
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn blank_line(&mut self) {
        let prefix: String = self
            .containers
            .iter()
            .map(|container| match container {
                Container::Quote => QUOTE_PREFIX.to_string(),
                Container::Item { indent, .. } => " ".repeat(*indent),
            })
            .collect();
        let prefix = prefix.trim_end();

        if prefix.is_empty() {
            self.lines.push(Line::default());
        } else {
            self.lines
                .push(Line::from(Span::styled(prefix.to_string(), quote_style())));
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush_line();
        Text::from(self.lines)
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn pad_cell(cell: &str, width: usize, alignment: Alignment) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    match alignment {
        Alignment::Right => format!("{}{}", " ".repeat(fill), cell),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), cell, " ".repeat(fill - left))
        }
        Alignment::Left | Alignment::None => format!("{}{}", cell, " ".repeat(fill)),
    }
}

fn heading_style(depth: usize) -> Style {
    let style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    if depth == 1 {
        style.add_modifier(Modifier::UNDERLINED)
    } else {
        style
    }
}

fn link_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::UNDERLINED)
}

fn url_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn image_style() -> Style {
    Style::default().fg(Color::Cyan)
}

fn inline_code_style() -> Style {
    Style::default().fg(ACCENT)
}

fn code_block_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn quote_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn marker_style() -> Style {
    Style::default().fg(ACCENT)
}

fn rule_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn html_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
