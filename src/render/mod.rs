//! Turning note text into something to look at.

mod markdown;

pub use markdown::MarkdownRenderer;

use ratatui::style::Color;
use ratatui::text::Text;

/// Accent used for headings, links, list markers and inline code.
pub const ACCENT: Color = Color::Rgb(255, 102, 0);

/// Pure conversion from markup text to a visual tree.
pub trait MarkupRenderer {
    fn render(&self, text: &str) -> Text<'static>;
}

/// Flatten a rendered tree back into plain lines, dropping styles.
pub fn render_plain(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
