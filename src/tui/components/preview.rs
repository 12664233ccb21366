//! Phone-style rendering of the message as a recipient would see it.
//!
//! Used by the live preview in the sidebar and by the full-screen overlay.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::image;
use crate::tui::component::Component;

pub struct MessagePreview<'a> {
    pub message: &'a str,
    pub image: Option<&'a str>,
    /// Local time shown under the bubble, `HH:MM:SS`.
    pub time: String,
}

impl<'a> MessagePreview<'a> {
    pub fn new(message: &'a str, image: Option<&'a str>, time: String) -> Self {
        Self {
            message,
            image,
            time,
        }
    }

    /// Bubble content wrapped to `width` columns.
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let width = usize::from(width.max(1));
        let bubble = Style::default().fg(Color::White).bg(Color::Blue);
        let mut lines = Vec::new();

        if let Some(reference) = self.image {
            lines.push(Line::from(Span::styled(
                format!("🖼 {}", image::describe_reference(reference)),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            )));
        }

        if self.message.is_empty() {
            lines.push(Line::from(Span::styled(
                "(mensaje vacío)",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            for paragraph in self.message.split('\n') {
                if paragraph.is_empty() {
                    lines.push(Line::default());
                    continue;
                }
                for row in textwrap::wrap(paragraph, width) {
                    lines.push(Line::from(Span::styled(row.into_owned(), bubble)));
                }
            }
        }

        lines.push(Line::from(Span::styled(
            self.time.clone(),
            Style::default().fg(Color::DarkGray),
        )));
        lines
    }
}

impl Component for MessagePreview<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Vista previa ");
        let inner = block.inner(area);
        let lines = self.lines(inner.width);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
