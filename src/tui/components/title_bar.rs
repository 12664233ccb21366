//! # TitleBar Component
//!
//! Two-line header: the application title with the latest status message on
//! the first line, the subtitle on the second.
//!
//! ## Design Decisions
//!
//! ### Stateless Component
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(&composer.status_message);
//! title_bar.render(frame, area);
//! ```
//!
//! ### Narrow terminals
//!
//! The status message is appended after a separator, so on a narrow terminal
//! it is the status that gets cut, never the title.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub const TITLE: &str = "Compositor SMS/MMS";
pub const SUBTITLE: &str = "Interfaz mejorada para envío de mensajes";

pub struct TitleBar<'a> {
    /// Latest status (e.g. "Borrador guardado"). Empty hides the separator.
    pub status_message: &'a str,
}

impl<'a> TitleBar<'a> {
    pub fn new(status_message: &'a str) -> Self {
        Self { status_message }
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut title = vec![Span::styled(
            TITLE,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];
        if !self.status_message.is_empty() {
            title.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            title.push(Span::styled(
                self.status_message.to_string(),
                Style::default().fg(Color::Yellow),
            ));
        }

        let lines = vec![
            Line::from(title),
            Line::from(Span::styled(SUBTITLE, Style::default().fg(Color::DarkGray))),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}
