//! Single-line search field shared by the contact and product selectors.
//!
//! The query string is owned by the selector that embeds it; these helpers
//! only edit and draw it.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::event::TuiEvent;

/// Apply a text-editing event to `query`. Returns `true` if the query changed.
pub fn edit_query(query: &mut String, event: &TuiEvent) -> bool {
    match event {
        TuiEvent::InputChar(c) if *c != '\n' => {
            query.push(*c);
            true
        }
        TuiEvent::Paste(text) => {
            let first_line = text.lines().next().unwrap_or("");
            query.push_str(first_line);
            !first_line.is_empty()
        }
        TuiEvent::Backspace => query.pop().is_some(),
        _ => false,
    }
}

pub fn render_search_box(frame: &mut Frame, area: Rect, query: &str, placeholder: &str, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let content = if query.is_empty() {
        Line::from(vec![
            Span::styled("⌕ ", Style::default().fg(Color::DarkGray)),
            Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled("⌕ ", Style::default().fg(Color::DarkGray)),
            Span::raw(query.to_string()),
        ])
    };

    let paragraph = Paragraph::new(content).block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border),
    );
    frame.render_widget(paragraph, area);

    if focused && area.height >= 3 {
        // Border (1) + icon (2)
        let x = area.x + 3 + query.width() as u16;
        if x < area.x + area.width.saturating_sub(1) {
            frame.set_cursor_position((x, area.y + 1));
        }
    }
}
