//! # MessageBox Component
//!
//! Multi-line editor for the SMS body, with a live `N/limit` counter.
//!
//! ## State Management
//!
//! The message text is a prop owned by the draft. The component only keeps
//! the cursor and scroll position, and every edit emits the complete new
//! text for the parent to apply. Because the text can change underneath it,
//! the cursor is clamped to a valid char boundary before each use.
//!
//! The counter turns yellow past 80% of the limit and red past the limit,
//! where a warning explains the message will go out as MMS.

mod wrap;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::core::summary;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use wrap::{
    HORIZONTAL_OVERHEAD, VERTICAL_OVERHEAD, inner_width, locate, next_char_boundary,
    offset_at_column, prev_char_boundary, rows,
};

pub const OVER_LIMIT_WARNING: &str =
    "El mensaje excede el límite de caracteres para SMS. Se enviará como MMS.";

#[derive(Debug, Clone, PartialEq)]
pub enum MessageEvent {
    Changed(String),
}

/// Cursor and scroll state, kept across frames.
pub struct MessageBoxState {
    /// Byte offset into the message. Starts past the end so the cursor
    /// lands after the initial text.
    cursor: usize,
    scroll: u16,
    /// Inner width from the last render, for vertical movement.
    last_width: u16,
}

impl Default for MessageBoxState {
    fn default() -> Self {
        Self {
            cursor: usize::MAX,
            scroll: 0,
            last_width: 40,
        }
    }
}

impl MessageBoxState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MessageBox<'a> {
    state: &'a mut MessageBoxState,
    message: &'a str,
    max_characters: usize,
    focused: bool,
}

impl<'a> MessageBox<'a> {
    pub fn new(
        state: &'a mut MessageBoxState,
        message: &'a str,
        max_characters: usize,
        focused: bool,
    ) -> Self {
        Self {
            state,
            message,
            max_characters,
            focused,
        }
    }

    /// Cursor clamped into the current message, on a char boundary.
    fn cursor(&mut self) -> usize {
        let mut pos = self.state.cursor.min(self.message.len());
        while !self.message.is_char_boundary(pos) {
            pos -= 1;
        }
        self.state.cursor = pos;
        pos
    }

    fn insert(&mut self, text: &str) -> Option<MessageEvent> {
        if text.is_empty() {
            return None;
        }
        let pos = self.cursor();
        let mut updated = String::with_capacity(self.message.len() + text.len());
        updated.push_str(&self.message[..pos]);
        updated.push_str(text);
        updated.push_str(&self.message[pos..]);
        self.state.cursor = pos + text.len();
        Some(MessageEvent::Changed(updated))
    }

    fn remove(&mut self, start: usize, end: usize) -> Option<MessageEvent> {
        if start == end {
            return None;
        }
        let mut updated = String::with_capacity(self.message.len());
        updated.push_str(&self.message[..start]);
        updated.push_str(&self.message[end..]);
        self.state.cursor = start;
        Some(MessageEvent::Changed(updated))
    }

    fn move_vertically(&mut self, down: bool) {
        let pos = self.cursor();
        let rows = rows(self.message, self.state.last_width);
        let (row, column) = locate(self.message, &rows, pos);
        let target = if down {
            row + 1
        } else if row == 0 {
            return;
        } else {
            row - 1
        };
        if let Some(target) = rows.get(target) {
            self.state.cursor = offset_at_column(self.message, *target, column);
        }
    }

    fn counter(&self) -> Span<'static> {
        let count = summary::character_count(self.message);
        let style = if summary::is_over_limit(count, self.max_characters) {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if summary::is_near_limit(count, self.max_characters) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!(" {}/{} ", count, self.max_characters), style)
    }
}

impl Component for MessageBox<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let over = summary::is_over_limit(
            summary::character_count(self.message),
            self.max_characters,
        );
        let warning_height = if over { 2 } else { 0 };
        let [editor_area, warning_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(warning_height)])
                .areas(area);

        let width = inner_width(editor_area.width);
        let visible = editor_area.height.saturating_sub(VERTICAL_OVERHEAD).max(1);
        self.state.last_width = width;

        let pos = self.cursor();
        let rows = rows(self.message, width);
        let (cursor_row, cursor_col) = locate(self.message, &rows, pos);
        let cursor_row = cursor_row as u16;

        // Keep the cursor row in view
        if cursor_row < self.state.scroll {
            self.state.scroll = cursor_row;
        } else if cursor_row >= self.state.scroll + visible {
            self.state.scroll = cursor_row + 1 - visible;
        }

        let message = self.message;
        let lines: Vec<Line> = rows
            .iter()
            .skip(self.state.scroll as usize)
            .take(visible as usize)
            .map(|r| Line::raw(&message[r.start..r.end]))
            .collect();

        let border = if self.focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(" Mensaje ")
            .title_bottom(Line::from(self.counter()).right_aligned());
        frame.render_widget(Paragraph::new(lines).block(block), editor_area);

        if over {
            let warning = Paragraph::new(Line::from(vec![
                Span::styled("⚠ ", Style::default().fg(Color::Red)),
                Span::styled(OVER_LIMIT_WARNING, Style::default().fg(Color::Red)),
            ]))
            .wrap(Wrap { trim: true });
            frame.render_widget(warning, warning_area);
        }

        if self.focused {
            let x = editor_area.x + HORIZONTAL_OVERHEAD / 2 + cursor_col.min(width);
            let y = editor_area.y + VERTICAL_OVERHEAD / 2 + (cursor_row - self.state.scroll);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for MessageBox<'_> {
    type Event = MessageEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let pos = self.cursor();
        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf))
            }
            TuiEvent::Paste(text) => {
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert(&normalized)
            }
            TuiEvent::Backspace => {
                let prev = prev_char_boundary(self.message, pos);
                self.remove(prev, pos)
            }
            TuiEvent::Delete => {
                let next = next_char_boundary(self.message, pos);
                self.remove(pos, next)
            }
            TuiEvent::CursorLeft => {
                self.state.cursor = prev_char_boundary(self.message, pos);
                None
            }
            TuiEvent::CursorRight => {
                self.state.cursor = next_char_boundary(self.message, pos);
                None
            }
            TuiEvent::CursorHome => {
                self.state.cursor = self.message[..pos].rfind('\n').map_or(0, |i| i + 1);
                None
            }
            TuiEvent::CursorEnd => {
                self.state.cursor = self.message[pos..]
                    .find('\n')
                    .map_or(self.message.len(), |i| pos + i);
                None
            }
            TuiEvent::CursorUp => {
                self.move_vertically(false);
                None
            }
            TuiEvent::CursorDown => {
                self.move_vertically(true);
                None
            }
            // Enter starts a new line; the send shortcut is global
            TuiEvent::Submit => self.insert("\n"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    /// Feed events, applying each emitted change like the parent would.
    fn apply(state: &mut MessageBoxState, message: &mut String, events: &[TuiEvent]) {
        for event in events {
            let emitted = MessageBox::new(state, message, 160, true).handle_event(event);
            if let Some(MessageEvent::Changed(text)) = emitted {
                *message = text;
            }
        }
    }

    #[test]
    fn test_typing_appends_after_initial_text() {
        let mut state = MessageBoxState::new();
        let mut message = "Hola".to_string();
        apply(
            &mut state,
            &mut message,
            &[TuiEvent::InputChar(' '), TuiEvent::InputChar('ñ')],
        );
        assert_eq!(message, "Hola ñ");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut state = MessageBoxState::new();
        let mut message = "ac".to_string();
        apply(
            &mut state,
            &mut message,
            &[TuiEvent::CursorLeft, TuiEvent::InputChar('b')],
        );
        assert_eq!(message, "abc");
    }

    #[test]
    fn test_backspace_and_delete_multibyte() {
        let mut state = MessageBoxState::new();
        let mut message = "¡Sí!".to_string();
        apply(
            &mut state,
            &mut message,
            &[TuiEvent::CursorLeft, TuiEvent::Backspace],
        );
        assert_eq!(message, "¡S!");
        apply(&mut state, &mut message, &[TuiEvent::CursorHome, TuiEvent::Delete]);
        assert_eq!(message, "S!");
    }

    #[test]
    fn test_backspace_at_start_emits_nothing() {
        let mut state = MessageBoxState::new();
        let mut box_ = MessageBox::new(&mut state, "", 160, true);
        assert_eq!(box_.handle_event(&TuiEvent::Backspace), None);
        assert_eq!(box_.handle_event(&TuiEvent::Delete), None);
    }

    #[test]
    fn test_enter_inserts_newline_and_paste_normalizes() {
        let mut state = MessageBoxState::new();
        let mut message = "a".to_string();
        apply(
            &mut state,
            &mut message,
            &[TuiEvent::Submit, TuiEvent::Paste("b\r\nc".into())],
        );
        assert_eq!(message, "a\nb\nc");
    }

    #[test]
    fn test_cursor_survives_external_shrink() {
        let mut state = MessageBoxState::new();
        let mut message = "a long message".to_string();
        apply(&mut state, &mut message, &[TuiEvent::CursorEnd]);
        let mut short = "ok".to_string();
        apply(&mut state, &mut short, &[TuiEvent::InputChar('!')]);
        assert_eq!(short, "ok!");
    }

    #[test]
    fn test_vertical_movement_clamps_to_shorter_row() {
        let mut state = MessageBoxState::new();
        let mut message = "abcd\nxy\nefgh".to_string();
        apply(
            &mut state,
            &mut message,
            &[TuiEvent::CursorUp, TuiEvent::CursorUp, TuiEvent::InputChar('-')],
        );
        // End of "efgh" clamps to the end of "xy", then column 2 of "abcd"
        assert_eq!(message, "ab-cd\nxy\nefgh");
    }

    #[test]
    fn test_render_counter_and_warning() {
        let mut state = MessageBoxState::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();

        terminal
            .draw(|f| MessageBox::new(&mut state, "Hola", 160, true).render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("4/160"));
        assert!(!text.contains("excede"));

        let long = "x".repeat(161);
        terminal
            .draw(|f| MessageBox::new(&mut state, &long, 160, true).render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("161/160"));
        assert!(text.contains("excede el límite"));
    }

    #[test]
    fn test_counter_colors() {
        let mut state = MessageBoxState::new();
        let near = "x".repeat(129);
        let counter = MessageBox::new(&mut state, &near, 160, false).counter();
        assert_eq!(counter.style.fg, Some(Color::Yellow));

        let fine = "x".repeat(128);
        let counter = MessageBox::new(&mut state, &fine, 160, false).counter();
        assert_eq!(counter.style.fg, Some(Color::DarkGray));
    }
}
