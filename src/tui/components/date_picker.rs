//! # Date Picker Component
//!
//! A trigger field showing the chosen expiration date (or a placeholder)
//! that opens a calendar popover with two quick picks.
//!
//! The trigger renders in the form flow; the popover is drawn separately by
//! `render_popover` after everything else so it floats on top.
//!
//! Keys while the popover is open: arrows move by day/week, PgUp/PgDn by
//! month, Enter picks the highlighted day, `7` and `m` are the quick picks,
//! Esc closes.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::core::expiration;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const PLACEHOLDER: &str = "Selecciona una fecha";
const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Popover size: 7 columns of 3 cells plus borders; title, weekday header,
/// six weeks, a separator and the quick pick rows.
pub const POPOVER_WIDTH: u16 = 26;
pub const POPOVER_HEIGHT: u16 = 13;

pub struct DatePickerState {
    pub open: bool,
    /// Highlighted day in the calendar grid.
    pub cursor: NaiveDate,
}

impl DatePickerState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            open: false,
            cursor: today,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DateEvent {
    Changed(NaiveDate),
}

pub struct DatePicker<'a> {
    state: &'a mut DatePickerState,
    selected: Option<NaiveDate>,
    now: NaiveDateTime,
    focused: bool,
}

impl<'a> DatePicker<'a> {
    pub fn new(
        state: &'a mut DatePickerState,
        selected: Option<NaiveDate>,
        now: NaiveDateTime,
        focused: bool,
    ) -> Self {
        Self {
            state,
            selected,
            now,
            focused,
        }
    }

    fn open(&mut self) {
        let tomorrow = self
            .now
            .date()
            .checked_add_days(Days::new(1))
            .unwrap_or(self.now.date());
        self.state.cursor = self.selected.unwrap_or(tomorrow);
        self.state.open = true;
    }

    fn move_days(&mut self, delta: i64) {
        let moved = if delta >= 0 {
            self.state.cursor.checked_add_days(Days::new(delta as u64))
        } else {
            self.state.cursor.checked_sub_days(Days::new(delta.unsigned_abs()))
        };
        if let Some(day) = moved {
            self.state.cursor = day;
        }
    }

    fn move_months(&mut self, forward: bool) {
        let moved = if forward {
            self.state.cursor.checked_add_months(Months::new(1))
        } else {
            self.state.cursor.checked_sub_months(Months::new(1))
        };
        if let Some(day) = moved {
            self.state.cursor = day;
        }
    }

    fn quick_pick(&mut self, day: NaiveDate) -> Option<DateEvent> {
        self.state.cursor = day;
        Some(DateEvent::Changed(day))
    }

    /// Draw the calendar popover anchored below `anchor`, kept inside `bounds`.
    pub fn render_popover(&mut self, frame: &mut Frame, anchor: Rect, bounds: Rect) {
        if !self.state.open {
            return;
        }

        let width = POPOVER_WIDTH.min(bounds.width);
        let height = POPOVER_HEIGHT.min(bounds.height);
        let x = anchor.x.min((bounds.x + bounds.width).saturating_sub(width));
        let below = anchor.y + anchor.height;
        let y = if below + height <= bounds.y + bounds.height {
            below
        } else {
            (bounds.y + bounds.height).saturating_sub(height)
        };
        let area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, area);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.state.cursor.format("%B %Y")));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [header_area, grid_area, quick_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Length(3),
        ])
        .areas(inner);

        let header: Vec<Span> = WEEKDAYS
            .iter()
            .map(|d| Span::styled(format!("{d} "), Style::default().fg(Color::DarkGray)))
            .collect();
        frame.render_widget(Paragraph::new(Line::from(header)), header_area);

        frame.render_widget(Paragraph::new(self.calendar_lines()), grid_area);

        let quick = vec![
            Line::from(Span::styled(
                "Accesos rápidos:",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(" 7 ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" 7 días  "),
                Span::styled(" m ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" 1 mes"),
            ]),
        ];
        frame.render_widget(Paragraph::new(quick), quick_area);
    }

    /// Six week rows for the month containing the cursor.
    fn calendar_lines(&self) -> Vec<Line<'static>> {
        let first = expiration::month_start(self.state.cursor);
        let offset = first.weekday().num_days_from_sunday() as usize;
        let days = expiration::days_in_month(first) as usize;

        let mut lines = Vec::new();
        let mut spans = vec![Span::raw("   "); offset];
        let mut column = offset;
        for n in 0..days {
            let Some(day) = first.checked_add_days(Days::new(n as u64)) else {
                break;
            };
            spans.push(Span::styled(format!("{:>2}", day.day()), self.day_style(day)));
            spans.push(Span::raw(" "));
            column += 1;
            if column == 7 {
                lines.push(Line::from(std::mem::take(&mut spans)));
                column = 0;
            }
        }
        if !spans.is_empty() {
            lines.push(Line::from(spans));
        }
        lines
    }

    fn day_style(&self, day: NaiveDate) -> Style {
        let mut style = if !expiration::is_selectable(day, self.now) {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else if Some(day) == self.selected {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };
        if day == self.state.cursor {
            style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }
        style
    }
}

impl Component for DatePicker<'_> {
    /// Render the trigger field.
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let text = match self.selected {
            Some(day) => Span::raw(expiration::format_display(day)),
            None => Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        };

        let trigger = Paragraph::new(Line::from(vec![Span::raw("📅 "), text])).block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(border),
        );
        frame.render_widget(trigger, area);
    }
}

impl EventHandler for DatePicker<'_> {
    type Event = DateEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if !self.state.open {
            if matches!(event, TuiEvent::Submit | TuiEvent::InputChar(' ')) {
                self.open();
            }
            return None;
        }

        let today = self.now.date();
        match event {
            TuiEvent::Escape => {
                self.state.open = false;
                None
            }
            TuiEvent::CursorLeft => {
                self.move_days(-1);
                None
            }
            TuiEvent::CursorRight => {
                self.move_days(1);
                None
            }
            TuiEvent::CursorUp => {
                self.move_days(-7);
                None
            }
            TuiEvent::CursorDown => {
                self.move_days(7);
                None
            }
            TuiEvent::PageUp => {
                self.move_months(false);
                None
            }
            TuiEvent::PageDown => {
                self.move_months(true);
                None
            }
            TuiEvent::Submit => {
                let day = self.state.cursor;
                if expiration::is_selectable(day, self.now) {
                    self.state.open = false;
                    Some(DateEvent::Changed(day))
                } else {
                    None
                }
            }
            TuiEvent::InputChar('7') => self.quick_pick(expiration::plus_seven_days(today)),
            TuiEvent::InputChar('m') | TuiEvent::InputChar('M') => {
                self.quick_pick(expiration::plus_one_month(today))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_enter_opens_on_tomorrow() {
        let mut state = DatePickerState::new(now().date());
        let mut picker = DatePicker::new(&mut state, None, now(), true);
        assert_eq!(picker.handle_event(&TuiEvent::Submit), None);
        assert!(state.open);
        assert_eq!(state.cursor, day(10, 17));
    }

    #[test]
    fn test_pick_future_day_closes() {
        let mut state = DatePickerState::new(now().date());
        let mut picker = DatePicker::new(&mut state, None, now(), true);
        picker.handle_event(&TuiEvent::Submit);
        picker.handle_event(&TuiEvent::CursorDown);
        let event = picker.handle_event(&TuiEvent::Submit);
        assert_eq!(event, Some(DateEvent::Changed(day(10, 24))));
        assert!(!state.open);
    }

    #[test]
    fn test_past_day_cannot_be_picked() {
        let mut state = DatePickerState::new(now().date());
        let mut picker = DatePicker::new(&mut state, None, now(), true);
        picker.handle_event(&TuiEvent::Submit);
        picker.handle_event(&TuiEvent::CursorLeft); // today, already past
        assert_eq!(picker.handle_event(&TuiEvent::Submit), None);
        picker.handle_event(&TuiEvent::PageUp);
        assert_eq!(picker.handle_event(&TuiEvent::Submit), None);
        assert!(state.open);
    }

    #[test]
    fn test_quick_picks_keep_popover_open() {
        let mut state = DatePickerState::new(now().date());
        let mut picker = DatePicker::new(&mut state, None, now(), true);
        picker.handle_event(&TuiEvent::Submit);
        assert_eq!(
            picker.handle_event(&TuiEvent::InputChar('7')),
            Some(DateEvent::Changed(day(10, 23)))
        );
        assert_eq!(
            picker.handle_event(&TuiEvent::InputChar('m')),
            Some(DateEvent::Changed(day(11, 16)))
        );
        assert!(state.open);
    }

    #[test]
    fn test_escape_closes() {
        let mut state = DatePickerState::new(now().date());
        let mut picker = DatePicker::new(&mut state, None, now(), true);
        picker.handle_event(&TuiEvent::Submit);
        picker.handle_event(&TuiEvent::Escape);
        assert!(!state.open);
    }

    #[test]
    fn test_trigger_shows_placeholder_or_date() {
        let mut state = DatePickerState::new(now().date());
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();

        terminal
            .draw(|f| DatePicker::new(&mut state, None, now(), false).render(f, f.area()))
            .unwrap();
        assert!(buffer_text(&terminal).contains(PLACEHOLDER));

        terminal
            .draw(|f| {
                DatePicker::new(&mut state, Some(day(10, 23)), now(), false).render(f, f.area())
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("October 23rd, 2026"));
    }

    #[test]
    fn test_popover_renders_month() {
        let mut state = DatePickerState::new(now().date());
        state.open = true;
        state.cursor = day(10, 20);
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();

        terminal
            .draw(|f| {
                let area = f.area();
                DatePicker::new(&mut state, None, now(), true).render_popover(
                    f,
                    Rect::new(0, 0, 30, 3),
                    area,
                );
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("October 2026"));
        assert!(text.contains("Su Mo Tu"));
        assert!(text.contains("31"));
        assert!(text.contains("7 días"));
    }
}
