//! # Contact Selector Component
//!
//! Searchable multi-select checklist over either contact lists or individual
//! contacts, with the current selection echoed as badges underneath.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ContactSelectorState` lives in `TuiState` and holds only the search
//!   query plus presentation state (highlighted row, last drawn list area)
//! - `ContactSelector` is created per frame/event with borrowed props
//!
//! The selection itself is a prop. Toggling a row emits the complete new
//! selection and the parent decides what to do with it.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};

use crate::core::catalog::{self, Catalog};
use crate::core::selection;
use crate::core::state::AudienceMode;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::search_box::{edit_query, render_search_box};
use crate::tui::event::TuiEvent;

/// Persistent state for one selector (one per audience mode).
#[derive(Default)]
pub struct ContactSelectorState {
    pub query: String,
    pub highlighted: usize,
    pub list_state: ListState,
    /// Inner list area from the last render, for mouse hit-testing.
    list_area: Option<Rect>,
}

impl ContactSelectorState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// The full selection after a toggle.
    Changed(Vec<String>),
}

/// One visible checklist row.
struct Row {
    id: String,
    title: String,
    detail: String,
}

pub struct ContactSelector<'a> {
    state: &'a mut ContactSelectorState,
    kind: AudienceMode,
    catalog: &'a Catalog,
    selected: &'a [String],
    focused: bool,
}

impl<'a> ContactSelector<'a> {
    pub fn new(
        state: &'a mut ContactSelectorState,
        kind: AudienceMode,
        catalog: &'a Catalog,
        selected: &'a [String],
        focused: bool,
    ) -> Self {
        Self {
            state,
            kind,
            catalog,
            selected,
            focused,
        }
    }

    fn rows(&self) -> Vec<Row> {
        match self.kind {
            AudienceMode::Lists => catalog::filter_lists(&self.catalog.lists, &self.state.query)
                .into_iter()
                .map(|l| Row {
                    id: l.id.clone(),
                    title: l.name.clone(),
                    detail: format!("{} contactos", l.count),
                })
                .collect(),
            AudienceMode::Individuals => {
                catalog::filter_contacts(&self.catalog.contacts, &self.state.query)
                    .into_iter()
                    .map(|c| Row {
                        id: c.id.clone(),
                        title: c.name.clone(),
                        detail: c.phone.clone(),
                    })
                    .collect()
            }
        }
    }

    /// Badge labels for the current selection, in selection order.
    /// Ids missing from the catalog get no badge.
    fn badges(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|id| match self.kind {
                AudienceMode::Lists => self
                    .catalog
                    .list(id)
                    .map(|l| format!("{} ({})", l.name, l.count)),
                AudienceMode::Individuals => self.catalog.contact(id).map(|c| c.name.clone()),
            })
            .collect()
    }

    fn toggle(&self, id: &str) -> SelectionEvent {
        SelectionEvent::Changed(selection::toggle(self.selected, id))
    }

    fn clamp_highlight(&mut self, len: usize) {
        self.state.highlighted = self.state.highlighted.min(len.saturating_sub(1));
    }

    fn placeholder(&self) -> &'static str {
        match self.kind {
            AudienceMode::Lists => "Buscar listas...",
            AudienceMode::Individuals => "Buscar contactos por nombre o teléfono...",
        }
    }

    fn help_text(&self) -> &'static str {
        match self.kind {
            AudienceMode::Lists => {
                "Selecciona una o varias listas. El mensaje se enviará a todos los contactos de cada lista seleccionada."
            }
            AudienceMode::Individuals => {
                "Selecciona uno o varios contactos individuales. El mensaje se enviará solo a ellos."
            }
        }
    }

    fn badge_heading(&self) -> &'static str {
        match self.kind {
            AudienceMode::Lists => "Listas seleccionadas:",
            AudienceMode::Individuals => "Contactos seleccionados:",
        }
    }
}

impl Component for ContactSelector<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rows = self.rows();
        self.clamp_highlight(rows.len());

        let badges = self.badges();
        let badge_height = if badges.is_empty() { 0 } else { 2 };

        let [search_area, help_area, list_area, badge_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(badge_height),
        ])
        .areas(area);

        render_search_box(frame, search_area, &self.state.query, self.placeholder(), self.focused);

        let help = Paragraph::new(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(help, help_area);

        let items: Vec<ListItem> = rows
            .iter()
            .map(|row| {
                let checked = selection::contains(self.selected, &row.id);
                let mark = if checked { "[x] " } else { "[ ] " };
                let mark_style = if checked {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, mark_style),
                    Span::styled(row.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(row.detail.clone(), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();

        let highlight = if self.focused {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let list = List::new(items).highlight_style(highlight);

        self.state
            .list_state
            .select((!rows.is_empty()).then_some(self.state.highlighted));
        frame.render_stateful_widget(list, list_area, &mut self.state.list_state);
        self.state.list_area = Some(list_area);

        if !badges.is_empty() {
            let mut spans = Vec::new();
            for badge in badges {
                spans.push(Span::styled(
                    format!(" {badge} "),
                    Style::default().fg(Color::Black).bg(Color::Gray),
                ));
                spans.push(Span::raw(" "));
            }
            let paragraph = Paragraph::new(vec![
                Line::from(Span::styled(
                    self.badge_heading(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(spans),
            ]);
            frame.render_widget(paragraph, badge_area);
        }
    }
}

impl EventHandler for ContactSelector<'_> {
    type Event = SelectionEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if edit_query(&mut self.state.query, event) {
            self.state.highlighted = 0;
            *self.state.list_state.offset_mut() = 0;
            return None;
        }

        let rows = self.rows();
        self.clamp_highlight(rows.len());

        match event {
            TuiEvent::CursorUp => {
                self.state.highlighted = self.state.highlighted.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                if !rows.is_empty() {
                    self.state.highlighted = (self.state.highlighted + 1).min(rows.len() - 1);
                }
                None
            }
            TuiEvent::Submit => rows
                .get(self.state.highlighted)
                .map(|row| self.toggle(&row.id)),
            TuiEvent::MouseClick(col, row) => {
                let area = self.state.list_area?;
                let inside = *col >= area.x
                    && *col < area.x + area.width
                    && *row >= area.y
                    && *row < area.y + area.height;
                if !inside {
                    return None;
                }
                let index = (*row - area.y) as usize + self.state.list_state.offset();
                let hit = rows.get(index)?;
                self.state.highlighted = index;
                Some(self.toggle(&hit.id))
            }
            _ => None,
        }
    }
}
