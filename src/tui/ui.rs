//! Screen layout for the composer.
//!
//! ```text
//! ┌ title + subtitle ──────────────────────────────────────────┐
//! │ ✓ Audiencia ── 2 Mensaje ── 3 Configuración ── ✓ Contenido │
//! ├ form (accordion) ─────────────────┬ sidebar ───────────────┤
//! │ 1 Seleccionar Audiencia  (open)   │ Vista previa           │
//! │ 2 Mensaje SMS            (summary)│ Estimación de Costo    │
//! │ 3 Configuración          (summary)│ Acciones               │
//! │ 4 Imagen MMS (Opcional)  (summary)│                        │
//! ├ key help ─────────────────────────┴────────────────────────┤
//! ```
//!
//! The card holding the focused section is expanded; the others collapse to
//! a one-line summary so the whole draft stays visible on small terminals.

use chrono::NaiveDateTime;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::core::expiration;
use crate::core::image;
use crate::core::state::{AudienceMode, Composer};
use crate::core::summary::{self, Step, Summary};
use crate::tui::component::Component;
use crate::tui::components::{
    ContactSelector, DatePicker, FullPreview, ImageUploader, MessageBox, MessagePreview,
    ProductSelector, TitleBar,
};
use crate::tui::{ActionButton, Focus, TuiState};

/// Form cards, in display order. Configuration holds two focus sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Card {
    Audience,
    Message,
    Configuration,
    Image,
}

impl Card {
    const ALL: [Card; 4] = [Card::Audience, Card::Message, Card::Configuration, Card::Image];

    fn of(focus: Focus) -> Option<Card> {
        match focus {
            Focus::Audience => Some(Card::Audience),
            Focus::Message => Some(Card::Message),
            Focus::Expiration | Focus::Product => Some(Card::Configuration),
            Focus::Image => Some(Card::Image),
            Focus::Actions => None,
        }
    }

    /// Section focused when a collapsed card is clicked.
    fn first_focus(self) -> Focus {
        match self {
            Card::Audience => Focus::Audience,
            Card::Message => Focus::Message,
            Card::Configuration => Focus::Expiration,
            Card::Image => Focus::Image,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Card::Audience => " 1 Seleccionar Audiencia ",
            Card::Message => " 2 Mensaje SMS ",
            Card::Configuration => " 3 Configuración ",
            Card::Image => " 4 Imagen MMS (Opcional) ",
        }
    }
}

/// What a mouse click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Section(Focus),
    Button(ActionButton),
}

pub fn draw_ui(frame: &mut Frame, composer: &Composer, tui: &mut TuiState, now: NaiveDateTime) {
    use Constraint::{Length, Min, Percentage};

    let summary = Summary::of(composer);
    tui.section_areas.clear();
    tui.button_areas.clear();

    let [title_area, steps_area, body_area, help_area] =
        Layout::vertical([Length(2), Length(1), Min(0), Length(1)]).areas(frame.area());

    TitleBar::new(&composer.status_message).render(frame, title_area);
    draw_steps(frame, steps_area, &summary);

    let [form_area, sidebar_area] =
        Layout::horizontal([Percentage(62), Percentage(38)]).areas(body_area);

    let trigger = draw_form(frame, form_area, composer, tui, &summary, now);
    draw_sidebar(frame, sidebar_area, composer, tui, &summary, now);
    draw_help(frame, help_area, tui.focus);

    // Popovers go last so they sit above everything else
    if let Some(trigger) = trigger
        && tui.focus == Focus::Expiration
    {
        let bounds = frame.area();
        DatePicker::new(&mut tui.date_picker, composer.draft.expiration, now, true)
            .render_popover(frame, trigger, bounds);
    }

    if composer.draft.show_full_preview {
        FullPreview::new(composer, clock(now)).render(frame, frame.area());
    }
}

fn clock(now: NaiveDateTime) -> String {
    now.format("%H:%M:%S").to_string()
}

fn draw_steps(frame: &mut Frame, area: Rect, summary: &Summary) {
    let mut spans = Vec::new();
    for (index, (step, done)) in summary.steps.iter().enumerate() {
        let style = if *done {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let badge = if *done {
            "✓".to_string()
        } else {
            step.number().to_string()
        };
        spans.push(Span::styled(format!(" {badge} "), style.add_modifier(Modifier::REVERSED)));
        spans.push(Span::styled(format!(" {}", step.title()), style));
        if index + 1 < Step::ALL.len() {
            let connector = if *done { Color::Green } else { Color::DarkGray };
            spans.push(Span::styled(" ── ", Style::default().fg(connector)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn card_block(card: Card, focused: bool) -> Block<'static> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            card.title(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
}

/// Draw the accordion. Returns the date trigger area when it is visible.
fn draw_form(
    frame: &mut Frame,
    area: Rect,
    composer: &Composer,
    tui: &mut TuiState,
    summary: &Summary,
    now: NaiveDateTime,
) -> Option<Rect> {
    let expanded = Card::of(tui.focus);
    let constraints = Card::ALL.map(|card| {
        if Some(card) == expanded {
            Constraint::Min(6)
        } else {
            Constraint::Length(3)
        }
    });
    // With nothing expanded the cards stack at the top
    let areas = if expanded.is_some() {
        Layout::vertical(constraints).split(area)
    } else {
        let mut stacked = constraints.to_vec();
        stacked.push(Constraint::Min(0));
        Layout::vertical(stacked).split(area)
    };

    let mut trigger = None;
    for (card, card_area) in Card::ALL.into_iter().zip(areas.iter().copied()) {
        if Some(card) != expanded {
            draw_collapsed(frame, card_area, card, composer, summary);
            tui.section_areas.push((card.first_focus(), card_area));
            continue;
        }

        let block = card_block(card, true);
        let inner = block.inner(card_area);
        frame.render_widget(block, card_area);

        match card {
            Card::Audience => {
                draw_audience(frame, inner, composer, tui, summary);
                tui.section_areas.push((Focus::Audience, card_area));
            }
            Card::Message => {
                MessageBox::new(
                    &mut tui.message_box,
                    &composer.draft.message,
                    composer.max_characters,
                    true,
                )
                .render(frame, inner);
                tui.section_areas.push((Focus::Message, card_area));
            }
            Card::Configuration => {
                trigger = Some(draw_configuration(frame, inner, composer, tui, now));
            }
            Card::Image => {
                ImageUploader::new(&mut tui.image, composer.draft.image.as_deref(), true)
                    .render(frame, inner);
                tui.section_areas.push((Focus::Image, card_area));
            }
        }
    }
    trigger
}

fn draw_audience(
    frame: &mut Frame,
    area: Rect,
    composer: &Composer,
    tui: &mut TuiState,
    summary: &Summary,
) {
    let banner_height = if summary.recipients > 0 { 1 } else { 0 };
    let [tabs_area, selector_area, banner_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(banner_height),
    ])
    .areas(area);

    let mode = composer.draft.audience;
    let tab = |tab_mode: AudienceMode| {
        let style = if tab_mode == mode {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(format!(" {} ", tab_mode.label()), style)
    };
    let tabs = Line::from(vec![
        tab(AudienceMode::Lists),
        Span::raw("  "),
        tab(AudienceMode::Individuals),
        Span::styled("   ←/→ cambiar", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(tabs), tabs_area);

    let state = match mode {
        AudienceMode::Lists => &mut tui.lists,
        AudienceMode::Individuals => &mut tui.contacts,
    };
    ContactSelector::new(
        state,
        mode,
        &composer.catalog,
        composer.draft.active_selection(),
        true,
    )
    .render(frame, selector_area);

    if summary.recipients > 0 {
        let banner = Line::from(vec![
            Span::styled("Total de destinatarios: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                summary.recipients.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(banner), banner_area);
    }
}

/// Date column and product column side by side. Returns the date trigger area.
fn draw_configuration(
    frame: &mut Frame,
    area: Rect,
    composer: &Composer,
    tui: &mut TuiState,
    now: NaiveDateTime,
) -> Rect {
    let [date_area, product_area] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .spacing(1)
            .areas(area);

    let label = |text: &'static str, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        Paragraph::new(Span::styled(text, style))
    };

    let date_focused = tui.focus == Focus::Expiration;
    let [date_label, trigger_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(date_area);
    frame.render_widget(label("Fecha de expiración", date_focused), date_label);
    DatePicker::new(&mut tui.date_picker, composer.draft.expiration, now, date_focused)
        .render(frame, trigger_area);
    frame.render_widget(
        Paragraph::new("Ejemplo: Oferta válida hasta 2025-07-22")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true }),
        hint_area,
    );
    tui.section_areas.push((Focus::Expiration, date_area));

    let product_focused = tui.focus == Focus::Product;
    let [product_label, selector_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(product_area);
    frame.render_widget(label("Producto Shopify", product_focused), product_label);
    ProductSelector::new(
        &mut tui.product,
        &composer.catalog,
        composer.draft.product_id.as_deref(),
        composer.draft.variant_id.as_deref(),
        product_focused,
    )
    .render(frame, selector_area);
    tui.section_areas.push((Focus::Product, product_area));

    trigger_area
}

/// One-line summary of a card that is not being edited.
fn collapsed_summary(card: Card, composer: &Composer, summary: &Summary) -> Line<'static> {
    let draft = &composer.draft;
    let muted = Style::default().fg(Color::DarkGray);
    match card {
        Card::Audience => Line::from(vec![
            Span::raw(format!("{}: ", draft.audience.label())),
            Span::raw(format!("{} seleccionados", draft.active_selection().len())),
            Span::styled(format!(" · {} destinatarios", summary.recipients), muted),
        ]),
        Card::Message => {
            let first_line = draft.message.lines().next().unwrap_or("");
            let count_style = if summary.over_limit {
                Style::default().fg(Color::Red)
            } else if summary.near_limit {
                Style::default().fg(Color::Yellow)
            } else {
                muted
            };
            Line::from(vec![
                Span::styled(
                    format!("{}/{} ", summary.character_count, summary.max_characters),
                    count_style,
                ),
                Span::raw(first_line.to_string()),
            ])
        }
        Card::Configuration => {
            let date = draft
                .expiration
                .map(expiration::format_display)
                .unwrap_or_else(|| "Sin fecha".to_string());
            let product = draft
                .product_id
                .as_deref()
                .and_then(|id| composer.catalog.product(id))
                .map(|p| {
                    let variant = draft
                        .variant_id
                        .as_deref()
                        .and_then(|v| p.variant(v))
                        .map(|v| format!(" - {}", v.name))
                        .unwrap_or_default();
                    format!("{}{}", p.name, variant)
                })
                .unwrap_or_else(|| "Sin producto".to_string());
            Line::from(vec![
                Span::raw(date),
                Span::styled(" · ", muted),
                Span::raw(product),
            ])
        }
        Card::Image => match draft.image.as_deref() {
            Some(reference) => Line::raw(image::describe_reference(reference)),
            None => Line::styled("Sin imagen", muted),
        },
    }
}

fn draw_collapsed(frame: &mut Frame, area: Rect, card: Card, composer: &Composer, summary: &Summary) {
    let paragraph =
        Paragraph::new(collapsed_summary(card, composer, summary)).block(card_block(card, false));
    frame.render_widget(paragraph, area);
}

fn draw_sidebar(
    frame: &mut Frame,
    area: Rect,
    composer: &Composer,
    tui: &mut TuiState,
    summary: &Summary,
    now: NaiveDateTime,
) {
    let [preview_area, cost_area, actions_area] = Layout::vertical([
        Constraint::Min(5),
        Constraint::Length(6),
        Constraint::Length(5),
    ])
    .areas(area);

    MessagePreview::new(
        &composer.draft.message,
        composer.draft.image.as_deref(),
        clock(now),
    )
    .render(frame, preview_area);

    let row = |label: &'static str, value: String, value_style: Style| {
        Line::from(vec![
            Span::raw(format!("{label:<16}")),
            Span::styled(value, value_style),
        ])
    };
    let cost = Paragraph::new(vec![
        row(
            "Destinatarios:",
            summary.recipients.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        row(
            "Costo por SMS:",
            summary::format_cost(summary.unit_price),
            Style::default(),
        ),
        Line::styled("─".repeat(usize::from(area.width.saturating_sub(2))), Style::default().fg(Color::DarkGray)),
        row(
            "Total estimado:",
            summary::format_cost(summary.estimated_cost),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    ])
    .block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Estimación de Costo "),
    );
    frame.render_widget(cost, cost_area);

    draw_actions(frame, actions_area, tui, summary);
}

fn draw_actions(frame: &mut Frame, area: Rect, tui: &mut TuiState, summary: &Summary) {
    let focused = tui.focus == Focus::Actions;
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(" Acciones ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(1); 3]).split(inner);
    for (button, row) in ActionButton::ALL.into_iter().zip(rows.iter().copied()) {
        let enabled = button != ActionButton::Send || summary.can_send;
        let selected = focused && tui.action_button == button;
        let mut style = match (button, enabled) {
            (_, false) => Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            (ActionButton::Send, true) => {
                Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
            }
            _ => Style::default(),
        };
        if selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let line = Line::from(Span::styled(format!(" {} ", button.label()), style)).centered();
        frame.render_widget(Paragraph::new(line), row);
        tui.button_areas.push((button, row));
    }
}

fn draw_help(frame: &mut Frame, area: Rect, focus: Focus) {
    let keys = match focus {
        Focus::Audience => "←/→ pestaña  ↑/↓ mover  Enter marcar",
        Focus::Message => "Escribe el mensaje  Enter/Ctrl+J nueva línea",
        Focus::Expiration => "Enter calendario  7 +7 días  m +1 mes  Esc cerrar",
        Focus::Product => "Escribe para buscar  ←/→ producto/variante  Enter elegir",
        Focus::Image => "Pega o arrastra un archivo  ↑/↓ archivo/URL  Supr quitar",
        Focus::Actions => "←/→ elegir  Enter activar",
    };
    let line = Line::from(vec![
        Span::styled(format!(" {keys} "), Style::default().fg(Color::Gray)),
        Span::styled(
            "| Tab sección  Ctrl+P vista previa  Ctrl+S guardar  Ctrl+E enviar  Ctrl+C salir",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Hit test a click against the areas recorded by the last draw.
/// Buttons win over sections.
pub fn hit_test(tui: &TuiState, col: u16, row: u16) -> Option<Hit> {
    let contains =
        |r: &Rect| col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
    if let Some((button, _)) = tui.button_areas.iter().find(|(_, r)| contains(r)) {
        return Some(Hit::Button(*button));
    }
    tui.section_areas
        .iter()
        .find(|(_, r)| contains(r))
        .map(|(focus, _)| Hit::Section(*focus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::test_composer;
    use chrono::NaiveDate;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    fn draw(composer: &Composer, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 44)).unwrap();
        terminal.draw(|f| draw_ui(f, composer, tui, now())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_initial_screen() {
        let composer = test_composer();
        let mut tui = TuiState::new(now().date());
        let text = draw(&composer, &mut tui);

        assert!(text.contains("Compositor SMS/MMS"));
        assert!(text.contains("Audiencia"));
        assert!(text.contains("Buscar listas..."));
        assert!(text.contains("Estimación de Costo"));
        assert!(text.contains("$0.05"));
        assert!(text.contains("$0.00"));
        assert!(text.contains("Enviar SMS"));
        assert!(text.contains("14:05:09"));
        // No recipients yet
        assert!(!text.contains("Total de destinatarios"));
    }

    #[test]
    fn test_recipient_banner_and_cost() {
        let mut composer = test_composer();
        update(
            &mut composer,
            Action::SetSelectedLists(vec!["join".into(), "mcp".into()]),
        );
        let mut tui = TuiState::new(now().date());
        let text = draw(&composer, &mut tui);

        assert!(text.contains("Total de destinatarios: 1374"));
        assert!(text.contains("$68.70"));
        assert!(text.contains("✓"));
    }

    #[test]
    fn test_collapsed_cards_summarize_draft() {
        let mut composer = test_composer();
        update(
            &mut composer,
            Action::SetExpiration(NaiveDate::from_ymd_opt(2026, 10, 23)),
        );
        update(&mut composer, Action::SetProduct(Some("prod1".into())));
        update(&mut composer, Action::SetVariant(Some("var2".into())));
        let mut tui = TuiState::new(now().date());
        let text = draw(&composer, &mut tui);

        assert!(text.contains("October 23rd, 2026 · Smartphone Pro Max - 256GB Negro"));
        assert!(text.contains("Sin imagen"));
    }

    #[test]
    fn test_configuration_expands_with_popover() {
        let composer = test_composer();
        let mut tui = TuiState::new(now().date());
        tui.focus = Focus::Expiration;
        tui.date_picker.open = true;
        let text = draw(&composer, &mut tui);

        assert!(text.contains("Fecha de expiración"));
        assert!(text.contains("Producto Shopify"));
        assert!(text.contains("7 días"));
    }

    #[test]
    fn test_full_preview_overlay() {
        let mut composer = test_composer();
        update(&mut composer, Action::ToggleFullPreview);
        let mut tui = TuiState::new(now().date());
        let text = draw(&composer, &mut tui);
        assert!(text.contains("Vista Previa Completa"));
        assert!(text.contains("Esc Cerrar"));
    }

    #[test]
    fn test_hit_test_uses_last_draw() {
        let composer = test_composer();
        let mut tui = TuiState::new(now().date());
        draw(&composer, &mut tui);

        let (_, send_area) = tui
            .button_areas
            .iter()
            .find(|(b, _)| *b == ActionButton::Send)
            .copied()
            .unwrap();
        assert_eq!(
            hit_test(&tui, send_area.x + send_area.width / 2, send_area.y),
            Some(Hit::Button(ActionButton::Send))
        );

        let (_, image_area) = tui
            .section_areas
            .iter()
            .find(|(f, _)| *f == Focus::Image)
            .copied()
            .unwrap();
        assert_eq!(
            hit_test(&tui, image_area.x + 1, image_area.y + 1),
            Some(Hit::Section(Focus::Image))
        );
    }
}
