//! # FullPreview Overlay
//!
//! Centered modal shown while the draft's full-preview flag is set. Puts the
//! message bubble next to everything else the broadcast would carry:
//! audience, expiration, product and estimated cost.
//!
//! Stateless. Closing it is the parent's job (Esc or Ctrl+P toggle the flag).

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::core::expiration;
use crate::core::state::Composer;
use crate::core::summary::{self, Summary};
use crate::tui::component::Component;
use crate::tui::components::preview::MessagePreview;

pub struct FullPreview<'a> {
    composer: &'a Composer,
    time: String,
}

impl<'a> FullPreview<'a> {
    pub fn new(composer: &'a Composer, time: String) -> Self {
        Self { composer, time }
    }

    fn detail_lines(&self) -> Vec<Line<'static>> {
        let draft = &self.composer.draft;
        let catalog = &self.composer.catalog;
        let summary = Summary::of(self.composer);

        let label = |text: &'static str| {
            Span::styled(text, Style::default().fg(Color::DarkGray))
        };

        let expiration = draft
            .expiration
            .map(expiration::format_display)
            .unwrap_or_else(|| "Sin fecha".to_string());

        let product = draft
            .product_id
            .as_deref()
            .and_then(|id| catalog.product(id))
            .map(|p| {
                let variant = draft
                    .variant_id
                    .as_deref()
                    .and_then(|v| p.variant(v))
                    .map(|v| format!(" - {} ({})", v.name, v.price))
                    .unwrap_or_default();
                format!("{}{}", p.name, variant)
            })
            .unwrap_or_else(|| "Ninguno".to_string());

        let count_style = if summary.over_limit {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };

        vec![
            Line::from(vec![
                label("Audiencia: "),
                Span::raw(draft.audience.label().to_string()),
            ]),
            Line::from(vec![
                label("Destinatarios: "),
                Span::raw(summary.recipients.to_string()),
            ]),
            Line::from(vec![
                label("Caracteres: "),
                Span::styled(
                    format!("{}/{}", summary.character_count, summary.max_characters),
                    count_style,
                ),
            ]),
            Line::from(vec![label("Expira: "), Span::raw(expiration)]),
            Line::from(vec![label("Producto: "), Span::raw(product)]),
            Line::default(),
            Line::from(vec![
                label("Total estimado: "),
                Span::styled(
                    summary::format_cost(summary.estimated_cost),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
            ]),
        ]
    }
}

impl Component for FullPreview<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(80, 80, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Vista Previa Completa ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Esc Cerrar ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [bubble_area, details_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .spacing(1)
                .areas(inner);

        let draft = &self.composer.draft;
        MessagePreview::new(&draft.message, draft.image.as_deref(), self.time.clone())
            .render(frame, bubble_area);

        let details = Paragraph::new(self.detail_lines()).wrap(Wrap { trim: true });
        frame.render_widget(details, details_area);
    }
}

/// Create a centered rect using percentage of the outer area.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::state::AudienceMode;
    use crate::test_support::test_composer;
    use chrono::NaiveDate;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_overlay_shows_draft_details() {
        let mut composer = test_composer();
        update(&mut composer, Action::SetAudience(AudienceMode::Lists));
        update(
            &mut composer,
            Action::SetSelectedLists(vec!["join".into(), "mcp".into()]),
        );
        update(&mut composer, Action::SetMessage("Oferta".into()));
        update(
            &mut composer,
            Action::SetExpiration(NaiveDate::from_ymd_opt(2026, 10, 23)),
        );
        update(&mut composer, Action::SetProduct(Some("prod3".into())));
        update(&mut composer, Action::SetVariant(Some("var8".into())));

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|f| FullPreview::new(&composer, "09:15:00".into()).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Vista Previa Completa"));
        assert!(text.contains("Oferta"));
        assert!(text.contains("09:15:00"));
        assert!(text.contains("1374"));
        assert!(text.contains("October 23rd, 2026"));
        assert!(text.contains("Audífonos Inalámbricos"));
        assert!(text.contains("$319.99"));
        assert!(text.contains("$68.70"));
    }

    #[test]
    fn test_centered_rect_is_inside_outer() {
        let outer = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(80, 80, outer);
        assert_eq!(rect.width, 80);
        assert_eq!(rect.height, 40);
        assert_eq!((rect.x, rect.y), (10, 5));
    }
}
