//! # Product Selector Component
//!
//! Two-column picker: a searchable product list on the left, and the chosen
//! product's variants on the right. The variant column only appears once a
//! product is selected, and only ever lists that product's variants.
//!
//! Picking a product emits `ProductChanged` followed by
//! `VariantChanged(None)`, so a variant can never outlive its product.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Paragraph};

use crate::core::catalog::{self, Catalog, Product};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::search_box::{edit_query, render_search_box};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductColumn {
    #[default]
    Products,
    Variants,
}

#[derive(Default)]
pub struct ProductSelectorState {
    pub query: String,
    pub product_highlight: usize,
    pub variant_highlight: usize,
    pub column: ProductColumn,
    product_list: ListState,
    variant_list: ListState,
}

impl ProductSelectorState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductEvent {
    ProductChanged(String),
    VariantChanged(Option<String>),
}

pub struct ProductSelector<'a> {
    state: &'a mut ProductSelectorState,
    catalog: &'a Catalog,
    product_id: Option<&'a str>,
    variant_id: Option<&'a str>,
    focused: bool,
}

impl<'a> ProductSelector<'a> {
    pub fn new(
        state: &'a mut ProductSelectorState,
        catalog: &'a Catalog,
        product_id: Option<&'a str>,
        variant_id: Option<&'a str>,
        focused: bool,
    ) -> Self {
        Self {
            state,
            catalog,
            product_id,
            variant_id,
            focused,
        }
    }

    fn visible_products(&self) -> Vec<&'a Product> {
        catalog::filter_products(&self.catalog.products, &self.state.query)
    }

    fn selected_product(&self) -> Option<&'a Product> {
        self.product_id.and_then(|id| self.catalog.product(id))
    }

    /// "Product - Variant (price)" when both ids resolve in the catalog.
    fn summary_line(&self) -> Option<String> {
        let product = self.selected_product()?;
        let variant = product.variant(self.variant_id?)?;
        Some(format!("{} - {} ({})", product.name, variant.name, variant.price))
    }

    fn move_highlight(&mut self, down: bool) {
        let (highlight, len) = match self.state.column {
            ProductColumn::Products => (
                &mut self.state.product_highlight,
                catalog::filter_products(&self.catalog.products, &self.state.query).len(),
            ),
            ProductColumn::Variants => (
                &mut self.state.variant_highlight,
                self.product_id
                    .and_then(|id| self.catalog.product(id))
                    .map_or(0, |p| p.variants.len()),
            ),
        };
        if down {
            if len > 0 {
                *highlight = (*highlight + 1).min(len - 1);
            }
        } else {
            *highlight = highlight.saturating_sub(1);
        }
    }

    fn submit(&mut self) -> Option<Vec<ProductEvent>> {
        match self.state.column {
            ProductColumn::Products => {
                let product = self.visible_products().get(self.state.product_highlight).copied()?;
                self.state.variant_highlight = 0;
                self.state.column = ProductColumn::Variants;
                Some(vec![
                    ProductEvent::ProductChanged(product.id.clone()),
                    ProductEvent::VariantChanged(None),
                ])
            }
            ProductColumn::Variants => {
                let variant = self
                    .selected_product()?
                    .variants
                    .get(self.state.variant_highlight)?;
                Some(vec![ProductEvent::VariantChanged(Some(variant.id.clone()))])
            }
        }
    }

    fn render_products(&mut self, frame: &mut Frame, area: Rect) {
        let products = self.visible_products();
        self.state.product_highlight = self
            .state
            .product_highlight
            .min(products.len().saturating_sub(1));

        let items: Vec<ListItem> = products
            .iter()
            .map(|p| {
                let chosen = self.product_id == Some(p.id.as_str());
                let marker = if chosen { "● " } else { "○ " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::styled(p.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(p.price.clone(), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();

        let active = self.focused && self.state.column == ProductColumn::Products;
        let list = List::new(items)
            .block(column_block(" Producto ", active))
            .highlight_style(highlight_style(active));
        self.state
            .product_list
            .select((!products.is_empty()).then_some(self.state.product_highlight));
        frame.render_stateful_widget(list, area, &mut self.state.product_list);
    }

    fn render_variants(&mut self, frame: &mut Frame, area: Rect, product: &Product) {
        self.state.variant_highlight = self
            .state
            .variant_highlight
            .min(product.variants.len().saturating_sub(1));

        let items: Vec<ListItem> = product
            .variants
            .iter()
            .map(|v| {
                let chosen = self.variant_id == Some(v.id.as_str());
                let marker = if chosen { "● " } else { "○ " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::raw(v.name.clone()),
                    Span::raw("  "),
                    Span::styled(v.price.clone(), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();

        let active = self.focused && self.state.column == ProductColumn::Variants;
        let list = List::new(items)
            .block(column_block(" Variante ", active))
            .highlight_style(highlight_style(active));
        self.state
            .variant_list
            .select((!product.variants.is_empty()).then_some(self.state.variant_highlight));
        frame.render_stateful_widget(list, area, &mut self.state.variant_list);
    }
}

fn column_block(title: &'static str, active: bool) -> Block<'static> {
    let border = if active { Color::Cyan } else { Color::DarkGray };
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn highlight_style(active: bool) -> Style {
    if active {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    }
}

impl Component for ProductSelector<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let summary = self.summary_line();
        let summary_height = if summary.is_some() { 1 } else { 0 };

        let [search_area, lists_area, summary_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(summary_height),
        ])
        .areas(area);

        let searching = self.focused && self.state.column == ProductColumn::Products;
        render_search_box(frame, search_area, &self.state.query, "Buscar productos...", searching);

        match self.selected_product() {
            Some(product) => {
                let [products_area, variants_area] =
                    Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                        .areas(lists_area);
                self.render_products(frame, products_area);
                self.render_variants(frame, variants_area, product);
            }
            None => self.render_products(frame, lists_area),
        }

        if let Some(summary) = summary {
            let line = Line::from(vec![
                Span::styled("✓ ", Style::default().fg(Color::Green)),
                Span::styled(summary, Style::default().fg(Color::Green)),
            ]);
            frame.render_widget(Paragraph::new(line), summary_area);
        }
    }
}

impl EventHandler for ProductSelector<'_> {
    type Event = Vec<ProductEvent>;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.state.column == ProductColumn::Products && edit_query(&mut self.state.query, event)
        {
            self.state.product_highlight = 0;
            *self.state.product_list.offset_mut() = 0;
            return None;
        }

        match event {
            TuiEvent::CursorUp => {
                self.move_highlight(false);
                None
            }
            TuiEvent::CursorDown => {
                self.move_highlight(true);
                None
            }
            TuiEvent::CursorLeft => {
                self.state.column = ProductColumn::Products;
                None
            }
            TuiEvent::CursorRight => {
                if self.selected_product().is_some() {
                    self.state.column = ProductColumn::Variants;
                }
                None
            }
            TuiEvent::Submit => self.submit(),
            _ => None,
        }
    }
}
