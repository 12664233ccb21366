//! # Image Uploader Component
//!
//! Three ways to attach an MMS image, all ending in the same two events:
//!
//! 1. **Drop**: dragging over the drop zone highlights it; dropping a file on
//!    the terminal pastes its path, and the first path is taken.
//! 2. **File path**: type a path in the "Archivo" field and press Enter.
//! 3. **URL**: type a URL and press Enter ("Agregar"). Only enabled when the
//!    trimmed field is non-blank. The URL is not validated.
//!
//! Whether a file is actually an image, and reading it, is the core's job
//! (see `core::image`). When an image is attached the component shows it
//! instead of the upload fields, with a remove action.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use std::path::PathBuf;

use crate::core::image;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadField {
    #[default]
    File,
    Url,
}

#[derive(Default)]
pub struct ImageUploaderState {
    pub drag_active: bool,
    pub url_input: String,
    pub path_input: String,
    pub field: UploadField,
    /// Drop zone area from the last render, for drag hover.
    drop_zone: Option<Rect>,
}

impl ImageUploaderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_over(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Terminals deliver a drop as pasted path text. Only the first file counts.
    pub fn drop(&mut self, pasted: &str) -> Option<ImageEvent> {
        self.drag_active = false;
        image::first_dropped_path(pasted).map(|p| ImageEvent::FileChosen(PathBuf::from(p)))
    }

    /// Track mouse drags over the drop zone. Returns `true` if the hover
    /// state changed.
    pub fn track_pointer(&mut self, event: &TuiEvent) -> bool {
        let before = self.drag_active;
        match event {
            TuiEvent::MouseDrag(col, row) => {
                if self.in_drop_zone(*col, *row) {
                    self.drag_over();
                } else {
                    self.drag_leave();
                }
            }
            TuiEvent::MouseMove(..) | TuiEvent::MouseClick(..) => self.drag_leave(),
            _ => {}
        }
        before != self.drag_active
    }

    fn in_drop_zone(&self, col: u16, row: u16) -> bool {
        self.drop_zone.is_some_and(|area| {
            col >= area.x && col < area.x + area.width && row >= area.y && row < area.y + area.height
        })
    }

    pub fn can_add_url(&self) -> bool {
        !self.url_input.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageEvent {
    /// A file was dropped or picked; it still has to pass the image check.
    FileChosen(PathBuf),
    /// New image reference. Empty string removes the current image.
    ImageChanged(String),
}

pub struct ImageUploader<'a> {
    state: &'a mut ImageUploaderState,
    image: Option<&'a str>,
    focused: bool,
}

impl<'a> ImageUploader<'a> {
    pub fn new(state: &'a mut ImageUploaderState, image: Option<&'a str>, focused: bool) -> Self {
        Self {
            state,
            image,
            focused,
        }
    }

    fn active_input(&mut self) -> &mut String {
        match self.state.field {
            UploadField::File => &mut self.state.path_input,
            UploadField::Url => &mut self.state.url_input,
        }
    }

    fn submit(&mut self) -> Option<ImageEvent> {
        match self.state.field {
            UploadField::File => {
                let path = self.state.path_input.trim().to_string();
                if path.is_empty() {
                    return None;
                }
                self.state.path_input.clear();
                Some(ImageEvent::FileChosen(PathBuf::from(path)))
            }
            UploadField::Url => {
                if !self.state.can_add_url() {
                    return None;
                }
                let url = self.state.url_input.trim().to_string();
                self.state.url_input.clear();
                Some(ImageEvent::ImageChanged(url))
            }
        }
    }

    fn render_attached(&self, frame: &mut Frame, area: Rect, reference: &str) {
        let lines = vec![
            Line::from(vec![
                Span::styled("🖼  ", Style::default()),
                Span::styled(
                    image::describe_reference(reference),
                    Style::default().fg(Color::Cyan),
                ),
            ]),
            Line::from(Span::styled(
                "Imagen lista para MMS",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(vec![
                Span::styled(" ✕ ", Style::default().fg(Color::White).bg(Color::Red)),
                Span::styled(" Supr para quitar", Style::default().fg(Color::DarkGray)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn render_upload(&mut self, frame: &mut Frame, area: Rect) {
        let [zone_area, file_area, url_area] = Layout::vertical([
            Constraint::Min(4),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .areas(area);

        let zone_style = if self.state.drag_active {
            Style::default().fg(Color::Cyan).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let zone = Paragraph::new(vec![
            Line::from(Span::styled(
                "⇪ Arrastra una imagen aquí o escribe la ruta del archivo",
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .centered(),
            Line::from(Span::styled(
                "JPG, PNG, GIF (máx. 590KB)",
                Style::default().fg(Color::DarkGray),
            ))
            .centered(),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(zone_style),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(zone, zone_area);
        self.state.drop_zone = Some(zone_area);

        let file_active = self.focused && self.state.field == UploadField::File;
        render_field(
            frame,
            file_area,
            " Seleccionar archivo ",
            &self.state.path_input,
            "/ruta/a/imagen.png",
            file_active,
            None,
        );

        let url_active = self.focused && self.state.field == UploadField::Url;
        let add_hint = if self.state.can_add_url() {
            Span::styled(" Agregar ⏎ ", Style::default().fg(Color::Black).bg(Color::Green))
        } else {
            Span::styled(" Agregar ", Style::default().fg(Color::DarkGray))
        };
        render_field(
            frame,
            url_area,
            " O pega la URL de una imagen ",
            &self.state.url_input,
            "https://ejemplo.com/imagen.jpg",
            url_active,
            Some(add_hint),
        );
    }
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    placeholder: &str,
    active: bool,
    button: Option<Span<'static>>,
) {
    let border = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text = if value.is_empty() {
        Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value.to_string())
    };
    let mut block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(title.to_string());
    if let Some(button) = button {
        block = block.title_bottom(Line::from(button).right_aligned());
    }
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if active {
        let x = area.x + 1 + unicode_width::UnicodeWidthStr::width(value) as u16;
        if x < area.x + area.width.saturating_sub(1) {
            frame.set_cursor_position((x, area.y + 1));
        }
    }
}

impl Component for ImageUploader<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        match self.image {
            Some(reference) => {
                self.state.drop_zone = None;
                self.render_attached(frame, area, reference);
            }
            None => self.render_upload(frame, area),
        }
    }
}

impl EventHandler for ImageUploader<'_> {
    type Event = ImageEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.image.is_some() {
            return match event {
                TuiEvent::Delete => Some(ImageEvent::ImageChanged(String::new())),
                _ => None,
            };
        }

        match event {
            TuiEvent::Paste(text) if self.state.field == UploadField::File => self.state.drop(text),
            TuiEvent::Paste(text) => {
                self.state.url_input.push_str(text.lines().next().unwrap_or(""));
                None
            }
            TuiEvent::CursorUp => {
                self.state.field = UploadField::File;
                None
            }
            TuiEvent::CursorDown => {
                self.state.field = UploadField::Url;
                None
            }
            TuiEvent::InputChar('\n') => None,
            TuiEvent::InputChar(c) => {
                self.active_input().push(*c);
                None
            }
            TuiEvent::Backspace => {
                self.active_input().pop();
                None
            }
            TuiEvent::Submit => self.submit(),
            TuiEvent::MouseDrag(..) | TuiEvent::MouseMove(..) => {
                self.state.track_pointer(event);
                None
            }
            _ => None,
        }
    }
}
