//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates terminal events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Routing
//!
//! Global shortcuts (quit, preview, save, send, section switching) are
//! handled first. Everything else goes to the component owning the focused
//! section, whose high-level event is mapped to an `Action` here. While the
//! full preview overlay is open it swallows all input except its own toggle.
//!
//! ## Redraw Strategy
//!
//! The loop only redraws after an event, a background completion, or when
//! the wall clock ticks to a new second (the preview shows the time). Idle
//! polling waits up to 250ms.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
mod ui;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use log::{debug, info, warn};
use ratatui::layout::Rect;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::catalog::Catalog;
use crate::core::config::ResolvedConfig;
use crate::core::image;
use crate::core::state::{AudienceMode, Composer};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ContactSelector, ContactSelectorState, DateEvent, DatePicker, DatePickerState, ImageEvent,
    ImageUploader, ImageUploaderState, MessageBox, MessageBoxState, MessageEvent, ProductEvent,
    ProductSelector, ProductSelectorState, SelectionEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::Hit;

/// Focusable sections, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Audience,
    Message,
    Expiration,
    Product,
    Image,
    Actions,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Audience,
        Focus::Message,
        Focus::Expiration,
        Focus::Product,
        Focus::Image,
        Focus::Actions,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionButton {
    #[default]
    FullPreview,
    SaveDraft,
    Send,
}

impl ActionButton {
    pub const ALL: [ActionButton; 3] = [
        ActionButton::FullPreview,
        ActionButton::SaveDraft,
        ActionButton::Send,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActionButton::FullPreview => "Vista Previa Completa",
            ActionButton::SaveDraft => "Guardar Borrador",
            ActionButton::Send => "Enviar SMS",
        }
    }

    pub fn action(self) -> Action {
        match self {
            ActionButton::FullPreview => Action::ToggleFullPreview,
            ActionButton::SaveDraft => Action::SaveDraft,
            ActionButton::Send => Action::Send,
        }
    }

    fn step(self, forward: bool) -> Self {
        let index = Self::ALL.iter().position(|b| *b == self).unwrap_or(0);
        let len = Self::ALL.len();
        let next = if forward { index + 1 } else { index + len - 1 };
        Self::ALL[next % len]
    }
}

/// TUI-specific presentation state (not part of the draft)
pub struct TuiState {
    pub focus: Focus,
    // Persistent component states
    pub lists: ContactSelectorState,
    pub contacts: ContactSelectorState,
    pub message_box: MessageBoxState,
    pub date_picker: DatePickerState,
    pub product: ProductSelectorState,
    pub image: ImageUploaderState,
    pub action_button: ActionButton,
    // Areas from the last draw, for mouse hit-testing
    pub section_areas: Vec<(Focus, Rect)>,
    pub button_areas: Vec<(ActionButton, Rect)>,
}

impl TuiState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            focus: Focus::Audience,
            lists: ContactSelectorState::new(),
            contacts: ContactSelectorState::new(),
            message_box: MessageBoxState::new(),
            date_picker: DatePickerState::new(today),
            product: ProductSelectorState::new(),
            image: ImageUploaderState::new(),
            action_button: ActionButton::default(),
            section_areas: Vec::new(),
            button_areas: Vec::new(),
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        if focus != self.focus {
            debug!("Focus {:?} -> {:?}", self.focus, focus);
        }
        // The popover only belongs to the expiration section
        if focus != Focus::Expiration {
            self.date_picker.open = false;
        }
        self.focus = focus;
    }
}

/// Translate one terminal event into draft actions.
///
/// Mutates only presentation state; the draft changes when the caller
/// applies the returned actions with `update`.
pub fn route_event(
    composer: &Composer,
    tui: &mut TuiState,
    event: &TuiEvent,
    now: NaiveDateTime,
) -> Vec<Action> {
    match event {
        TuiEvent::ForceQuit => return vec![Action::Quit],
        TuiEvent::ToggleFullPreview => return vec![Action::ToggleFullPreview],
        TuiEvent::Resize => return Vec::new(),
        _ => {}
    }

    if composer.draft.show_full_preview {
        return match event {
            TuiEvent::Escape => vec![Action::ToggleFullPreview],
            _ => Vec::new(),
        };
    }

    match event {
        TuiEvent::SaveDraft => return vec![Action::SaveDraft],
        TuiEvent::Send => return vec![Action::Send],
        TuiEvent::NextSection => {
            tui.set_focus(tui.focus.next());
            return Vec::new();
        }
        TuiEvent::PrevSection => {
            tui.set_focus(tui.focus.prev());
            return Vec::new();
        }
        // Drag hover is tracked wherever focus is
        TuiEvent::MouseDrag(..) | TuiEvent::MouseMove(..) => {
            tui.image.track_pointer(event);
            return Vec::new();
        }
        // A drop onto a highlighted zone counts even if another section has focus
        TuiEvent::Paste(text) if tui.image.drag_active => {
            tui.set_focus(Focus::Image);
            return match tui.image.drop(text) {
                Some(event) => image_actions(event),
                None => Vec::new(),
            };
        }
        TuiEvent::MouseClick(col, row) => match ui::hit_test(tui, *col, *row) {
            Some(Hit::Button(button)) => {
                tui.set_focus(Focus::Actions);
                tui.action_button = button;
                return vec![button.action()];
            }
            Some(Hit::Section(focus)) if focus != tui.focus => {
                tui.set_focus(focus);
                return Vec::new();
            }
            Some(Hit::Section(_)) => {}
            None => return Vec::new(),
        },
        _ => {}
    }

    let draft = &composer.draft;
    match tui.focus {
        Focus::Audience => {
            if matches!(event, TuiEvent::CursorLeft | TuiEvent::CursorRight) {
                return vec![Action::SetAudience(draft.audience.toggled())];
            }
            let state = match draft.audience {
                AudienceMode::Lists => &mut tui.lists,
                AudienceMode::Individuals => &mut tui.contacts,
            };
            let emitted = ContactSelector::new(
                state,
                draft.audience,
                &composer.catalog,
                draft.active_selection(),
                true,
            )
            .handle_event(event);
            match emitted {
                Some(SelectionEvent::Changed(ids)) => match draft.audience {
                    AudienceMode::Lists => vec![Action::SetSelectedLists(ids)],
                    AudienceMode::Individuals => vec![Action::SetSelectedContacts(ids)],
                },
                None => Vec::new(),
            }
        }
        Focus::Message => {
            let emitted = MessageBox::new(
                &mut tui.message_box,
                &draft.message,
                composer.max_characters,
                true,
            )
            .handle_event(event);
            match emitted {
                Some(MessageEvent::Changed(text)) => vec![Action::SetMessage(text)],
                None => Vec::new(),
            }
        }
        Focus::Expiration => {
            let emitted = DatePicker::new(&mut tui.date_picker, draft.expiration, now, true)
                .handle_event(event);
            match emitted {
                Some(DateEvent::Changed(day)) => vec![Action::SetExpiration(Some(day))],
                None => Vec::new(),
            }
        }
        Focus::Product => ProductSelector::new(
            &mut tui.product,
            &composer.catalog,
            draft.product_id.as_deref(),
            draft.variant_id.as_deref(),
            true,
        )
        .handle_event(event)
        .unwrap_or_default()
        .into_iter()
        .map(|e| match e {
            ProductEvent::ProductChanged(id) => Action::SetProduct(Some(id)),
            ProductEvent::VariantChanged(id) => Action::SetVariant(id),
        })
        .collect(),
        Focus::Image => {
            ImageUploader::new(&mut tui.image, draft.image.as_deref(), true)
                .handle_event(event)
                .map(image_actions)
                .unwrap_or_default()
        }
        Focus::Actions => match event {
            TuiEvent::CursorLeft | TuiEvent::CursorUp => {
                tui.action_button = tui.action_button.step(false);
                Vec::new()
            }
            TuiEvent::CursorRight | TuiEvent::CursorDown => {
                tui.action_button = tui.action_button.step(true);
                Vec::new()
            }
            TuiEvent::Submit => vec![tui.action_button.action()],
            _ => Vec::new(),
        },
    }
}

fn image_actions(event: ImageEvent) -> Vec<Action> {
    match event {
        ImageEvent::FileChosen(path) => vec![Action::PickImageFile(path)],
        ImageEvent::ImageChanged(reference) => vec![Action::SetImage(reference)],
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty protocol is harmlessly ignored by terminals that lack it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn run(config: ResolvedConfig, catalog: Arc<Catalog>) -> std::io::Result<()> {
    let mut composer = Composer::from_config(catalog, &config);
    let mut tui = TuiState::new(local_now().date());
    info!(
        "Composer started (draft_id={}, max_characters={}, unit_price={})",
        composer.draft_id, composer.max_characters, composer.unit_price
    );

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let mut needs_redraw = true; // Force first frame
    let mut last_second = None;

    loop {
        let now = local_now();
        // The preview clock ticks once a second
        if last_second != Some(now.second()) {
            last_second = Some(now.second());
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &composer, &mut tui, now))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(std::time::Duration::from_millis(250));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            for action in route_event(&composer, &mut tui, &event, now) {
                debug!("Dispatching {:?}", action);
                match update(&mut composer, action) {
                    Effect::Quit => should_quit = true,
                    Effect::ReadImage { path, token } => {
                        spawn_image_read(path, token, tx.clone());
                    }
                    Effect::None => {}
                }
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (image reads)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", summarize(&action));
            update(&mut composer, action);
        }
    }

    info!("Composer closed (draft_id={})", composer.draft_id);
    ratatui::restore();
    Ok(())
}

/// Data URIs are too large to log in full.
fn summarize(action: &Action) -> String {
    match action {
        Action::ImageLoaded { token, data_uri } => {
            format!("ImageLoaded {{ token: {}, len: {} }}", token, data_uri.len())
        }
        other => format!("{other:?}"),
    }
}

fn spawn_image_read(path: PathBuf, token: u64, tx: mpsc::Sender<Action>) {
    info!("Spawning image read: {} (token={})", path.display(), token);
    tokio::spawn(async move {
        let action = match image::read_data_uri(&path).await {
            Ok(data_uri) => Action::ImageLoaded { token, data_uri },
            Err(e) => Action::ImageFailed {
                token,
                reason: e.to_string(),
            },
        };
        if tx.send(action).is_err() {
            warn!("Failed to send image result for token={}: receiver dropped", token);
        }
    });
}
