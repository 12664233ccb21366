//! # TUI Components
//!
//! This module contains all UI components for the composer screen.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `TitleBar`: application title, subtitle and status message
//! - `MessagePreview`: the message as a recipient would see it
//! - `FullPreview`: centered overlay with the whole draft
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep presentation state between frames and emit events.
//! The persistent `*State` lives in `TuiState`; the component itself is a
//! short-lived wrapper built per frame or per event with borrowed props:
//! - `ContactSelector`: searchable checklist of lists or contacts
//! - `MessageBox`: message editor with character counter
//! - `DatePicker`: expiration trigger plus calendar popover
//! - `ProductSelector`: product then variant
//! - `ImageUploader`: drop zone, file path and URL entry
//!
//! None of them own draft data. They emit the new value and the event loop
//! turns it into a `core::Action`.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs               (this file)
//! ├── title_bar.rs         (header)
//! ├── search_box.rs        (query field shared by the selectors)
//! ├── contact_selector.rs  (audience checklist)
//! ├── message_box/         (editor with hard wrap)
//! ├── date_picker.rs       (trigger + popover)
//! ├── product_selector.rs  (product/variant columns)
//! ├── image_uploader.rs    (MMS image)
//! ├── preview.rs           (message bubble)
//! └── full_preview.rs      (overlay)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod contact_selector;
pub mod date_picker;
pub mod full_preview;
pub mod image_uploader;
pub mod message_box;
pub mod preview;
pub mod product_selector;
mod search_box;

pub use contact_selector::{ContactSelector, ContactSelectorState, SelectionEvent};
pub use date_picker::{DateEvent, DatePicker, DatePickerState};
pub use full_preview::FullPreview;
pub use image_uploader::{ImageEvent, ImageUploader, ImageUploaderState};
pub use message_box::{MessageBox, MessageBoxState, MessageEvent};
pub use preview::MessagePreview;
pub use product_selector::{ProductEvent, ProductSelector, ProductSelectorState};
