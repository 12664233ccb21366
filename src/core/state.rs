//! # Application State
//!
//! Core business state for the composer. This module contains domain logic
//! only, no TUI-specific types. Presentation state (search boxes, highlighted
//! rows, popovers) lives in the `tui` components.
//!
//! ```text
//! Composer
//! ├── draft: Draft                  // everything describing the message
//! │   ├── audience: AudienceMode    // lists | individuals
//! │   ├── message: String
//! │   ├── expiration: Option<NaiveDate>
//! │   ├── product_id / variant_id: Option<String>
//! │   ├── selected_lists / selected_contacts: Vec<String>
//! │   ├── image: Option<String>     // data URI or URL
//! │   └── show_full_preview: bool
//! ├── catalog: Arc<Catalog>         // read-only reference data
//! ├── max_characters / unit_price   // pricing and limits from config
//! ├── image_token: u64              // latest image read request
//! └── draft_id: String              // correlates log lines
//! ```
//!
//! State changes only happen through `update(composer, action)` in action.rs.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::core::catalog::Catalog;
use crate::core::config::{DEFAULT_MAX_CHARACTERS, DEFAULT_UNIT_PRICE, ResolvedConfig};

pub const INITIAL_MESSAGE: &str = "Ej: ¡Aprovecha nuestro producto solo hasta 2025-07-22!";

/// How recipients are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceMode {
    #[default]
    Lists,
    Individuals,
}

impl AudienceMode {
    pub fn label(self) -> &'static str {
        match self {
            AudienceMode::Lists => "Listas de Contactos",
            AudienceMode::Individuals => "Contactos Individuales",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AudienceMode::Lists => AudienceMode::Individuals,
            AudienceMode::Individuals => AudienceMode::Lists,
        }
    }
}

/// The unsent message and everything attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub audience: AudienceMode,
    pub message: String,
    pub expiration: Option<NaiveDate>,
    pub product_id: Option<String>,
    pub variant_id: Option<String>,
    pub selected_contacts: Vec<String>,
    pub selected_lists: Vec<String>,
    pub image: Option<String>,
    pub show_full_preview: bool,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            audience: AudienceMode::default(),
            message: INITIAL_MESSAGE.to_string(),
            expiration: None,
            product_id: None,
            variant_id: None,
            selected_contacts: Vec::new(),
            selected_lists: Vec::new(),
            image: None,
            show_full_preview: false,
        }
    }
}

impl Draft {
    /// Selected ids for the active audience mode.
    pub fn active_selection(&self) -> &[String] {
        match self.audience {
            AudienceMode::Lists => &self.selected_lists,
            AudienceMode::Individuals => &self.selected_contacts,
        }
    }
}

/// What a delivery backend would receive for this draft. Nothing sends it;
/// it is logged when the user presses send.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendRequest {
    pub draft_id: String,
    pub audience: AudienceMode,
    pub recipients: Vec<String>,
    pub recipient_total: u64,
    pub message: String,
    pub expiration: Option<NaiveDate>,
    pub product_id: Option<String>,
    pub variant_id: Option<String>,
    pub image: Option<String>,
}

pub struct Composer {
    pub draft: Draft,
    pub catalog: Arc<Catalog>,
    pub max_characters: usize,
    pub unit_price: f64,
    /// Token of the most recent image read; older completions are dropped.
    pub image_token: u64,
    pub status_message: String,
    pub draft_id: String,
}

impl Composer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            draft: Draft::default(),
            catalog,
            max_characters: DEFAULT_MAX_CHARACTERS,
            unit_price: DEFAULT_UNIT_PRICE,
            image_token: 0,
            status_message: String::new(),
            draft_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn from_config(catalog: Arc<Catalog>, config: &ResolvedConfig) -> Self {
        Self {
            max_characters: config.max_characters,
            unit_price: config.unit_price,
            ..Self::new(catalog)
        }
    }

    /// Start a new image request, invalidating any read still in flight.
    pub fn next_image_token(&mut self) -> u64 {
        self.image_token += 1;
        self.image_token
    }

    pub fn send_request(&self) -> SendRequest {
        SendRequest {
            draft_id: self.draft_id.clone(),
            audience: self.draft.audience,
            recipients: self.draft.active_selection().to_vec(),
            recipient_total: crate::core::summary::recipient_total(&self.draft, &self.catalog),
            message: self.draft.message.clone(),
            expiration: self.draft.expiration,
            product_id: self.draft.product_id.clone(),
            variant_id: self.draft.variant_id.clone(),
            image: self.draft.image.clone(),
        }
    }
}
