//! # Core Application Logic
//!
//! This module contains the composer's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Composer (the draft) │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Summary (derived)    │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `Composer` and `Draft`, all form state in one place
//! - [`action`]: the `Action` enum and `update()`
//! - [`summary`]: derived values (character count, recipients, cost, steps)
//! - [`catalog`]: contacts, lists and products, plus search filters
//! - [`selection`]: toggle semantics for multi-select
//! - [`expiration`]: date rules for the expiration picker
//! - [`image`]: image file to data URI
//! - [`config`]: layered configuration

pub mod action;
pub mod catalog;
pub mod config;
pub mod expiration;
pub mod image;
pub mod selection;
pub mod state;
pub mod summary;
