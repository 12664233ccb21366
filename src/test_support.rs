//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use crate::core::catalog::Catalog;
use crate::core::state::{Composer, Draft};

/// Creates a composer over the built-in catalog with default limits.
pub fn test_composer() -> Composer {
    Composer::new(Arc::new(Catalog::builtin()))
}

/// A default draft in list mode with the given lists selected.
pub fn draft_with_lists(ids: &[&str]) -> Draft {
    Draft {
        selected_lists: ids.iter().map(|s| s.to_string()).collect(),
        ..Draft::default()
    }
}
