//! # Actions
//!
//! Everything that can happen to the draft becomes an `Action`.
//! User picks a list? That's `Action::SetSelectedLists(ids)`.
//! An image read finishes? That's `Action::ImageLoaded { token, data_uri }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the caller must
//! perform. No side effects here. I/O happens in the TUI loop.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use chrono::NaiveDate;
use log::{debug, info, warn};
use std::path::PathBuf;

use crate::core::image;
use crate::core::state::{AudienceMode, Composer};
use crate::core::summary::Summary;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetAudience(AudienceMode),
    SetSelectedLists(Vec<String>),
    SetSelectedContacts(Vec<String>),
    SetMessage(String),
    SetExpiration(Option<NaiveDate>),
    /// Empty string or `None` clears the product.
    SetProduct(Option<String>),
    SetVariant(Option<String>),
    /// A file was dropped or picked.
    PickImageFile(PathBuf),
    /// A file read finished.
    ImageLoaded { token: u64, data_uri: String },
    /// A file read failed. The current image is kept.
    ImageFailed { token: u64, reason: String },
    /// URL entry or removal. An empty string clears the image.
    SetImage(String),
    ToggleFullPreview,
    SaveDraft,
    Send,
    Quit,
}

/// I/O the caller has to perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    ReadImage { path: PathBuf, token: u64 },
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn update(composer: &mut Composer, action: Action) -> Effect {
    match action {
        Action::SetAudience(mode) => {
            composer.draft.audience = mode;
            Effect::None
        }
        Action::SetSelectedLists(ids) => {
            composer.draft.selected_lists = ids;
            Effect::None
        }
        Action::SetSelectedContacts(ids) => {
            composer.draft.selected_contacts = ids;
            Effect::None
        }
        Action::SetMessage(text) => {
            composer.draft.message = text;
            Effect::None
        }
        Action::SetExpiration(date) => {
            composer.draft.expiration = date;
            Effect::None
        }
        Action::SetProduct(id) => {
            let id = non_empty(id);
            // A variant only makes sense for the product it came from
            if id != composer.draft.product_id {
                composer.draft.variant_id = None;
            }
            composer.draft.product_id = id;
            Effect::None
        }
        Action::SetVariant(id) => {
            composer.draft.variant_id = non_empty(id);
            Effect::None
        }
        Action::PickImageFile(path) => {
            let media_type = image::media_type_for(&path);
            if !image::is_image(media_type) {
                debug!(
                    "Ignoring non-image file {} ({})",
                    path.display(),
                    media_type
                );
                return Effect::None;
            }
            let token = composer.next_image_token();
            info!("Reading image {} (token={})", path.display(), token);
            Effect::ReadImage { path, token }
        }
        Action::ImageLoaded { token, data_uri } => {
            if token == composer.image_token {
                debug!("Image read complete (token={}, {} bytes)", token, data_uri.len());
                composer.draft.image = Some(data_uri);
            } else {
                debug!(
                    "Discarding stale image read (token={}, latest={})",
                    token, composer.image_token
                );
            }
            Effect::None
        }
        Action::ImageFailed { token, reason } => {
            warn!("Image read failed (token={}): {}", token, reason);
            if token == composer.image_token {
                composer.status_message = format!("No se pudo leer la imagen: {reason}");
            }
            Effect::None
        }
        Action::SetImage(reference) => {
            // Supersedes any file read still in flight
            composer.next_image_token();
            composer.draft.image = non_empty(Some(reference));
            Effect::None
        }
        Action::ToggleFullPreview => {
            composer.draft.show_full_preview = !composer.draft.show_full_preview;
            Effect::None
        }
        Action::SaveDraft => {
            info!("Save draft requested (draft_id={}); drafts are not persisted", composer.draft_id);
            Effect::None
        }
        Action::Send => {
            let summary = Summary::of(composer);
            if !summary.can_send {
                debug!(
                    "Send ignored: recipients={}, over_limit={}, expiration={:?}",
                    summary.recipients, summary.over_limit, composer.draft.expiration
                );
                return Effect::None;
            }
            match serde_json::to_string(&composer.send_request()) {
                Ok(payload) => info!("Send requested, no delivery backend configured: {}", payload),
                Err(e) => warn!("Failed to serialize send request: {}", e),
            }
            composer.status_message =
                format!("Envío preparado para {} destinatarios", summary.recipients);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_composer;

    #[test]
    fn test_set_message() {
        let mut composer = test_composer();
        let effect = update(&mut composer, Action::SetMessage("Hola".into()));
        assert_eq!(effect, Effect::None);
        assert_eq!(composer.draft.message, "Hola");
    }

    #[test]
    fn test_new_product_clears_variant() {
        let mut composer = test_composer();
        update(&mut composer, Action::SetProduct(Some("prod1".into())));
        update(&mut composer, Action::SetVariant(Some("var2".into())));
        assert_eq!(composer.draft.variant_id.as_deref(), Some("var2"));

        update(&mut composer, Action::SetProduct(Some("prod3".into())));
        assert_eq!(composer.draft.product_id.as_deref(), Some("prod3"));
        assert!(composer.draft.variant_id.is_none());
    }

    #[test]
    fn test_empty_ids_mean_none() {
        let mut composer = test_composer();
        update(&mut composer, Action::SetProduct(Some("prod1".into())));
        update(&mut composer, Action::SetVariant(Some(String::new())));
        assert!(composer.draft.variant_id.is_none());
        update(&mut composer, Action::SetProduct(Some(String::new())));
        assert!(composer.draft.product_id.is_none());
    }

    #[test]
    fn test_non_image_file_is_ignored() {
        let mut composer = test_composer();
        composer.draft.image = Some("https://ejemplo.com/a.jpg".into());
        let effect = update(&mut composer, Action::PickImageFile("report.pdf".into()));
        assert_eq!(effect, Effect::None);
        assert_eq!(composer.draft.image.as_deref(), Some("https://ejemplo.com/a.jpg"));
        assert_eq!(composer.image_token, 0);
    }

    #[test]
    fn test_image_file_requests_read() {
        let mut composer = test_composer();
        let effect = update(&mut composer, Action::PickImageFile("/tmp/cat.png".into()));
        assert_eq!(
            effect,
            Effect::ReadImage {
                path: "/tmp/cat.png".into(),
                token: 1
            }
        );
        // Reference only changes once the read completes
        assert!(composer.draft.image.is_none());
    }

    #[test]
    fn test_latest_image_read_wins() {
        let mut composer = test_composer();
        let Effect::ReadImage { token: first, .. } =
            update(&mut composer, Action::PickImageFile("a.png".into()))
        else {
            panic!("expected read");
        };
        let Effect::ReadImage { token: second, .. } =
            update(&mut composer, Action::PickImageFile("b.png".into()))
        else {
            panic!("expected read");
        };

        update(&mut composer, Action::ImageLoaded { token: second, data_uri: "data:b".into() });
        update(&mut composer, Action::ImageLoaded { token: first, data_uri: "data:a".into() });
        assert_eq!(composer.draft.image.as_deref(), Some("data:b"));
    }

    #[test]
    fn test_url_supersedes_pending_read() {
        let mut composer = test_composer();
        let Effect::ReadImage { token, .. } =
            update(&mut composer, Action::PickImageFile("a.png".into()))
        else {
            panic!("expected read");
        };
        update(&mut composer, Action::SetImage("https://ejemplo.com/b.jpg".into()));
        update(&mut composer, Action::ImageLoaded { token, data_uri: "data:a".into() });
        assert_eq!(composer.draft.image.as_deref(), Some("https://ejemplo.com/b.jpg"));
    }

    #[test]
    fn test_remove_image() {
        let mut composer = test_composer();
        update(&mut composer, Action::SetImage("https://ejemplo.com/b.jpg".into()));
        update(&mut composer, Action::SetImage(String::new()));
        assert!(composer.draft.image.is_none());
    }

    #[test]
    fn test_toggle_full_preview() {
        let mut composer = test_composer();
        update(&mut composer, Action::ToggleFullPreview);
        assert!(composer.draft.show_full_preview);
        update(&mut composer, Action::ToggleFullPreview);
        assert!(!composer.draft.show_full_preview);
    }

    #[test]
    fn test_send_and_save_leave_draft_untouched() {
        let mut composer = test_composer();
        composer.draft.selected_lists = vec!["join".into()];
        composer.draft.expiration = NaiveDate::from_ymd_opt(2030, 1, 1);
        let before = composer.draft.clone();
        assert_eq!(update(&mut composer, Action::Send), Effect::None);
        assert_eq!(update(&mut composer, Action::SaveDraft), Effect::None);
        assert_eq!(composer.draft, before);
    }

    #[test]
    fn test_send_sets_status_only_when_enabled() {
        let mut composer = test_composer();
        update(&mut composer, Action::Send);
        assert!(composer.status_message.is_empty());

        composer.draft.selected_lists = vec!["join".into(), "mcp".into()];
        composer.draft.expiration = NaiveDate::from_ymd_opt(2030, 1, 1);
        update(&mut composer, Action::Send);
        assert_eq!(composer.status_message, "Envío preparado para 1374 destinatarios");
    }

    #[test]
    fn test_stale_image_failure_is_quiet() {
        let mut composer = test_composer();
        let Effect::ReadImage { token, .. } =
            update(&mut composer, Action::PickImageFile("a.png".into()))
        else {
            panic!("expected read");
        };
        update(&mut composer, Action::SetImage("https://ejemplo.com/b.jpg".into()));
        update(&mut composer, Action::ImageFailed { token, reason: "missing".into() });
        assert!(composer.status_message.is_empty());
        assert_eq!(composer.draft.image.as_deref(), Some("https://ejemplo.com/b.jpg"));

        let Effect::ReadImage { token, .. } =
            update(&mut composer, Action::PickImageFile("c.png".into()))
        else {
            panic!("expected read");
        };
        update(&mut composer, Action::ImageFailed { token, reason: "missing".into() });
        assert_eq!(composer.status_message, "No se pudo leer la imagen: missing");
        assert_eq!(composer.draft.image.as_deref(), Some("https://ejemplo.com/b.jpg"));
    }

    #[test]
    fn test_quit() {
        let mut composer = test_composer();
        assert_eq!(update(&mut composer, Action::Quit), Effect::Quit);
    }
}
