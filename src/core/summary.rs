//! # Derived Values
//!
//! Everything computed from the draft: character count and limit flags,
//! recipient total, estimated cost, step completion and whether the send
//! action is available.
//!
//! These are pure functions, recomputed on every frame. Nothing here is
//! stored, so nothing can drift from the draft it was computed from.

use crate::core::catalog::Catalog;
use crate::core::state::{AudienceMode, Composer, Draft};

/// Message length in characters.
pub fn character_count(message: &str) -> usize {
    message.chars().count()
}

/// More than 80% of the limit used.
pub fn is_near_limit(count: usize, max_characters: usize) -> bool {
    // Widened so huge configured limits cannot overflow
    (count as u128) * 5 > (max_characters as u128) * 4
}

pub fn is_over_limit(count: usize, max_characters: usize) -> bool {
    count > max_characters
}

/// Recipients the draft would reach. In list mode each selected list
/// contributes its catalog count (unknown ids contribute nothing); in
/// individual mode each selected contact counts once.
pub fn recipient_total(draft: &Draft, catalog: &Catalog) -> u64 {
    match draft.audience {
        AudienceMode::Lists => draft
            .selected_lists
            .iter()
            .filter_map(|id| catalog.list(id))
            .map(|list| u64::from(list.count))
            .sum(),
        AudienceMode::Individuals => draft.selected_contacts.len() as u64,
    }
}

pub fn estimated_cost(recipients: u64, unit_price: f64) -> f64 {
    recipients as f64 * unit_price
}

/// Dollar amount with two decimals, e.g. `$68.70`.
pub fn format_cost(amount: f64) -> String {
    format!("${amount:.2}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Audience,
    Message,
    Configuration,
    Content,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Audience, Step::Message, Step::Configuration, Step::Content];

    pub fn number(self) -> u8 {
        match self {
            Step::Audience => 1,
            Step::Message => 2,
            Step::Configuration => 3,
            Step::Content => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Audience => "Audiencia",
            Step::Message => "Mensaje",
            Step::Configuration => "Configuración",
            Step::Content => "Contenido",
        }
    }
}

/// Completion flag for each step, in order.
pub fn steps(draft: &Draft, max_characters: usize) -> [(Step, bool); 4] {
    let count = character_count(&draft.message);
    Step::ALL.map(|step| {
        let done = match step {
            Step::Audience => !draft.active_selection().is_empty(),
            Step::Message => count > 0 && !is_over_limit(count, max_characters),
            Step::Configuration => draft.expiration.is_some(),
            // Image is optional
            Step::Content => true,
        };
        (step, done)
    })
}

pub fn can_send(recipients: u64, over_limit: bool, has_expiration: bool) -> bool {
    recipients > 0 && !over_limit && has_expiration
}

/// All derived values for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub character_count: usize,
    pub max_characters: usize,
    pub near_limit: bool,
    pub over_limit: bool,
    pub recipients: u64,
    pub unit_price: f64,
    pub estimated_cost: f64,
    pub steps: [(Step, bool); 4],
    pub can_send: bool,
}

impl Summary {
    pub fn of(composer: &Composer) -> Self {
        let draft = &composer.draft;
        let max = composer.max_characters;
        let count = character_count(&draft.message);
        let over_limit = is_over_limit(count, max);
        let recipients = recipient_total(draft, &composer.catalog);
        Self {
            character_count: count,
            max_characters: max,
            near_limit: is_near_limit(count, max),
            over_limit,
            recipients,
            unit_price: composer.unit_price,
            estimated_cost: estimated_cost(recipients, composer.unit_price),
            steps: steps(draft, max),
            can_send: can_send(recipients, over_limit, draft.expiration.is_some()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{draft_with_lists, test_composer};
    use chrono::NaiveDate;

    #[test]
    fn test_character_count_is_exact_length() {
        assert_eq!(character_count(""), 0);
        assert_eq!(character_count("hola"), 4);
        assert_eq!(character_count("¡Aprovecha!"), 11);
    }

    #[test]
    fn test_over_limit_boundary() {
        assert!(!is_over_limit(160, 160));
        assert!(is_over_limit(161, 160));
    }

    #[test]
    fn test_near_limit_boundary() {
        assert!(!is_near_limit(128, 160));
        assert!(is_near_limit(129, 160));
    }

    #[test]
    fn test_near_limit_with_huge_limit() {
        assert!(!is_near_limit(1, usize::MAX));
        assert!(is_near_limit(usize::MAX, usize::MAX));
        assert!(!is_over_limit(usize::MAX, usize::MAX));
    }

    #[test]
    fn test_recipients_for_lists() {
        let catalog = Catalog::builtin();
        let draft = draft_with_lists(&["join", "mcp"]);
        let total = recipient_total(&draft, &catalog);
        assert_eq!(total, 1374);
        assert!((estimated_cost(total, 0.05) - 68.70).abs() < 1e-9);
        assert_eq!(format_cost(estimated_cost(total, 0.05)), "$68.70");
    }

    #[test]
    fn test_unknown_list_counts_zero() {
        let catalog = Catalog::builtin();
        assert_eq!(recipient_total(&draft_with_lists(&["ghost"]), &catalog), 0);
    }

    #[test]
    fn test_recipients_for_individuals() {
        let catalog = Catalog::builtin();
        let mut draft = draft_with_lists(&["join"]);
        draft.audience = AudienceMode::Individuals;
        draft.selected_contacts = vec!["contact1".into(), "contact9".into()];
        assert_eq!(recipient_total(&draft, &catalog), 2);
    }

    #[test]
    fn test_format_cost_zero() {
        assert_eq!(format_cost(0.0), "$0.00");
    }

    #[test]
    fn test_steps() {
        let mut draft = Draft::default();
        let done: Vec<bool> = steps(&draft, 160).iter().map(|(_, d)| *d).collect();
        assert_eq!(done, vec![false, true, false, true]);

        draft.selected_lists = vec!["tt".into()];
        draft.message = "x".repeat(161);
        draft.expiration = NaiveDate::from_ymd_opt(2026, 12, 1);
        let done: Vec<bool> = steps(&draft, 160).iter().map(|(_, d)| *d).collect();
        assert_eq!(done, vec![true, false, true, true]);

        draft.message.clear();
        assert!(!steps(&draft, 160)[1].1);
    }

    #[test]
    fn test_can_send_requires_all_three() {
        assert!(can_send(1, false, true));
        assert!(!can_send(0, false, true));
        assert!(!can_send(1, true, true));
        assert!(!can_send(1, false, false));
    }

    #[test]
    fn test_summary_of_composer() {
        let mut composer = test_composer();
        composer.draft.selected_lists = vec!["join".into(), "mcp".into()];
        composer.draft.message = "a".repeat(160);
        let summary = Summary::of(&composer);
        assert_eq!(summary.recipients, 1374);
        assert!(summary.near_limit);
        assert!(!summary.over_limit);
        assert!(!summary.can_send, "no expiration yet");

        composer.draft.expiration = NaiveDate::from_ymd_opt(2030, 1, 1);
        assert!(Summary::of(&composer).can_send);

        composer.draft.message.push('!');
        assert!(!Summary::of(&composer).can_send);
    }

    #[test]
    fn test_summary_ignores_product_and_image() {
        let mut composer = test_composer();
        composer.draft.selected_lists = vec!["devteam".into()];
        composer.draft.expiration = NaiveDate::from_ymd_opt(2030, 1, 1);
        composer.draft.product_id = None;
        composer.draft.image = None;
        assert!(Summary::of(&composer).can_send);
    }
}
