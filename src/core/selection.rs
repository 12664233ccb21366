//! Multi-select bookkeeping shared by the audience selectors.
//!
//! Selections are id lists with set semantics: an id appears at most once and
//! membership is what matters. Insertion order is kept only so badges render
//! in the order the user picked them.

/// Returns the selection with `id` removed if present, or appended if absent.
pub fn toggle(selected: &[String], id: &str) -> Vec<String> {
    if selected.iter().any(|s| s == id) {
        selected.iter().filter(|s| *s != id).cloned().collect()
    } else {
        let mut next = selected.to_vec();
        next.push(id.to_string());
        next
    }
}

pub fn contains(selected: &[String], id: &str) -> bool {
    selected.iter().any(|s| s == id)
}
