//! Form plumbing shared by the book and author services

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::domain::Link;

pub const REQUIRED: &str = "This field is required.";
pub const DUPLICATE: &str = "Duplicate Name";
pub const INVALID_CHOICE: &str = "Not a valid choice";

/// Messages per form field
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One option of a multi-select
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: i32,
    pub label: String,
    pub selected: bool,
}

/// Mark which candidates are currently selected
pub fn mark_selected(candidates: Vec<Link>, selected: &[i32]) -> Vec<Choice> {
    let selected: HashSet<i32> = selected.iter().copied().collect();
    candidates
        .into_iter()
        .map(|c| Choice {
            selected: selected.contains(&c.id),
            id: c.id,
            label: c.label,
        })
        .collect()
}

/// Resolve submitted multi-select values against the candidates.
/// `None` when any value is not the id of a candidate.
pub fn parse_selection(raw: &[String], candidates: &[Link]) -> Option<Vec<i32>> {
    let known: HashSet<i32> = candidates.iter().map(|c| c.id).collect();
    raw.iter()
        .map(|value| {
            value
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|id| known.contains(id))
        })
        .collect()
}

/// Ids among the submitted values that parse, used when re-rendering
pub fn submitted_ids(raw: &[String]) -> Vec<i32> {
    raw.iter()
        .filter_map(|value| value.trim().parse().ok())
        .collect()
}

/// Result of a create-or-update submission
#[derive(Debug)]
pub enum FormOutcome<T, V> {
    Saved { record: T, created: bool },
    /// Re-render the form with its errors and the submitted values
    Invalid(V),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Link> {
        vec![
            Link {
                id: 1,
                label: "Evi Nemeth".to_string(),
            },
            Link {
                id: 2,
                label: "Garth Snyder".to_string(),
            },
            Link {
                id: 3,
                label: "Jack London".to_string(),
            },
        ]
    }

    #[test]
    fn marks_only_selected_candidates() {
        let choices = mark_selected(candidates(), &[3, 1, 42]);
        let selected: Vec<i32> = choices.iter().filter(|c| c.selected).map(|c| c.id).collect();
        assert_eq!(selected, vec![1, 3]);
        assert_eq!(choices.len(), 3);
    }

    #[test]
    fn selection_must_name_known_ids() {
        let raw = vec!["1".to_string(), " 3 ".to_string()];
        assert_eq!(parse_selection(&raw, &candidates()), Some(vec![1, 3]));
        assert_eq!(parse_selection(&[], &candidates()), Some(vec![]));

        let unknown = vec!["1".to_string(), "99".to_string()];
        assert_eq!(parse_selection(&unknown, &candidates()), None);

        let garbage = vec!["one".to_string()];
        assert_eq!(parse_selection(&garbage, &candidates()), None);
    }

    #[test]
    fn errors_collect_per_field() {
        let mut errors = FormErrors::default();
        assert!(errors.is_empty());
        errors.add("title", REQUIRED);
        errors.add("authors", INVALID_CHOICE);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["title"], serde_json::json!([REQUIRED]));
        assert_eq!(json["authors"][0], INVALID_CHOICE);
        assert!(json.get("name").is_none());
    }
}
