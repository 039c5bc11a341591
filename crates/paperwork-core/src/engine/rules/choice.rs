//! Choice membership rule
//!
//! Comparison is exact. A near miss is reported with a suggestion rather
//! than silently accepted.

use std::collections::BTreeSet;

use super::{Rule, ValidationIssue};
use crate::schema::{FieldDescriptor, FieldKind};

/// Checks non-empty choice fields hold one of their allowed values
#[derive(Debug, Clone, Default)]
pub struct ChoiceRule;

impl ChoiceRule {
    pub fn new() -> Self {
        Self
    }

    fn allowed_list(choices: &BTreeSet<String>) -> String {
        choices.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }

    /// Allowed values that only differ from `value` by case or surrounding whitespace
    fn near_misses<'a>(value: &str, choices: &'a BTreeSet<String>) -> Vec<&'a str> {
        let wanted = value.trim().to_lowercase();
        choices
            .iter()
            .filter(|c| c.trim().to_lowercase() == wanted)
            .map(String::as_str)
            .collect()
    }
}

impl Rule for ChoiceRule {
    fn id(&self) -> &str {
        "choice-member"
    }

    fn description(&self) -> &str {
        "Validates that choice values are from the allowed set"
    }

    fn applies_to(&self, field: &FieldDescriptor) -> bool {
        matches!(field.kind, FieldKind::Choice { .. })
    }

    fn check(&self, field: &FieldDescriptor) -> Option<ValidationIssue> {
        let FieldKind::Choice { choices } = &field.kind else {
            return None;
        };
        if field.is_blank() || choices.contains(&field.value) {
            return None;
        }

        let detail = if choices.is_empty() {
            format!("'{}' is not allowed: the field has no choices", field.value)
        } else {
            let suggestions = Self::near_misses(&field.value, choices);
            if suggestions.is_empty() {
                format!(
                    "'{}' is not one of: {}",
                    field.value,
                    Self::allowed_list(choices)
                )
            } else {
                format!(
                    "'{}' is not one of: {}. Did you mean: {}?",
                    field.value,
                    Self::allowed_list(choices),
                    suggestions.join(" or ")
                )
            }
        };

        Some(ValidationIssue::invalid_choice(&field.name, detail))
    }
}
