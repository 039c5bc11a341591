//! Checkbox value rule

use super::{Rule, ValidationIssue};
use crate::schema::{FieldDescriptor, FieldKind};

/// Parse a checkbox value; only `true` / `false`, in any case
pub fn parse_checkbox(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Checks non-empty checkbox fields hold a boolean literal
#[derive(Debug, Clone, Default)]
pub struct CheckboxRule;

impl CheckboxRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for CheckboxRule {
    fn id(&self) -> &str {
        "checkbox-value"
    }

    fn description(&self) -> &str {
        "Validates that checkbox values are 'true' or 'false'"
    }

    fn applies_to(&self, field: &FieldDescriptor) -> bool {
        matches!(field.kind, FieldKind::Checkbox)
    }

    fn check(&self, field: &FieldDescriptor) -> Option<ValidationIssue> {
        if !self.applies_to(field) || field.is_blank() || parse_checkbox(&field.value).is_some() {
            return None;
        }

        Some(ValidationIssue::invalid_format(
            &field.name,
            format!("'{}' is not a checkbox value, expected 'true' or 'false'", field.value),
        ))
    }
}
