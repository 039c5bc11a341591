//! Required field rule
//!
//! Runs first in the default engine: a blank required field reports
//! `missing` and no format rule gets to look at it.

use super::{Rule, ValidationIssue};
use crate::schema::FieldDescriptor;

/// Flags required fields with no value, whatever their kind
#[derive(Debug, Clone, Default)]
pub struct RequiredRule;

impl RequiredRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for RequiredRule {
    fn id(&self) -> &str {
        "required"
    }

    fn description(&self) -> &str {
        "Validates that required fields have a value"
    }

    fn applies_to(&self, field: &FieldDescriptor) -> bool {
        field.required
    }

    fn check(&self, field: &FieldDescriptor) -> Option<ValidationIssue> {
        if !field.required || !field.is_blank() {
            return None;
        }

        Some(ValidationIssue::missing(
            &field.name,
            format!("required {} field '{}' is empty", field.kind, field.name),
        ))
    }
}
