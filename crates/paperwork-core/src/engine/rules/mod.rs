//! Rule framework for field validation
//!
//! A rule inspects one descriptor and reports at most one issue. Rules are
//! pure: no I/O, no state, the same descriptor always yields the same answer.

pub mod checkbox;
pub mod choice;
pub mod date;
pub mod required;
pub mod text_format;

pub use checkbox::CheckboxRule;
pub use choice::ChoiceRule;
pub use date::DateFormatRule;
pub use required::RequiredRule;
pub use text_format::TextFormatRule;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::FieldDescriptor;

/// Why a field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueReason {
    /// Required field with no value
    Missing,
    /// Value does not match the kind's format
    InvalidFormat,
    /// Value is not one of the allowed choices
    InvalidChoice,
}

impl fmt::Display for IssueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueReason::Missing => write!(f, "missing"),
            IssueReason::InvalidFormat => write!(f, "invalid_format"),
            IssueReason::InvalidChoice => write!(f, "invalid_choice"),
        }
    }
}

/// A single defect tied to one field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field_name: String,
    pub reason: IssueReason,
    /// Human-readable explanation
    pub detail: String,
}

impl ValidationIssue {
    pub fn new(field_name: impl Into<String>, reason: IssueReason, detail: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            reason,
            detail: detail.into(),
        }
    }

    pub fn missing(field_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(field_name, IssueReason::Missing, detail)
    }

    pub fn invalid_format(field_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(field_name, IssueReason::InvalidFormat, detail)
    }

    pub fn invalid_choice(field_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(field_name, IssueReason::InvalidChoice, detail)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] '{}': {}", self.reason, self.field_name, self.detail)
    }
}

/// Trait for implementing field validation rules
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &str;

    /// Description of what this rule validates
    fn description(&self) -> &str;

    /// Whether the rule has anything to say about this field
    fn applies_to(&self, _field: &FieldDescriptor) -> bool {
        true
    }

    /// Check one field, returning its defect if any
    fn check(&self, field: &FieldDescriptor) -> Option<ValidationIssue>;
}

/// A boxed rule for dynamic dispatch
pub type BoxedRule = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue::missing("Full Name", "required field is empty");
        assert_eq!(issue.to_string(), "[missing] 'Full Name': required field is empty");
    }

    #[test]
    fn test_reason_serialization() {
        let json = serde_json::to_string(&IssueReason::InvalidFormat).unwrap();
        assert_eq!(json, "\"invalid_format\"");
        let reason: IssueReason = serde_json::from_str("\"invalid_choice\"").unwrap();
        assert_eq!(reason, IssueReason::InvalidChoice);
    }

    #[test]
    fn test_reason_display_matches_serialization() {
        for reason in [IssueReason::Missing, IssueReason::InvalidFormat, IssueReason::InvalidChoice] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json.trim_matches('"'), reason.to_string());
        }
    }
}
