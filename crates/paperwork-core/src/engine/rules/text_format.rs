//! Format hints for free-text fields
//!
//! Only text fields that declare a [`TextFormat`] are checked; plain text
//! accepts anything.

use super::{Rule, ValidationIssue};
use crate::schema::{FieldDescriptor, FieldKind, TextFormat};

/// Digits, spaces, `-` and `+`, with at least one digit
fn is_phone(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+'))
        && value.chars().any(|c| c.is_ascii_digit())
}

/// Letters, digits, spaces and `-`, with at least one letter or digit
fn is_postal_code(value: &str) -> bool {
    value.chars().all(|c| c.is_alphanumeric() || matches!(c, ' ' | '-'))
        && value.chars().any(char::is_alphanumeric)
}

/// Whether `value` satisfies the given hint
pub fn matches_format(format: TextFormat, value: &str) -> bool {
    match format {
        TextFormat::Phone => is_phone(value),
        TextFormat::PostalCode => is_postal_code(value),
    }
}

/// Checks non-empty hinted text fields
#[derive(Debug, Clone, Default)]
pub struct TextFormatRule;

impl TextFormatRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TextFormatRule {
    fn id(&self) -> &str {
        "text-format"
    }

    fn description(&self) -> &str {
        "Validates phone numbers and postal codes on text fields that declare a format"
    }

    fn applies_to(&self, field: &FieldDescriptor) -> bool {
        matches!(field.kind, FieldKind::Text { format: Some(_) })
    }

    fn check(&self, field: &FieldDescriptor) -> Option<ValidationIssue> {
        let FieldKind::Text {
            format: Some(format),
        } = &field.kind
        else {
            return None;
        };
        let format = *format;
        if field.is_blank() || matches_format(format, &field.value) {
            return None;
        }

        let expected = match format {
            TextFormat::Phone => "digits, spaces, '-' or '+'",
            TextFormat::PostalCode => "letters, digits, spaces or '-'",
        };
        Some(ValidationIssue::invalid_format(
            &field.name,
            format!("'{}' is not a valid {}: expected {}", field.value, format, expected),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rules::IssueReason;

    fn phone(value: &str) -> FieldDescriptor {
        FieldDescriptor::text("Phone").with_format(TextFormat::Phone).with_value(value)
    }

    fn postal(value: &str) -> FieldDescriptor {
        FieldDescriptor::text("Postal Code")
            .with_format(TextFormat::PostalCode)
            .with_value(value)
    }

    #[test]
    fn test_phone_numbers() {
        let rule = TextFormatRule::new();
        assert!(rule.check(&phone("+1 555-0100")).is_none());
        assert!(rule.check(&phone("020 7946 0000")).is_none());

        let issue = rule.check(&phone("call me")).unwrap();
        assert_eq!(issue.reason, IssueReason::InvalidFormat);
        assert!(rule.check(&phone("(555) 0100")).is_some());
        assert!(rule.check(&phone("+ -")).is_some());
    }

    #[test]
    fn test_postal_codes() {
        let rule = TextFormatRule::new();
        assert!(rule.check(&postal("SW1A 1AA")).is_none());
        assert!(rule.check(&postal("12345-6789")).is_none());
        assert!(rule.check(&postal("K1A#0B1")).is_some());
    }

    #[test]
    fn test_plain_text_is_not_checked() {
        let field = FieldDescriptor::text("Notes").with_value("anything at all: (!)");
        assert!(!TextFormatRule::new().applies_to(&field));
        assert!(TextFormatRule::new().check(&field).is_none());
    }
}
