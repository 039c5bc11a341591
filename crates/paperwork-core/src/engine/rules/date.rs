//! Date format rule
//!
//! Dates are written literally as `YYYY-MM-DD`: a four-digit year, a month
//! in 01-12 and a day that exists in that month, leap years included.

use chrono::NaiveDate;

use super::{Rule, ValidationIssue};
use crate::schema::{FieldDescriptor, FieldKind};

/// Parse a strict `YYYY-MM-DD` date.
///
/// Rejects anything `chrono`'s lenient parsers would accept beyond the
/// literal pattern: signs, missing zero padding, surrounding whitespace.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_only = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 4 && *i != 7)
        .all(|(_, b)| b.is_ascii_digit());
    if !digits_only {
        return None;
    }

    let year: i32 = value[0..4].parse().ok()?;
    let month: u32 = value[5..7].parse().ok()?;
    let day: u32 = value[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Checks non-empty date fields against `YYYY-MM-DD`
#[derive(Debug, Clone, Default)]
pub struct DateFormatRule;

impl DateFormatRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DateFormatRule {
    fn id(&self) -> &str {
        "date-format"
    }

    fn description(&self) -> &str {
        "Validates that dates are real calendar dates written as YYYY-MM-DD"
    }

    fn applies_to(&self, field: &FieldDescriptor) -> bool {
        matches!(field.kind, FieldKind::Date)
    }

    fn check(&self, field: &FieldDescriptor) -> Option<ValidationIssue> {
        if !self.applies_to(field) || field.is_blank() {
            return None;
        }
        if parse_iso_date(&field.value).is_some() {
            return None;
        }

        Some(ValidationIssue::invalid_format(
            &field.name,
            format!("'{}' is not a valid date in YYYY-MM-DD format", field.value),
        ))
    }
}
