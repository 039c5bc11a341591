//! Error types for the resolution engine
//!
//! Only schema-level problems are errors. Ambiguous profile lookups and
//! validation defects are ordinary results, never `Err`.

use thiserror::Error;

/// A field schema that violates the naming invariants.
///
/// Raised before any output is produced, so callers never observe a
/// half-filled result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two descriptors share the same name
    #[error("Schema error: duplicate field name '{name}'")]
    DuplicateName { name: String },

    /// A descriptor has an empty (or whitespace-only) name
    #[error("Schema error: empty field name at position {index}")]
    EmptyName { index: usize },
}

impl SchemaError {
    /// Name of the offending field, if it has one
    pub fn field_name(&self) -> Option<&str> {
        match self {
            SchemaError::DuplicateName { name } => Some(name),
            SchemaError::EmptyName { .. } => None,
        }
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::DuplicateName {
            name: "Full Name".to_string(),
        };
        assert_eq!(err.to_string(), "Schema error: duplicate field name 'Full Name'");

        let err = SchemaError::EmptyName { index: 3 };
        assert_eq!(err.to_string(), "Schema error: empty field name at position 3");
    }

    #[test]
    fn test_field_name() {
        let err = SchemaError::DuplicateName {
            name: "email".to_string(),
        };
        assert_eq!(err.field_name(), Some("email"));
        assert_eq!(SchemaError::EmptyName { index: 0 }.field_name(), None);
    }
}
