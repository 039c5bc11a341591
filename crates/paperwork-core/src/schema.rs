//! Field schema model
//!
//! A [`FieldSchema`] is the normalized, ordered list of a document's fields.
//! Each [`FieldDescriptor`] carries a [`FieldKind`] variant, so the rule that
//! applies to a field is decided by its type rather than by probing its name.
//!
//! The serialized form is the document layout the extractor and writer use:
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "Full Name", "kind": "text", "required": true },
//!     { "name": "Date of Birth", "kind": "date", "value": "1990-04-01" },
//!     { "name": "Country", "kind": "choice", "choices": ["Canada", "USA"] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::error::{Result, SchemaError};

/// Returns true when a raw value carries no data (empty after trimming)
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Optional format hint for free-text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    /// Digits, spaces, dashes and plus signs
    Phone,
    /// Letters, digits, spaces and dashes
    PostalCode,
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFormat::Phone => write!(f, "phone"),
            TextFormat::PostalCode => write!(f, "postal_code"),
        }
    }
}

/// The type of a form field, with the data only that type needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<TextFormat>,
    },
    /// Calendar date written as `YYYY-MM-DD`
    Date,
    /// Boolean written as `true` / `false`
    Checkbox,
    /// One value out of a fixed set
    Choice {
        #[serde(default)]
        choices: BTreeSet<String>,
    },
}

impl FieldKind {
    /// Plain text without a format hint
    pub fn text() -> Self {
        FieldKind::Text { format: None }
    }

    /// Choice over the given values
    pub fn choice<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Choice {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Short lowercase name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Date => "date",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Choice { .. } => "choice",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single named, typed field of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Identifier, unique within the schema
    pub name: String,
    /// Field type
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Current raw value; empty when unset
    #[serde(default, deserialize_with = "deserialize_raw_value")]
    pub value: String,
    /// Whether an empty value is a defect
    #[serde(default)]
    pub required: bool,
}

impl FieldDescriptor {
    /// Create an optional, empty field of the given kind
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            value: String::new(),
            required: false,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::text())
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Checkbox)
    }

    pub fn choice<I, S>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FieldKind::choice(choices))
    }

    /// Set the current value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set a checkbox state, serialized as `"true"` / `"false"`
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.value = checked.to_string();
        self
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a format hint. Has no effect on non-text fields.
    pub fn with_format(mut self, hint: TextFormat) -> Self {
        if let FieldKind::Text { format } = &mut self.kind {
            *format = Some(hint);
        }
        self
    }

    /// Whether the field currently has no value
    pub fn is_blank(&self) -> bool {
        is_blank(&self.value)
    }
}

/// Accepts strings, booleans, numbers and null for a field value.
///
/// Extracted documents do not always keep values as strings; checkbox states
/// in particular tend to arrive as booleans.
fn deserialize_raw_value<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawValue {
        Text(String),
        Flag(bool),
        Integer(i64),
        Float(f64),
    }

    Ok(match Option::<RawValue>::deserialize(deserializer)? {
        Some(RawValue::Text(s)) => s,
        Some(RawValue::Flag(b)) => b.to_string(),
        Some(RawValue::Integer(i)) => i.to_string(),
        Some(RawValue::Float(f)) => f.to_string(),
        None => String::new(),
    })
}

/// Ordered field list of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
}

impl FieldSchema {
    /// Wrap an ordered list of descriptors.
    ///
    /// Naming invariants are not checked here; see [`FieldSchema::check`].
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a descriptor by exact name
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn push(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }

    pub fn into_fields(self) -> Vec<FieldDescriptor> {
        self.fields
    }

    /// Number of fields holding a value
    pub fn filled_count(&self) -> usize {
        self.fields.iter().filter(|f| !f.is_blank()).count()
    }

    /// Verify names are non-empty and unique
    pub fn check(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for (index, field) in self.fields.iter().enumerate() {
            if is_blank(&field.name) {
                return Err(SchemaError::EmptyName { index });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateName {
                    name: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<FieldDescriptor> for FieldSchema {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FieldSchema {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// How a resolved field obtained its final value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    /// Filled from the user profile
    Profile,
    /// Already present in the document
    Existing,
    /// Still empty
    Unfilled,
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSource::Profile => write!(f, "profile"),
            FieldSource::Existing => write!(f, "existing"),
            FieldSource::Unfilled => write!(f, "unfilled"),
        }
    }
}

/// A descriptor after autofill, with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedField {
    #[serde(flatten)]
    pub field: FieldDescriptor,
    pub source: FieldSource,
    /// Profile key the value was taken from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_key: Option<String>,
}

impl ResolvedField {
    pub fn existing(field: FieldDescriptor) -> Self {
        Self {
            field,
            source: FieldSource::Existing,
            profile_key: None,
        }
    }

    pub fn unfilled(field: FieldDescriptor) -> Self {
        Self {
            field,
            source: FieldSource::Unfilled,
            profile_key: None,
        }
    }

    pub fn from_profile(field: FieldDescriptor, key: impl Into<String>) -> Self {
        Self {
            field,
            source: FieldSource::Profile,
            profile_key: Some(key.into()),
        }
    }

    /// Provenance for a field taken as-is: existing if it has a value,
    /// unfilled otherwise
    pub fn as_is(field: FieldDescriptor) -> Self {
        if field.is_blank() {
            Self::unfilled(field)
        } else {
            Self::existing(field)
        }
    }

    pub fn name(&self) -> &str {
        &self.field.name
    }

    pub fn value(&self) -> &str {
        &self.field.value
    }

    pub fn kind(&self) -> &FieldKind {
        &self.field.kind
    }

    pub fn into_descriptor(self) -> FieldDescriptor {
        self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_accepts_unique_names() {
        let schema = FieldSchema::new(vec![
            FieldDescriptor::text("Full Name"),
            FieldDescriptor::date("Date of Birth"),
        ]);
        assert!(schema.check().is_ok());
    }

    #[test]
    fn test_check_rejects_duplicates() {
        let schema = FieldSchema::new(vec![
            FieldDescriptor::text("email"),
            FieldDescriptor::text("phone"),
            FieldDescriptor::text("email"),
        ]);
        assert_eq!(
            schema.check(),
            Err(SchemaError::DuplicateName {
                name: "email".to_string()
            })
        );
    }

    #[test]
    fn test_check_rejects_empty_name() {
        let schema = FieldSchema::new(vec![
            FieldDescriptor::text("email"),
            FieldDescriptor::text("  "),
        ]);
        assert_eq!(schema.check(), Err(SchemaError::EmptyName { index: 1 }));
    }

    #[test]
    fn test_with_format_only_applies_to_text() {
        let phone = FieldDescriptor::text("Phone").with_format(TextFormat::Phone);
        assert_eq!(
            phone.kind,
            FieldKind::Text {
                format: Some(TextFormat::Phone)
            }
        );

        let date = FieldDescriptor::date("Start").with_format(TextFormat::Phone);
        assert_eq!(date.kind, FieldKind::Date);
    }

    #[test]
    fn test_with_checked_serializes_booleans() {
        assert_eq!(FieldDescriptor::checkbox("Agree").with_checked(true).value, "true");
        assert_eq!(FieldDescriptor::checkbox("Agree").with_checked(false).value, "false");
    }

    #[test]
    fn test_deserialize_document() {
        let json = r#"{
            "fields": [
                { "name": "Full Name", "kind": "text", "required": true },
                { "name": "Phone", "kind": "text", "format": "phone", "value": "+1 555-0100" },
                { "name": "Agree", "kind": "checkbox", "value": true },
                { "name": "Age", "kind": "text", "value": 42 },
                { "name": "Start", "kind": "date", "value": null },
                { "name": "Country", "kind": "choice", "choices": ["USA", "Canada"] }
            ]
        }"#;
        let schema: FieldSchema = serde_json::from_str(json).unwrap();

        assert_eq!(schema.len(), 6);
        assert!(schema.fields()[0].required);
        assert_eq!(schema.fields()[0].value, "");
        assert_eq!(
            schema.fields()[1].kind,
            FieldKind::Text {
                format: Some(TextFormat::Phone)
            }
        );
        assert_eq!(schema.fields()[2].value, "true");
        assert_eq!(schema.fields()[3].value, "42");
        assert_eq!(schema.fields()[4].value, "");
        assert_eq!(schema.fields()[5].kind, FieldKind::choice(["Canada", "USA"]));
    }

    #[test]
    fn test_deserialize_yaml_document() {
        let yaml = "\
fields:
  - name: Subscribe
    kind: checkbox
    value: false
  - name: Postal Code
    kind: text
    format: postal_code
    required: true
";
        let schema: FieldSchema = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(schema.fields()[0].value, "false");
        assert_eq!(
            schema.fields()[1].kind,
            FieldKind::Text {
                format: Some(TextFormat::PostalCode)
            }
        );
        assert!(schema.fields()[1].required);
    }

    #[test]
    fn test_serialize_resolved_field_is_flat() {
        let resolved = ResolvedField::from_profile(
            FieldDescriptor::text("Email").with_value("a@example.com"),
            "email",
        );
        let value = serde_json::to_value(&resolved).unwrap();

        assert_eq!(value["name"], "Email");
        assert_eq!(value["kind"], "text");
        assert_eq!(value["value"], "a@example.com");
        assert_eq!(value["source"], "profile");
        assert_eq!(value["profile_key"], "email");
    }

    #[test]
    fn test_as_is_provenance() {
        let filled = ResolvedField::as_is(FieldDescriptor::text("a").with_value("x"));
        assert_eq!(filled.source, FieldSource::Existing);

        let blank = ResolvedField::as_is(FieldDescriptor::text("b").with_value("   "));
        assert_eq!(blank.source, FieldSource::Unfilled);
    }
}
