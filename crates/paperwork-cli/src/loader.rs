//! File-backed collaborators
//!
//! Field-schema documents, the filled-document writer, the profile store and
//! the glossary, all read from JSON, YAML or TOML files. The format is chosen
//! by file extension.
//!
//! # Profile layout
//!
//! A profile is a flat mapping. Nested tables are flattened with dots and
//! scalars are stringified:
//!
//! ```yaml
//! full_name: Ada Lovelace
//! address:
//!   line_1: 12 St James's Square   # -> "address.line_1"
//!   postal_code: SW1Y 4JH          # -> "address.postal_code"
//! newsletter: true                 # -> "true"
//! ```
//!
//! `null` entries are skipped. Arrays have no single fill value and are
//! skipped as well. TOML dates and datetimes are read as their text, so
//! `date_of_birth = 1815-12-10` gives `"1815-12-10"`.

use paperwork_core::{FieldExtractor, FieldSchema, FieldWriter, Glossary, ProfileStore, UserProfile};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{CliError, Result};

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "toml" => Ok(DocumentFormat::Toml),
            _ => Err(CliError::InvalidInput(format!(
                "Unsupported file format: '{}'. Supported formats: json, yaml, yml, toml",
                path.display()
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
            DocumentFormat::Toml => "toml",
        }
    }

    /// Parse file content in this format
    ///
    /// TOML goes through a JSON tree first so native datetimes reach the
    /// target type as plain strings.
    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        match self {
            DocumentFormat::Json => Ok(serde_json::from_str(content)?),
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            DocumentFormat::Toml => {
                let table: toml::Table = toml::from_str(content)?;
                serde_json::from_value(toml_to_json(toml::Value::Table(table)))
                    .map_err(|e| CliError::ParseError(format!("TOML error: {}", e)))
            }
        }
    }

    /// Serialize a value in this format
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            DocumentFormat::Json => serde_json::to_string_pretty(value)
                .map_err(|e| CliError::SerializationError(e.to_string())),
            DocumentFormat::Yaml => serde_yaml::to_string(value)
                .map_err(|e| CliError::SerializationError(e.to_string())),
            DocumentFormat::Toml => Ok(toml::to_string(value)?),
        }
    }
}

/// Convert a TOML tree to JSON. Datetimes become their TOML text.
fn toml_to_json(value: toml::Value) -> JsonValue {
    match value {
        toml::Value::String(s) => JsonValue::String(s),
        toml::Value::Integer(i) => JsonValue::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(f.to_string())),
        toml::Value::Boolean(b) => JsonValue::Bool(b),
        toml::Value::Datetime(dt) => JsonValue::String(dt.to_string()),
        toml::Value::Array(items) => {
            JsonValue::Array(items.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => JsonValue::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

fn read_file(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        CliError::FileError(format!(
            "Failed to read {} file '{}': {}",
            what,
            path.display(),
            e
        ))
    })
}

/// A field-schema document on disk
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    path: PathBuf,
    format: DocumentFormat,
}

impl SchemaDocument {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let format = DocumentFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }
}

impl FieldExtractor for SchemaDocument {
    type Error = CliError;

    fn extract_fields(&self) -> Result<FieldSchema> {
        let content = read_file(&self.path, "schema")?;
        let schema: FieldSchema = self.format.parse(&content).map_err(|e| {
            CliError::ParseError(format!("Invalid schema document '{}': {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), fields = schema.len(), "extracted fields");
        Ok(schema)
    }
}

/// Writes `<stem>_filled.<ext>` next to the source, or into an output directory.
/// `<ext>` is spelled as in the source path.
#[derive(Debug, Clone)]
pub struct FilledDocumentWriter {
    output_path: PathBuf,
    format: DocumentFormat,
}

impl FilledDocumentWriter {
    pub fn for_source(source: &SchemaDocument, output_dir: Option<&Path>) -> Self {
        let stem = source
            .path()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let extension = source
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_else(|| source.format().extension());
        let file_name = format!("{}_filled.{}", stem, extension);
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| source.path().parent().map(Path::to_path_buf))
            .unwrap_or_default();

        Self {
            output_path: dir.join(file_name),
            format: source.format(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl FieldWriter for FilledDocumentWriter {
    type Output = PathBuf;
    type Error = CliError;

    fn write_fields(&self, schema: &FieldSchema) -> Result<PathBuf> {
        let content = self.format.render(schema)?;

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CliError::FileError(format!(
                        "Failed to create output directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        std::fs::write(&self.output_path, content).map_err(|e| {
            CliError::FileError(format!(
                "Failed to write filled document '{}': {}",
                self.output_path.display(),
                e
            ))
        })?;

        debug!(path = %self.output_path.display(), "wrote filled document");
        Ok(self.output_path.clone())
    }
}

/// A user profile stored as a key/value file
#[derive(Debug, Clone)]
pub struct ProfileFile {
    path: PathBuf,
    format: DocumentFormat,
}

impl ProfileFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let format = DocumentFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl ProfileStore for ProfileFile {
    type Error = CliError;

    fn load_profile(&self) -> Result<UserProfile> {
        let content = read_file(&self.path, "profile")?;
        let value: JsonValue = self.format.parse(&content).map_err(|e| {
            CliError::ParseError(format!("Invalid profile '{}': {}", self.path.display(), e))
        })?;
        let profile = flatten_profile(value)?;
        debug!(path = %self.path.display(), entries = profile.len(), "loaded profile");
        Ok(profile)
    }
}

/// Flatten a parsed profile document into key/value pairs
pub fn flatten_profile(value: JsonValue) -> Result<UserProfile> {
    match value {
        JsonValue::Object(root) => {
            let mut entries = BTreeMap::new();
            flatten_object(&root, "", &mut entries);
            Ok(UserProfile::from(entries))
        }
        other => Err(CliError::ParseError(format!(
            "Profile must be a key/value mapping, found {}",
            json_type_name(&other)
        ))),
    }
}

fn flatten_object(
    obj: &serde_json::Map<String, JsonValue>,
    prefix: &str,
    result: &mut BTreeMap<String, String>,
) {
    for (key, value) in obj {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            JsonValue::Object(nested) => flatten_object(nested, &full_key, result),
            JsonValue::String(s) => {
                result.insert(full_key, s.clone());
            }
            JsonValue::Number(n) => {
                result.insert(full_key, n.to_string());
            }
            JsonValue::Bool(b) => {
                result.insert(full_key, b.to_string());
            }
            JsonValue::Array(_) => {
                warn!(key = %full_key, "skipping list value in profile");
            }
            JsonValue::Null => {}
        }
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Load a name -> explanation glossary
pub fn load_glossary(path: &Path) -> Result<Glossary> {
    let format = DocumentFormat::from_path(path)?;
    let content = read_file(path, "glossary")?;
    format.parse(&content).map_err(|e| {
        CliError::ParseError(format!("Invalid glossary '{}': {}", path.display(), e))
    })
}
