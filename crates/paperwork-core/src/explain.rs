//! Field explanations
//!
//! Explaining what a field means is a single name-to-text capability. The
//! engine never depends on how it is produced: a static glossary, a prompt
//! for a language model, or a closure in tests all fit behind [`Explain`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::profile::normalize_key;

/// Turns a field name into a human-readable explanation
pub trait Explain: Send + Sync {
    fn explain(&self, field_name: &str) -> String;
}

impl<F> Explain for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn explain(&self, field_name: &str) -> String {
        self(field_name)
    }
}

/// Produces a plain-language explanation request for a language model
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptExplainer;

impl Explain for PromptExplainer {
    fn explain(&self, field_name: &str) -> String {
        format!(
            "Please explain the meaning of the form field '{}' in plain language \
             so that a non-expert can understand what information belongs in this field.",
            field_name
        )
    }
}

/// Static explanations keyed by normalized field name.
///
/// Unknown names fall back to [`PromptExplainer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Glossary {
    entries: BTreeMap<String, String>,
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, explanation: impl Into<String>) -> Self {
        self.insert(name, explanation);
        self
    }

    /// Add an entry. Names that normalize to nothing are ignored.
    pub fn insert(&mut self, name: &str, explanation: impl Into<String>) {
        let key = normalize_key(name);
        if !key.is_empty() {
            self.entries.insert(key, explanation.into());
        }
    }

    /// Explanation for a field, if the glossary has one
    pub fn lookup(&self, field_name: &str) -> Option<&str> {
        self.entries.get(&normalize_key(field_name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, String>> for Glossary {
    fn from(raw: BTreeMap<String, String>) -> Self {
        let mut glossary = Self::new();
        for (name, explanation) in raw {
            glossary.insert(&name, explanation);
        }
        glossary
    }
}

impl From<Glossary> for BTreeMap<String, String> {
    fn from(glossary: Glossary) -> Self {
        glossary.entries
    }
}

impl Explain for Glossary {
    fn explain(&self, field_name: &str) -> String {
        self.lookup(field_name)
            .map(str::to_string)
            .unwrap_or_else(|| PromptExplainer.explain(field_name))
    }
}
