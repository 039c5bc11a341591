//! Validation engine
//!
//! Runs an ordered list of rules over each field. The first rule that reports
//! an issue wins, so a field yields at most one issue. The default rule order
//! puts `required` first, which makes `missing` take precedence over every
//! format check.
//!
//! Validation never fails: an empty issue list is the success signal.

pub mod rules;

use std::sync::Arc;

use rules::{BoxedRule, Rule, ValidationIssue};
use tracing::trace;

use crate::schema::{FieldDescriptor, ResolvedField};

/// The core validation engine
#[derive(Clone)]
pub struct ValidationEngine {
    /// Registered rules, in evaluation order
    rules: Vec<Arc<dyn Rule>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("rules", &self.rule_ids())
            .finish()
    }
}

impl ValidationEngine {
    /// Create a new validation engine with the default rules
    pub fn new() -> Self {
        let mut engine = Self::empty();
        engine.register_default_rules();
        engine
    }

    /// Create an engine with no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    fn register_default_rules(&mut self) {
        // Must stay first: missing wins over format checks
        self.register(Arc::new(rules::RequiredRule::new()));

        self.register(Arc::new(rules::DateFormatRule::new()));
        self.register(Arc::new(rules::CheckboxRule::new()));
        self.register(Arc::new(rules::ChoiceRule::new()));
        self.register(Arc::new(rules::TextFormatRule::new()));
    }

    /// Append a rule; it runs after every rule already registered
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn register_boxed(&mut self, rule: BoxedRule) {
        self.rules.push(Arc::from(rule));
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.register(Arc::new(rule));
        self
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// First issue reported for a single field, if any
    pub fn check_field(&self, field: &FieldDescriptor) -> Option<ValidationIssue> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(field))
            .find_map(|rule| {
                let issue = rule.check(field);
                if issue.is_some() {
                    trace!(field = %field.name, rule = rule.id(), "rule reported an issue");
                }
                issue
            })
    }

    /// Validate a resolved field set. Issues follow input order.
    pub fn validate(&self, fields: &[ResolvedField]) -> Vec<ValidationIssue> {
        fields
            .iter()
            .filter_map(|resolved| self.check_field(&resolved.field))
            .collect()
    }

    /// Validate plain descriptors, e.g. a document as extracted
    pub fn validate_descriptors<'a, I>(&self, fields: I) -> Vec<ValidationIssue>
    where
        I: IntoIterator<Item = &'a FieldDescriptor>,
    {
        fields
            .into_iter()
            .filter_map(|field| self.check_field(field))
            .collect()
    }
}

/// Validate with the default rules
pub fn validate(fields: &[ResolvedField]) -> Vec<ValidationIssue> {
    ValidationEngine::new().validate(fields)
}
