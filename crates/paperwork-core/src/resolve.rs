//! Resolution orchestrator
//!
//! The single entry point for collaborators: autofill a schema from a
//! profile, then validate the filled result. Validation always runs on the
//! complete autofill output, never on a partially filled set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::autofill::autofill;
use crate::engine::rules::{IssueReason, ValidationIssue};
use crate::engine::ValidationEngine;
use crate::error::Result;
use crate::profile::UserProfile;
use crate::schema::{FieldSchema, FieldSource, ResolvedField};

/// Filled fields and the defects remaining after autofill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub fields: Vec<ResolvedField>,
    pub issues: Vec<ValidationIssue>,
}

/// Counts over a [`Resolution`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub total_fields: usize,
    pub from_profile: usize,
    pub existing: usize,
    pub unfilled: usize,
    /// Unfilled fields that are also required
    pub unfilled_required: usize,
    pub issues_by_reason: BTreeMap<IssueReason, usize>,
}

impl ResolutionSummary {
    pub fn issue_count(&self) -> usize {
        self.issues_by_reason.values().sum()
    }
}

impl Resolution {
    /// The `(fields, issues)` pair
    pub fn into_parts(self) -> (Vec<ResolvedField>, Vec<ValidationIssue>) {
        (self.fields, self.issues)
    }

    /// No issues remain
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    /// Project the resolved fields back onto a schema for the document writer
    pub fn filled_schema(&self) -> FieldSchema {
        self.fields.iter().map(|f| f.field.clone()).collect()
    }

    /// Issues reported for one field
    pub fn issue_for(&self, field_name: &str) -> Option<&ValidationIssue> {
        self.issues.iter().find(|i| i.field_name == field_name)
    }

    /// Fields whose final value came from the given source
    pub fn fields_from(&self, source: FieldSource) -> impl Iterator<Item = &ResolvedField> {
        self.fields.iter().filter(move |f| f.source == source)
    }

    pub fn summary(&self) -> ResolutionSummary {
        let mut summary = ResolutionSummary {
            total_fields: self.fields.len(),
            ..Default::default()
        };

        for field in &self.fields {
            match field.source {
                FieldSource::Profile => summary.from_profile += 1,
                FieldSource::Existing => summary.existing += 1,
                FieldSource::Unfilled => {
                    summary.unfilled += 1;
                    if field.field.required {
                        summary.unfilled_required += 1;
                    }
                }
            }
        }
        for issue in &self.issues {
            *summary.issues_by_reason.entry(issue.reason).or_insert(0) += 1;
        }

        summary
    }
}

/// Autofill followed by validation, with a configurable rule set
#[derive(Debug, Clone, Default)]
pub struct FormResolver {
    engine: ValidationEngine,
}

impl FormResolver {
    /// Resolver with the default validation rules
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: ValidationEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// Resolve a schema against a profile.
    ///
    /// A [`SchemaError`](crate::SchemaError) from autofill is returned as is.
    pub fn resolve(&self, schema: &FieldSchema, profile: &UserProfile) -> Result<Resolution> {
        let fields = autofill(schema, profile)?;
        let issues = self.engine.validate(&fields);
        let resolution = Resolution { fields, issues };

        let summary = resolution.summary();
        info!(
            fields = summary.total_fields,
            from_profile = summary.from_profile,
            existing = summary.existing,
            unfilled = summary.unfilled,
            issues = summary.issue_count(),
            "resolved form"
        );

        Ok(resolution)
    }

    /// Validate a schema as-is, without any profile.
    ///
    /// Equivalent to resolving against an empty profile.
    pub fn check(&self, schema: &FieldSchema) -> Result<Resolution> {
        self.resolve(schema, &UserProfile::new())
    }
}

/// Resolve with the default rules and return the `(fields, issues)` pair
pub fn resolve(
    schema: &FieldSchema,
    profile: &UserProfile,
) -> Result<(Vec<ResolvedField>, Vec<ValidationIssue>)> {
    FormResolver::new()
        .resolve(schema, profile)
        .map(Resolution::into_parts)
}
