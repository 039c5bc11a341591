//! Output formatting for the paperwork CLI
//!
//! Reports render as JSON, YAML, or a coloured human-readable table. Logs go
//! to stderr, so everything here writes to stdout.

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use paperwork_core::{
    Explain, FieldKind, FieldSchema, FieldSource, IssueReason, Resolution, ResolutionSummary,
    ResolvedField, UserProfile, ValidationIssue,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{CliError, Result};

/// Output format options for CLI results
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// SHA-256 over the schema and profile a report was computed from
pub fn inputs_hash(schema: &FieldSchema, profile: &UserProfile) -> Result<String> {
    let canonical = serde_json::to_vec(&(schema, profile))
        .map_err(|e| CliError::SerializationError(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}

/// Resolution report for one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Path of the schema document
    pub document: String,
    pub inputs_hash: String,
    /// No issues remain
    pub complete: bool,
    pub summary: ResolutionSummary,
    pub fields: Vec<ResolvedField>,
    pub issues: Vec<ValidationIssue>,
    /// Explanations for fields with issues, keyed by field name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub explanations: BTreeMap<String, String>,
    /// Where the filled document was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub written_to: Option<String>,
}

impl DocumentReport {
    pub fn new(
        document: &Path,
        schema: &FieldSchema,
        profile: &UserProfile,
        resolution: Resolution,
    ) -> Result<Self> {
        let summary = resolution.summary();
        let complete = resolution.is_complete();
        let (fields, issues) = resolution.into_parts();

        Ok(Self {
            document: document.display().to_string(),
            inputs_hash: inputs_hash(schema, profile)?,
            complete,
            summary,
            fields,
            issues,
            explanations: BTreeMap::new(),
            written_to: None,
        })
    }

    /// Attach an explanation for every field that has an issue
    pub fn with_explanations(mut self, explainer: &dyn Explain) -> Self {
        for issue in &self.issues {
            self.explanations
                .entry(issue.field_name.clone())
                .or_insert_with(|| explainer.explain(&issue.field_name));
        }
        self
    }

    pub fn with_written_to(mut self, path: &Path) -> Self {
        self.written_to = Some(path.display().to_string());
        self
    }

    /// Complete, but some optional fields are still empty
    pub fn has_unfilled_optional(&self) -> bool {
        self.summary.unfilled > self.summary.unfilled_required
    }

    /// Write the report as a table
    pub fn write_table<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", self.document.cyan().bold())?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out)?;

        let status = if self.complete {
            format!("{} All fields are filled and valid", "+".green())
        } else {
            format!(
                "{} {} issue(s) remaining",
                "x".red(),
                self.summary.issue_count()
            )
        };
        writeln!(out, "{}", status)?;

        writeln!(
            out,
            "  {} from profile, {} already present, {} unfilled ({} required)",
            self.summary.from_profile.to_string().green(),
            self.summary.existing,
            self.summary.unfilled.to_string().yellow(),
            self.summary.unfilled_required,
        )?;
        if let Some(path) = &self.written_to {
            writeln!(out, "  {} {}", "Written to:".dimmed(), path.cyan())?;
        }
        writeln!(out)?;

        if !self.fields.is_empty() {
            writeln!(out, "{}", "Fields:".cyan().bold())?;
            writeln!(out, "{}", "-".repeat(60))?;
            let width = name_width(self.fields.iter().map(|f| f.name()));
            for field in &self.fields {
                let marker = if field.field.required { "*" } else { " " };
                writeln!(
                    out,
                    "  {}{:<width$}  {:<8}  {:<8}  {}",
                    marker,
                    field.name(),
                    field.kind().name(),
                    source_label(field.source),
                    display_value(field.value()),
                    width = width,
                )?;
            }
            writeln!(out)?;
        }

        if !self.issues.is_empty() {
            writeln!(out, "{}", "Issues:".cyan().bold())?;
            writeln!(out, "{}", "-".repeat(60))?;
            for issue in &self.issues {
                writeln!(
                    out,
                    "  {} [{}] {}",
                    reason_label(issue.reason),
                    issue.field_name.bold(),
                    issue.detail
                )?;
                if let Some(explanation) = self.explanations.get(&issue.field_name) {
                    writeln!(out, "    {} {}", "About:".dimmed(), explanation)?;
                }
            }
            writeln!(out)?;
        }

        Ok(())
    }
}

/// Render the reports of a `resolve` run. JSON and YAML output is always a
/// list with one entry per document, even when only one was resolved.
pub fn render_reports(reports: &[DocumentReport], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let mut stdout = io::stdout();
            for report in reports {
                report.write_table(&mut stdout)?;
            }
            stdout.flush().ok();
            Ok(())
        }
        _ => print_serialized(reports, format),
    }
}

/// Render the report of a single-document command as one object
pub fn render_report(report: &DocumentReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let mut stdout = io::stdout();
            report.write_table(&mut stdout)?;
            stdout.flush().ok();
            Ok(())
        }
        _ => print_serialized(report, format),
    }
}

/// Field listing produced by `inspect`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectOutput {
    pub document: String,
    pub total_fields: usize,
    pub filled_fields: usize,
    pub required_fields: usize,
    pub schema: FieldSchema,
}

impl InspectOutput {
    pub fn new(document: &Path, schema: FieldSchema) -> Self {
        Self {
            document: document.display().to_string(),
            total_fields: schema.len(),
            filled_fields: schema.filled_count(),
            required_fields: schema.iter().filter(|f| f.required).count(),
            schema,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Table => {
                let mut stdout = io::stdout();
                self.write_table(&mut stdout)?;
                stdout.flush().ok();
                Ok(())
            }
            _ => print_serialized(self, format),
        }
    }

    pub fn write_table<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", self.document.cyan().bold())?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(
            out,
            "{} fields, {} filled, {} required",
            self.total_fields, self.filled_fields, self.required_fields
        )?;
        writeln!(out)?;

        let width = name_width(self.schema.iter().map(|f| f.name.as_str()));
        for field in &self.schema {
            let marker = if field.required { "*" } else { " " };
            writeln!(
                out,
                "  {}{:<width$}  {:<8}  {}",
                marker,
                field.name,
                field.kind.name(),
                display_value(&field.value),
                width = width,
            )?;
            match &field.kind {
                FieldKind::Choice { choices } if !choices.is_empty() => {
                    let listed: Vec<&str> = choices.iter().map(String::as_str).collect();
                    writeln!(out, "    {} {}", "Choices:".dimmed(), listed.join(", "))?;
                }
                FieldKind::Text {
                    format: Some(hint),
                } => {
                    writeln!(out, "    {} {}", "Format:".dimmed(), hint)?;
                }
                _ => {}
            }
        }
        writeln!(out)?;
        Ok(())
    }
}

/// One explained field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub field: String,
    pub explanation: String,
}

pub fn render_explanations(explanations: &[Explanation], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let mut stdout = io::stdout();
            for entry in explanations {
                writeln!(stdout, "{}", entry.field.cyan().bold())?;
                writeln!(stdout, "  {}", entry.explanation)?;
            }
            stdout.flush().ok();
            Ok(())
        }
        _ => print_serialized(&explanations, format),
    }
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|e| CliError::SerializationError(e.to_string())),
        _ => serde_json::to_string_pretty(value)
            .map_err(|e| CliError::SerializationError(e.to_string())),
    }
}

fn print_serialized<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    println!("{}", serialize(value, format)?);
    Ok(())
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).min(32)
}

fn display_value(value: &str) -> ColoredString {
    if value.trim().is_empty() {
        "(empty)".dimmed()
    } else {
        value.normal()
    }
}

fn source_label(source: FieldSource) -> ColoredString {
    match source {
        FieldSource::Profile => "profile".green(),
        FieldSource::Existing => "existing".normal(),
        FieldSource::Unfilled => "unfilled".yellow(),
    }
}

fn reason_label(reason: IssueReason) -> ColoredString {
    match reason {
        IssueReason::Missing => "MISSING".yellow().bold(),
        IssueReason::InvalidFormat => "INVALID".red().bold(),
        IssueReason::InvalidChoice => "CHOICE".red().bold(),
    }
}
