//! CLI command definitions for paperwork
//!
//! Clap-based commands for resolving, filling, validating and inspecting
//! field-schema documents, and for explaining field names.

use clap::{Parser, Subcommand};
use paperwork_core::{
    Explain, FieldExtractor, FieldWriter, FormResolver, PromptExplainer, UserProfile,
};
use std::path::PathBuf;
use tracing::info;

use super::output::{
    render_explanations, render_report, render_reports, DocumentReport, Explanation, InspectOutput, OutputFormat,
};
use super::ExitCode;
use crate::batch;
use crate::config::{Settings, ENV_CONFIG};
use crate::error::Result;
use crate::loader::{load_glossary, FilledDocumentWriter, SchemaDocument};

/// Paperwork CLI
///
/// Fill form documents from a stored profile and report the fields that are
/// still missing or malformed.
#[derive(Parser, Debug)]
#[command(name = "paperwork")]
#[command(about = "Paperwork - fill forms from your profile and report what is missing", long_about = None)]
#[command(version)]
pub struct PaperworkCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all logging except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Settings file (defaults to ./paperwork.toml when present)
    #[arg(long, global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: PaperworkCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum PaperworkCommands {
    /// Resolve documents against the profile
    ///
    /// Fills every blank field the profile can answer, validates the result
    /// and prints one report per document. Several documents are resolved
    /// concurrently. JSON and YAML output is always a list of reports.
    Resolve {
        /// Field-schema documents (JSON, YAML or TOML)
        #[arg(short, long, required = true, num_args = 1..)]
        schema: Vec<PathBuf>,

        /// Profile file
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Treat unfilled optional fields as a failure
        #[arg(long)]
        strict: bool,

        /// Explain every field that has an issue
        #[arg(long)]
        explain: bool,
    },

    /// Resolve a document and write the filled copy
    ///
    /// The copy is written as `<name>_filled.<ext>` beside the source, or into
    /// the output directory.
    Fill {
        /// Field-schema document
        #[arg(short, long)]
        schema: PathBuf,

        /// Profile file
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Directory for the filled document
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Validate a document as it is, without a profile
    Validate {
        /// Field-schema document
        #[arg(short, long)]
        schema: PathBuf,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List the fields of a document
    Inspect {
        /// Field-schema document
        #[arg(short, long)]
        schema: PathBuf,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Explain what belongs in a field
    Explain {
        /// Field names
        #[arg(short, long, required = true, num_args = 1..)]
        field: Vec<String>,

        /// Glossary of known field explanations
        #[arg(short, long)]
        glossary: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/// Glossary when one is configured, otherwise the prompt explainer
pub fn load_explainer(settings: &Settings) -> Result<Box<dyn Explain>> {
    match &settings.glossary_path {
        Some(path) => Ok(Box::new(load_glossary(path)?)),
        None => Ok(Box::new(PromptExplainer)),
    }
}

/// Execute the resolve command
pub fn execute_resolve(
    schemas: &[PathBuf],
    settings: &Settings,
    strict: bool,
    explain: bool,
) -> Result<ExitCode> {
    let documents = schemas
        .iter()
        .map(SchemaDocument::open)
        .collect::<Result<Vec<_>>>()?;
    let profile = settings.load_profile()?;
    let explainer = if explain {
        Some(load_explainer(settings)?)
    } else {
        None
    };

    let resolved = batch::resolve_all(documents, profile.clone(), FormResolver::new())?;

    let reports = resolved
        .into_iter()
        .map(|doc| -> Result<DocumentReport> {
            let report =
                DocumentReport::new(doc.document.path(), &doc.schema, &profile, doc.resolution)?;
            Ok(match &explainer {
                Some(explainer) => report.with_explanations(explainer.as_ref()),
                None => report,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    render_reports(&reports, settings.format)?;
    Ok(ExitCode::from_reports(&reports, strict))
}

/// Execute the fill command
pub fn execute_fill(schema: PathBuf, settings: &Settings) -> Result<ExitCode> {
    let document = SchemaDocument::open(&schema)?;
    let profile = settings.load_profile()?;
    let fields = document.extract_fields()?;

    let resolution = FormResolver::new().resolve(&fields, &profile)?;
    let writer = FilledDocumentWriter::for_source(&document, settings.output_dir.as_deref());
    let written = writer.write_fields(&resolution.filled_schema())?;
    info!(path = %written.display(), "filled document written");

    let report = DocumentReport::new(document.path(), &fields, &profile, resolution)?
        .with_written_to(&written);
    render_report(&report, settings.format)?;

    Ok(ExitCode::from_reports(std::slice::from_ref(&report), false))
}

/// Execute the validate command
pub fn execute_validate(schema: PathBuf, settings: &Settings) -> Result<ExitCode> {
    let document = SchemaDocument::open(&schema)?;
    let fields = document.extract_fields()?;

    let resolution = FormResolver::new().check(&fields)?;
    let complete = resolution.is_complete();
    let report = DocumentReport::new(document.path(), &fields, &UserProfile::new(), resolution)?;
    render_report(&report, settings.format)?;

    Ok(ExitCode::from_issues(!complete))
}

/// Execute the inspect command
pub fn execute_inspect(schema: PathBuf, settings: &Settings) -> Result<ExitCode> {
    let document = SchemaDocument::open(&schema)?;
    let fields = document.extract_fields()?;
    fields.check()?;

    InspectOutput::new(document.path(), fields).render(settings.format)?;
    Ok(ExitCode::Success)
}

/// Execute the explain command
pub fn execute_explain(fields: &[String], settings: &Settings) -> Result<ExitCode> {
    let explainer = load_explainer(settings)?;
    let explanations: Vec<Explanation> = fields
        .iter()
        .map(|name| Explanation {
            field: name.clone(),
            explanation: explainer.explain(name),
        })
        .collect();

    render_explanations(&explanations, settings.format)?;
    Ok(ExitCode::Success)
}
