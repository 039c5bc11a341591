//! CLI module for paperwork
//!
//! Command definitions, settings assembly and exit-code mapping. Rendering
//! lives in `output`.

pub mod commands;
pub mod output;

pub use commands::{PaperworkCli, PaperworkCommands};
pub use output::{DocumentReport, OutputFormat};

use std::path::Path;

use crate::config::{Settings, SettingsBuilder};
use crate::error::{CliError, Result};

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every document is complete
    Success = 0,
    /// At least one issue remains
    IssuesFound = 1,
    /// No issues, but optional fields were left unfilled
    Incomplete = 2,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Duplicate or empty field names in a document
    SchemaError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    pub fn from_issues(has_issues: bool) -> Self {
        if has_issues {
            ExitCode::IssuesFound
        } else {
            ExitCode::Success
        }
    }

    /// Exit code for a set of reports. `strict` treats unfilled optional
    /// fields as issues.
    pub fn from_reports(reports: &[DocumentReport], strict: bool) -> Self {
        if reports.iter().any(|r| !r.complete) {
            ExitCode::IssuesFound
        } else if reports.iter().any(DocumentReport::has_unfilled_optional) {
            if strict {
                ExitCode::IssuesFound
            } else {
                ExitCode::Incomplete
            }
        } else {
            ExitCode::Success
        }
    }

    /// Exit code for an error that ended the run
    pub fn for_error(error: &CliError) -> Self {
        match error {
            CliError::InvalidInput(_) | CliError::ParseError(_) => ExitCode::InvalidInput,
            CliError::FileError(_) => ExitCode::FileError,
            CliError::Schema(_) => ExitCode::SchemaError,
            CliError::SerializationError(_) | CliError::InternalError(_) => {
                ExitCode::InternalError
            }
        }
    }
}

/// Settings from the config file and environment, before command flags
fn base_settings(config: Option<&Path>) -> Result<SettingsBuilder> {
    Settings::builder().config_file(config)?.env()
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: PaperworkCli) -> Result<ExitCode> {
    let base = base_settings(cli.config.as_deref())?;

    match cli.command {
        PaperworkCommands::Resolve {
            schema,
            profile,
            format,
            strict,
            explain,
        } => {
            let settings = base.profile_path(profile).format(format).build();
            commands::execute_resolve(&schema, &settings, strict, explain)
        }
        PaperworkCommands::Fill {
            schema,
            profile,
            output_dir,
            format,
        } => {
            let settings = base
                .profile_path(profile)
                .output_dir(output_dir)
                .format(format)
                .build();
            commands::execute_fill(schema, &settings)
        }
        PaperworkCommands::Validate { schema, format } => {
            commands::execute_validate(schema, &base.format(format).build())
        }
        PaperworkCommands::Inspect { schema, format } => {
            commands::execute_inspect(schema, &base.format(format).build())
        }
        PaperworkCommands::Explain {
            field,
            glossary,
            format,
        } => {
            let settings = base.glossary_path(glossary).format(format).build();
            commands::execute_explain(&field, &settings)
        }
    }
}
