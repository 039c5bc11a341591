//! Paperwork CLI
//!
//! Command-line front end for `paperwork-core`. It supplies the file-backed
//! collaborators the engine leaves open: schema documents, the filled-document
//! writer, the profile store and the glossary.
//!
//! ## Architecture
//!
//! 1. **CLI** (`cli/`): clap commands, report rendering and exit codes.
//! 2. **Config** (`config`): layered run settings.
//! 3. **Loader** (`loader`): JSON, YAML and TOML documents, profiles and glossaries.
//! 4. **Batch** (`batch`): concurrent resolution of several documents.
//! 5. **Logging** (`logging`): tracing subscriber setup.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Resolve two forms against the default profile
//! paperwork resolve --schema tax.yaml visa.json
//!
//! # Write the filled copy of a form
//! paperwork fill --schema visa.json --profile me.yaml --output-dir filled/
//!
//! # Check a form as it is
//! paperwork validate --schema visa_filled.json --format json
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use clap::Parser;
//! use paperwork_cli::{run_cli, PaperworkCli};
//!
//! fn main() {
//!     let cli = PaperworkCli::parse();
//!     let exit_code = run_cli(cli);
//!     std::process::exit(exit_code.into());
//! }
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;

pub use cli::{ExitCode, OutputFormat, PaperworkCli, PaperworkCommands};
pub use config::Settings;
pub use error::{CliError, Result};
pub use loader::{FilledDocumentWriter, ProfileFile, SchemaDocument};

/// Run the CLI and map any error to its exit code
pub fn run_cli(cli: PaperworkCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::for_error(&e)
        }
    }
}
