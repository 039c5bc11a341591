//! Paperwork CLI
//!
//! # Usage
//!
//! ```bash
//! paperwork resolve --schema form.json --profile me.yaml
//! paperwork fill --schema form.json --output-dir filled/
//! paperwork validate --schema form_filled.json
//! paperwork inspect --schema form.json --format yaml
//! paperwork explain --field "Date of Birth" --glossary terms.yaml
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success - every field is filled and valid
//! - 1: Issues remain
//! - 2: No issues, but optional fields are unfilled
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 5: Duplicate or empty field names
//! - 10: Internal error

use clap::Parser;
use paperwork_cli::{logging, run_cli, PaperworkCli};

fn main() {
    let cli = PaperworkCli::parse();

    logging::init_tracing(cli.verbose, cli.quiet, cli.log_json);

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
