//! Tracing subscriber setup for the binary

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log level for a `-v` count. `--quiet` wins over any count.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over flags.
///
/// Logs go to stderr so rendered reports on stdout stay parseable.
pub fn init_tracing(verbose: u8, quiet: bool, json: bool) {
    let level = level_for(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    // try_init: a subscriber may already be installed when embedded or under test
    if json {
        builder.json().try_init().ok();
    } else {
        builder.try_init().ok();
    }
}
