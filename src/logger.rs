//! Logging setup for the command-line tool.
//!
//! Verbosity is chosen in this order: `--verbose` (debug), `--quiet` (errors only),
//! the `RUST_LOG` environment variable, then info level for this crate.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATE_TARGET: &str = "directive_bundler";

/// Build the filter selected by the verbosity flags.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(format!("{CRATE_TARGET}=debug"))
    } else if quiet {
        EnvFilter::new(format!("{CRATE_TARGET}=error"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{CRATE_TARGET}=info")))
    }
}

/// Install the global subscriber. Logs go to stderr so bundle output on stdout stays clean.
///
/// Calling this more than once leaves the first subscriber in place.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}
