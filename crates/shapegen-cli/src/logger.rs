//! Logging setup for the shapegen CLI.
//!
//! The filter is chosen in this order:
//! 1. `--verbose`: debug for every shapegen crate
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. `settings.log_level` from the configuration
//! 5. info for every shapegen crate
//!
//! Log lines go to stderr so stdout stays free for command output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: [&str; 4] = ["shapegen_graph", "shapegen_config", "shapegen_core", "shapegen_cli"];

/// Build the filter directive enabling `level` for every shapegen crate.
pub fn directive(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Select the filter for the given flags and configured level.
pub fn filter(verbose: bool, quiet: bool, configured: Option<&str>) -> EnvFilter {
    if verbose {
        EnvFilter::new(directive("debug"))
    } else if quiet {
        EnvFilter::new(directive("error"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(directive(configured.unwrap_or("info"))))
    }
}

/// Install the global subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, configured: Option<&str>) {
    init_logger_with_filter(filter(verbose, quiet, configured), no_color);
}

/// Install the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
