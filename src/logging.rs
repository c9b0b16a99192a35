//! Tracing setup for the binary.
//!
//! Stdout belongs to the REPL (prompts, site lists, nearby places), so every
//! diagnostic goes to stderr. Cache hits and misses are `debug`/`info`
//! events under the `nps_explorer` target; skipped sites, cached error pages
//! and unusable cache files are `warn`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter,
/// e.g. `RUST_LOG=nps_explorer::fetch=debug` to watch the cache at work.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}
