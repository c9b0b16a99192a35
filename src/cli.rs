//! Command-line flags. With no flags the tool behaves as a plain REPL.

use std::path::PathBuf;

use clap::Parser;

/// Explore U.S. national park sites by state and find places nearby
#[derive(Parser, Debug)]
#[command(name = "nps-explorer")]
#[command(version)]
pub struct Cli {
    /// Path of the JSON response cache (overrides NPS_CACHE_PATH)
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// HTTP request timeout in seconds (overrides NPS_HTTP_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}
