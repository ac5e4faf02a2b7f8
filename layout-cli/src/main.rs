//! # Layout Editor
//!
//! Command-line entry point for the headless layout editor.

use clap::Parser;
use layout_cli::CliArgs;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,layout_core=debug,layout_cli=debug";

/// Send logs to stderr; stdout carries the exported snapshot.
///
/// `RUST_LOG_FORMAT=json` switches to one JSON record per line.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match std::env::var("RUST_LOG_FORMAT").as_deref() {
        Ok("json") => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    tracing::debug!("Arguments: {:?}", args);

    layout_cli::run(&args)
}
