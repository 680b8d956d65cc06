//! Tracing subscriber setup for embedding processes

use eyre::Result;
use tracing::info;

/// Initialize logging to stderr with an env-filter
///
/// Call once from the embedding process; library code only emits tracing
/// events and never installs a subscriber on its own.
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}
