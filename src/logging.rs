//! Logging init for host programs and tests: tracing-subscriber fmt output
//! on stderr, filtered by `RUST_LOG` with a crate-debug default.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,loopretry=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global stderr subscriber. Fails if one is already set.
pub fn try_init_logging_stderr() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;
    tracing::debug!("loopretry logging initialized");
    Ok(())
}

/// Like [`try_init_logging_stderr`], but any install failure is ignored
/// (usually a subscriber that is already set) so it can be called from every
/// test. An unparsable `RUST_LOG` never fails either: it silently falls back
/// to `info,loopretry=debug`.
pub fn init_logging_stderr() {
    let _ = try_init_logging_stderr();
}
