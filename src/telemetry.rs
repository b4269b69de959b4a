//! Structured logging setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Installs the global `tracing` subscriber.
///
/// An unparsable `directive` falls back to `info`. Calling this more than
/// once leaves the first subscriber in place.
pub fn init(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
