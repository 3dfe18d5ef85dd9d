//! Tracing subscriber setup for the binary.
//!
//! The filter comes from `NOTELY_LOG`, then `RUST_LOG`, and defaults to
//! `warn`. Output goes to stderr so command output on stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "NOTELY_LOG";

/// Build the filter from the environment.
pub fn env_filter() -> EnvFilter {
    let directives = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
        .unwrap_or_default();

    EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .parse_lossy(directives)
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let subscriber = Registry::default().with(fmt_layer).with(env_filter());

    tracing::subscriber::set_global_default(subscriber)
}
