use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::{LogFormat, LoggingConfig};

/// Filter directive for `config`: `filter` wins, otherwise the crate logs at
/// `level` and everything else at `warn`
pub fn filter_directive(config: &LoggingConfig) -> String {
    match &config.filter {
        Some(filter) if !filter.trim().is_empty() => filter.clone(),
        _ => format!("warn,media_lifecycle={}", config.level),
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter.
///
/// # Errors
/// Returns an error if the filter is invalid or a subscriber is already installed
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directive(config))
            .with_context(|| format!("invalid log filter for level `{}`", config.level))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        LogFormat::Compact => registry.with(tracing_subscriber::fmt::layer().compact()).try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    }
    .context("failed to install tracing subscriber")
}
