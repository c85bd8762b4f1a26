//! Tracing initialization.
//!
//! The library only emits `tracing` events. Hosts that do not install their
//! own subscriber can call [`init_tracing`] once at startup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::error::{ConfigError, Result};

/// Installs a formatted subscriber filtered by `config.log_level`.
///
/// Idempotent: if a global subscriber is already set, the call is a no-op.
/// Returns an error only when the filter directive does not parse.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = build_filter(config.log_directive())?;

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true));

    let _ = subscriber.try_init();
    Ok(())
}

fn build_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| {
        ConfigError::LogFilter {
            directive: directive.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
