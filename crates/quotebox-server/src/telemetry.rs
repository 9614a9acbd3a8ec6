//! Tracing subscriber setup.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. An unparsable level falls back
/// to `info` instead of failing startup.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
