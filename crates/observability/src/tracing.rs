//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

use crate::TelemetryConfig;

/// Initialize tracing/logging for the process.
///
/// `RUST_LOG` wins over `config.log_level`. Safe to call multiple times
/// (subsequent calls are no-ops).
pub fn init(config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        ::tracing::debug!(json = config.json, "tracing initialized");
    }
}
