//! Tracing/logging setup shared by binaries and test harnesses embedding the core.

use serde::{Deserialize, Serialize};

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Logging knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub log_level: String,
    /// JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: true,
        }
    }
}

/// Initialize process-wide tracing with defaults.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&TelemetryConfig::default());
}

/// Initialize process-wide tracing from configuration.
pub fn init_with(config: &TelemetryConfig) {
    tracing::init(config);
}
