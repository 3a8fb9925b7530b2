//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! fall back to their defaults for any missing field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration for a client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// `User-Agent` sent by the default transport. `None` leaves it unset.
    pub user_agent: Option<String>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Headers added to every request that does not already carry them.
    pub default_headers: HashMap<String, String>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: Some(concat!("fetch-chain/", env!("CARGO_PKG_VERSION")).to_string()),
            timeouts: TimeoutConfig::default(),
            default_headers: HashMap::new(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Default per-call timeout (request and response headers) in seconds.
    pub request_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 60,
            connect_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Install the request id and logging middlewares.
    pub log_requests: bool,

    /// Install the metrics middleware.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_requests: true,
            metrics_enabled: false,
        }
    }
}
