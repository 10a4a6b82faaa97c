//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the stats gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Outbound rate limiting toward the stats provider.
    pub rate_limit: RateLimitConfig,

    /// Stats provider settings.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Locations of the served pages and assets.
    pub static_files: StaticFilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Outbound rate limiting configuration.
///
/// A single gate is shared by every inbound request; there is no
/// per-client accounting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Spacing between permits in milliseconds.
    pub interval_ms: u64,

    /// Maximum time a request may wait for a permit before being shed
    /// with 429. `None` queues callers without bound.
    pub max_wait_secs: Option<u64>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3_000,
            max_wait_secs: None,
        }
    }
}

/// Stats provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the Tracker Network API.
    pub base_url: String,

    /// Environment variable holding the API credential.
    /// Read on every lookup, never stored in the config itself.
    pub token_env: String,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.fortnitetracker.com".to_string(),
            token_env: "FORTNITE_TRACKER_TOKEN".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Lookup timeout in seconds, covering the permit wait and the provider
    /// call. An expired lookup answers 500 with the sentinel body.
    pub request_secs: Option<u64>,
}

/// Directories holding the form page, widget page and assets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub assets_dir: String,
    pub pages_dir: String,
    pub templates_dir: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            assets_dir: "./assets".to_string(),
            pages_dir: "./pages".to_string(),
            templates_dir: "./templates".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.rate_limit.interval_ms, 3_000);
        assert!(config.rate_limit.max_wait_secs.is_none());
        assert_eq!(config.upstream.token_env, "FORTNITE_TRACKER_TOKEN");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [rate_limit]
            max_wait_secs = 30

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.rate_limit.interval_ms, 3_000);
        assert_eq!(config.rate_limit.max_wait_secs, Some(30));
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}
