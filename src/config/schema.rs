//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the forwarder.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Listener configuration for the standalone gateway.
    pub listener: ListenerConfig,

    /// Resolved downstream target.
    pub downstream: DownstreamConfig,

    /// Transport selection and tuning.
    pub transport: TransportConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest inbound body buffered before forwarding.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Downstream target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Scheme, host, port and optional base path of the downstream service.
    pub target_url: String,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            target_url: "http://127.0.0.1:3000".to_string(),
        }
    }
}

/// Which production transport sends outbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// hyper-util pooled client, plain HTTP.
    #[default]
    Hyper,
    /// reqwest client, HTTP and HTTPS.
    Reqwest,
}

/// Transport tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    pub kind: TransportKind,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Deadline for a whole round trip in seconds (0 disables).
    pub request_timeout_secs: u64,

    /// How long idle pooled connections are kept, in seconds (0 keeps them forever).
    pub pool_idle_timeout_secs: u64,

    /// Maximum idle pooled connections per downstream host.
    pub pool_max_idle_per_host: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::Hyper,
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            pool_idle_timeout_secs: 90,
            pool_max_idle_per_host: 32,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Wrap the transport with per-call spans and latency events.
    pub instrument_transport: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            instrument_transport: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ForwarderConfig = toml::from_str(
            r#"
            [downstream]
            target_url = "https://api.internal:8443"

            [transport]
            kind = "reqwest"
            request_timeout_secs = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.downstream.target_url, "https://api.internal:8443");
        assert_eq!(config.transport.kind, TransportKind::Reqwest);
        assert_eq!(config.transport.request_timeout_secs, 0);
        assert_eq!(config.transport.connect_timeout_secs, 5);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.observability.instrument_transport);
    }

    #[test]
    fn test_unknown_transport_kind_rejected() {
        let result: Result<ForwarderConfig, _> = toml::from_str("[transport]\nkind = \"curl\"\n");
        assert!(result.is_err());
    }
}
