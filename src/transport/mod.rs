//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! RequestForwarder
//!     → TransportClient::send(OutboundRequest, cancel)
//!         → hyper_client.rs   (pooled HTTP/1.1 client, production default)
//!         → reqwest_client.rs (HTTP(S) client for TLS downstreams)
//!         → fake.rs           (in-memory, records requests, no I/O)
//!         → instrumented.rs   (tracing wrapper around any of the above)
//!     ← DownstreamResponse | TransportError
//! ```
//!
//! # Design Decisions
//! - One operation, no retries, no business logic
//! - Implementations are shared across concurrent calls (`Send + Sync`, `&self`)
//! - Connection pooling stays inside each implementation
//! - Cancellation is an explicit token so callers can abort an in-flight call

pub mod fake;
pub mod hyper_client;
pub mod instrumented;
pub mod reqwest_client;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::schema::{TransportConfig, TransportKind};
use crate::http::{DownstreamResponse, OutboundRequest};

pub use fake::FakeTransport;
pub use hyper_client::HyperTransport;
pub use instrumented::InstrumentedTransport;
pub use reqwest_client::ReqwestTransport;

/// Boxed cause carried by transport errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to complete a network round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    /// TCP connect or DNS resolution failed.
    #[error("connection to {url} failed: {source}")]
    Connect {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The configured transport deadline elapsed.
    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    /// The outbound request could not be turned into a wire request.
    #[error("request to {url} is invalid: {source}")]
    InvalidRequest {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The exchange failed after the connection was established.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The peer sent a response that could not be read.
    #[error("malformed response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The caller cancelled the call before a response arrived.
    #[error("request to {url} was cancelled")]
    Cancelled { url: String },
}

impl TransportError {
    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            TransportError::Connect { url, .. }
            | TransportError::Timeout { url, .. }
            | TransportError::InvalidRequest { url, .. }
            | TransportError::Request { url, .. }
            | TransportError::MalformedResponse { url, .. }
            | TransportError::Cancelled { url } => url,
        }
    }
}

/// Sends a fully-formed outbound request.
#[async_trait]
pub trait TransportClient: Send + Sync {
    /// Perform one network round trip.
    ///
    /// Returns [`TransportError::Cancelled`] if `cancel` fires first.
    async fn send(
        &self,
        request: OutboundRequest,
        cancel: &CancellationToken,
    ) -> Result<DownstreamResponse, TransportError>;
}

/// Errors raised while constructing a production transport.
#[derive(Debug, Error)]
pub enum TransportBuildError {
    #[error("failed to build reqwest client: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Build the production transport selected by `config`.
pub fn from_config(
    config: &TransportConfig,
    instrument: bool,
) -> Result<Arc<dyn TransportClient>, TransportBuildError> {
    let transport: Arc<dyn TransportClient> = match (config.kind, instrument) {
        (TransportKind::Hyper, false) => Arc::new(HyperTransport::new(config)),
        (TransportKind::Hyper, true) => {
            Arc::new(InstrumentedTransport::new(HyperTransport::new(config)))
        }
        (TransportKind::Reqwest, false) => Arc::new(ReqwestTransport::new(config)?),
        (TransportKind::Reqwest, true) => {
            Arc::new(InstrumentedTransport::new(ReqwestTransport::new(config)?))
        }
    };

    tracing::debug!(kind = ?config.kind, instrument, "Transport initialized");
    Ok(transport)
}

/// `Some(duration)` for a positive number of seconds.
pub(crate) fn optional_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exposes_url() {
        let err = TransportError::Cancelled {
            url: "http://downstream.local/a".into(),
        };
        assert_eq!(err.url(), "http://downstream.local/a");
        assert_eq!(err.to_string(), "request to http://downstream.local/a was cancelled");
    }

    #[test]
    fn test_timeout_display() {
        let err = TransportError::Timeout {
            url: "http://downstream.local/".into(),
            after: Duration::from_secs(3),
        };
        assert!(err.to_string().contains("timed out after 3s"));
    }

    #[test]
    fn test_optional_secs() {
        assert_eq!(optional_secs(0), None);
        assert_eq!(optional_secs(2), Some(Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_from_config_builds_both_kinds() {
        let mut config = TransportConfig::default();
        assert!(from_config(&config, true).is_ok());

        config.kind = TransportKind::Reqwest;
        assert!(from_config(&config, false).is_ok());
    }
}
