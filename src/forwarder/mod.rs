//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! gateway pipeline
//!     → RequestForwarder::forward(inbound, target)
//!     → build.rs (pure InboundRequest → OutboundRequest translation)
//!     → TransportClient::send
//!     ← DownstreamResponse (status, headers, body untouched)
//!     ← ForwardError::DownstreamUnavailable on transport failure
//! ```
//!
//! # Design Decisions
//! - Stateless: one linear build-send-return sequence per call, no locking
//! - 4xx/5xx responses are data, never errors
//! - Failures are returned to the caller; nothing is retried or swallowed

pub mod build;

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::http::{DownstreamResponse, InboundRequest};
use crate::transport::{TransportClient, TransportError};

pub use build::build_outbound;

/// Caller-facing forwarding failure.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The transport could not complete the round trip.
    #[error("downstream {url} unavailable: {source}")]
    DownstreamUnavailable {
        url: String,
        #[source]
        source: TransportError,
    },
}

impl ForwardError {
    /// Target URL of the failed call.
    pub fn url(&self) -> &str {
        match self {
            ForwardError::DownstreamUnavailable { url, .. } => url,
        }
    }
}

/// Forwards inbound requests to a resolved downstream target.
#[derive(Clone)]
pub struct RequestForwarder {
    transport: Arc<dyn TransportClient>,
}

impl RequestForwarder {
    pub fn new(transport: Arc<dyn TransportClient>) -> Self {
        Self { transport }
    }

    /// Forward `inbound` to `target` and return the downstream response as received.
    pub async fn forward(
        &self,
        inbound: &InboundRequest,
        target: &Url,
    ) -> Result<DownstreamResponse, ForwardError> {
        self.forward_with_cancel(inbound, target, &CancellationToken::new())
            .await
    }

    /// Like [`forward`](Self::forward), aborting the transport call when `cancel` fires.
    pub async fn forward_with_cancel(
        &self,
        inbound: &InboundRequest,
        target: &Url,
        cancel: &CancellationToken,
    ) -> Result<DownstreamResponse, ForwardError> {
        let outbound = build_outbound(inbound, target);
        let url = outbound.url.clone();

        tracing::trace!(method = %outbound.method, url = %url, "Forwarding request");

        self.transport
            .send(outbound, cancel)
            .await
            .map_err(|source| ForwardError::DownstreamUnavailable { url, source })
    }
}
