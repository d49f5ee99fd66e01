//! Tracing wrapper for any transport.
//!
//! Opens a `downstream_send` span per call and records the outcome with
//! latency. Requests and responses pass through untouched.

use std::time::Instant;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::http::{DownstreamResponse, OutboundRequest};
use crate::transport::{TransportClient, TransportError};

/// Wraps a transport and logs every call it makes.
pub struct InstrumentedTransport<T> {
    inner: T,
}

impl<T: TransportClient> InstrumentedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: TransportClient> TransportClient for InstrumentedTransport<T> {
    async fn send(
        &self,
        request: OutboundRequest,
        cancel: &CancellationToken,
    ) -> Result<DownstreamResponse, TransportError> {
        let span = tracing::info_span!(
            "downstream_send",
            method = %request.method,
            url = %request.url
        );

        async move {
            let start = Instant::now();
            let result = self.inner.send(request, cancel).await;
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match &result {
                Ok(response) => tracing::debug!(
                    status = response.status.as_u16(),
                    body_bytes = response.body.len(),
                    elapsed_ms,
                    "Downstream responded"
                ),
                Err(e) => tracing::warn!(error = %e, elapsed_ms, "Downstream call failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
