//! In-memory transport for tests.
//!
//! Returns a programmed outcome without performing I/O and records every
//! request it was asked to send.

use std::io;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use axum::http::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::http::{DownstreamResponse, OutboundRequest};
use crate::transport::{TransportClient, TransportError};

#[derive(Debug, Clone)]
enum Outcome {
    Respond(DownstreamResponse),
    RefuseConnection,
}

/// Transport double that answers every call the same way.
#[derive(Debug)]
pub struct FakeTransport {
    outcome: Outcome,
    received: Mutex<Vec<OutboundRequest>>,
}

impl FakeTransport {
    /// Answer every call with `response`.
    pub fn responding(response: DownstreamResponse) -> Self {
        Self {
            outcome: Outcome::Respond(response),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with an empty response carrying `status`.
    pub fn with_status(status: StatusCode) -> Self {
        Self::responding(DownstreamResponse::new(status))
    }

    /// Fail every call as if the downstream refused the connection.
    pub fn refusing() -> Self {
        Self {
            outcome: Outcome::RefuseConnection,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn received(&self) -> Vec<OutboundRequest> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_received(&self) -> Option<OutboundRequest> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn call_count(&self) -> usize {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl TransportClient for FakeTransport {
    async fn send(
        &self,
        request: OutboundRequest,
        cancel: &CancellationToken,
    ) -> Result<DownstreamResponse, TransportError> {
        let url = request.url.clone();
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled { url });
        }

        match &self.outcome {
            Outcome::Respond(response) => Ok(response.clone()),
            Outcome::RefuseConnection => Err(TransportError::Connect {
                url,
                source: Box::new(io::Error::from(io::ErrorKind::ConnectionRefused)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    fn get(url: &str) -> OutboundRequest {
        OutboundRequest {
            method: Method::GET,
            url: url.to_string(),
            headers: Default::default(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_records_requests_in_order() {
        let fake = FakeTransport::with_status(StatusCode::OK);
        let cancel = CancellationToken::new();

        fake.send(get("http://a/1"), &cancel).await.unwrap();
        fake.send(get("http://a/2"), &cancel).await.unwrap();

        let urls: Vec<_> = fake.received().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["http://a/1", "http://a/2"]);
        assert_eq!(fake.call_count(), 2);
    }

    #[tokio::test]
    async fn test_refusing_reports_connect_error() {
        let fake = FakeTransport::refusing();
        let err = fake
            .send(get("http://a/"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Connect { .. }));
        assert_eq!(fake.last_received().unwrap().url, "http://a/");
    }
}
