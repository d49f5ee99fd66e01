//! Production transport on the hyper-util pooled client.
//!
//! # Responsibilities
//! - Convert an `OutboundRequest` into a hyper request
//! - Send it over a pooled `HttpConnector` (plain HTTP)
//! - Buffer the response body and hand status, headers and bytes back as-is
//!
//! # Design Decisions
//! - The pool is owned by the client and shared by every in-flight call
//! - Connect timeout lives on the connector, the optional request deadline
//!   wraps the whole exchange
//! - Header names go out lowercased, as `http::HeaderMap` stores them

use std::time::Duration;

use async_trait::async_trait;
use axum::http::{Request, Uri};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio_util::sync::CancellationToken;

use crate::config::schema::TransportConfig;
use crate::http::{DownstreamResponse, OutboundRequest};
use crate::transport::{optional_secs, TransportClient, TransportError};

/// Pooled HTTP/1.1 transport.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    request_timeout: Option<Duration>,
}

impl HyperTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(optional_secs(config.connect_timeout_secs));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(optional_secs(config.pool_idle_timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build(connector);

        Self {
            client,
            request_timeout: optional_secs(config.request_timeout_secs),
        }
    }

    async fn exchange(
        &self,
        request: Request<Full<Bytes>>,
        url: &str,
    ) -> Result<DownstreamResponse, TransportError> {
        let response = self.client.request(request).await.map_err(|e| {
            if e.is_connect() {
                TransportError::Connect {
                    url: url.to_string(),
                    source: Box::new(e),
                }
            } else {
                TransportError::Request {
                    url: url.to_string(),
                    source: Box::new(e),
                }
            }
        })?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TransportError::MalformedResponse {
                url: url.to_string(),
                source: Box::new(e),
            })?
            .to_bytes();

        Ok(DownstreamResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

/// Turn an outbound request into a hyper request.
fn to_hyper_request(request: OutboundRequest) -> Result<Request<Full<Bytes>>, TransportError> {
    let invalid = |url: &str, source: crate::transport::BoxError| TransportError::InvalidRequest {
        url: url.to_string(),
        source,
    };

    let uri: Uri = request
        .url
        .parse()
        .map_err(|e| invalid(&request.url, Box::new(e)))?;
    let headers = request
        .headers
        .to_header_map()
        .map_err(|e| invalid(&request.url, Box::new(e)))?;

    let mut builder = Request::builder().method(request.method).uri(uri);
    if let Some(map) = builder.headers_mut() {
        *map = headers;
    }

    builder
        .body(Full::new(request.body.unwrap_or_default()))
        .map_err(|e| invalid(&request.url, Box::new(e)))
}

#[async_trait]
impl TransportClient for HyperTransport {
    async fn send(
        &self,
        request: OutboundRequest,
        cancel: &CancellationToken,
    ) -> Result<DownstreamResponse, TransportError> {
        let url = request.url.clone();
        let request = to_hyper_request(request)?;

        let timed = async {
            match self.request_timeout {
                Some(after) => tokio::time::timeout(after, self.exchange(request, &url))
                    .await
                    .unwrap_or_else(|_| {
                        Err(TransportError::Timeout {
                            url: url.clone(),
                            after,
                        })
                    }),
                None => self.exchange(request, &url).await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled { url: url.clone() }),
            result = timed => result,
        }
    }
}
