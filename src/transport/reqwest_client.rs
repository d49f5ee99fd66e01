//! Production transport on `reqwest`, for downstreams reached over TLS.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::schema::TransportConfig;
use crate::http::{DownstreamResponse, OutboundRequest};
use crate::transport::{optional_secs, TransportClient, TransportError};

/// HTTP(S) transport backed by a pooled `reqwest::Client`.
///
/// Redirects are returned to the caller instead of being followed, and
/// environment proxies are ignored.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    request_timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, reqwest::Error> {
        let request_timeout = optional_secs(config.request_timeout_secs);

        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .pool_idle_timeout(optional_secs(config.pool_idle_timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host);
        if let Some(connect) = optional_secs(config.connect_timeout_secs) {
            builder = builder.connect_timeout(connect);
        }
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            request_timeout,
        })
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> TransportError {
        let url = url.to_string();
        if error.is_timeout() {
            TransportError::Timeout {
                url,
                after: self.request_timeout.unwrap_or_default(),
            }
        } else if error.is_builder() {
            TransportError::InvalidRequest {
                url,
                source: Box::new(error),
            }
        } else if error.is_connect() {
            TransportError::Connect {
                url,
                source: Box::new(error),
            }
        } else {
            TransportError::Request {
                url,
                source: Box::new(error),
            }
        }
    }

    async fn exchange(&self, request: OutboundRequest) -> Result<DownstreamResponse, TransportError> {
        let url = request.url;
        let headers = request
            .headers
            .to_header_map()
            .map_err(|e| TransportError::InvalidRequest {
                url: url.clone(),
                source: Box::new(e),
            })?;

        let mut builder = self.client.request(request.method, &url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.classify(&url, e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::MalformedResponse {
                url: url.clone(),
                source: Box::new(e),
            })?;

        Ok(DownstreamResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl TransportClient for ReqwestTransport {
    async fn send(
        &self,
        request: OutboundRequest,
        cancel: &CancellationToken,
    ) -> Result<DownstreamResponse, TransportError> {
        let url = request.url.clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled { url }),
            result = self.exchange(request) => result,
        }
    }
}
