//! Transport-facing request and response types.

use axum::body::Body;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::http::headers::HeaderCollection;

/// A fully-formed request ready to hand to a transport.
///
/// Built fresh for each forwarded call and consumed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    /// Absolute URL, query included exactly as it will be sent.
    pub url: String,
    pub headers: HeaderCollection,
    pub body: Option<Bytes>,
}

/// Response received from the downstream service.
#[derive(Debug, Clone)]
pub struct DownstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl DownstreamResponse {
    /// A response with the given status, no headers and no body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

impl IntoResponse for DownstreamResponse {
    /// Status, headers and body are passed through untouched.
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
