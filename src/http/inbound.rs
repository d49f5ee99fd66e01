//! Captured inbound request.
//!
//! # Responsibilities
//! - Hold the request the gateway decided to proxy: method, path, query,
//!   headers, cookies and optional body
//! - Capture it from an `http::request::Parts` plus buffered body bytes
//! - Offer a builder for callers that assemble requests by hand (tests, CLI)
//!
//! # Design Decisions
//! - Immutable once built; fields are only reachable through accessors
//! - Query text is kept raw so it can be forwarded without re-encoding
//! - Cookie names are unique; re-adding a name replaces its value in place,
//!   while a captured header keeps the first value like servers read it
//! - Header values are captured as raw octets

use axum::http::request::Parts;
use axum::http::{header, Method};
use bytes::Bytes;

use crate::http::headers::HeaderCollection;

/// Ordered query parameters. `None` marks a bare key (`?flag`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a raw query string (without the leading `?`) into pairs.
    ///
    /// Text is kept as received; empty segments (`a=1&&b=2`) are skipped.
    pub fn parse(raw: &str) -> Self {
        let pairs = raw
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => (key.to_string(), Some(value.to_string())),
                None => (segment.to_string(), None),
            })
            .collect();
        Self { pairs }
    }

    pub fn push(&mut self, key: impl Into<String>, value: Option<String>) {
        self.pairs.push((key.into(), value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Request cookies in arrival order with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieCollection {
    cookies: Vec<(String, String)>,
}

impl CookieCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` header value (`a=1; b=2`) as the client sent it.
    ///
    /// Names and values are not trimmed. The first occurrence of a repeated
    /// name wins, and a segment without `=` is kept as a nameless cookie.
    pub fn parse_header(&mut self, raw: &str) {
        for segment in raw.split(';').map(str::trim_start) {
            if segment.is_empty() {
                continue;
            }
            match segment.split_once('=') {
                Some((name, value)) if !name.is_empty() => {
                    if self.get(name).is_none() {
                        self.cookies.push((name.to_string(), value.to_string()));
                    }
                }
                _ => self.cookies.push((String::new(), segment.to_string())),
            }
        }
    }

    /// Set `name` to `value`, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cookies.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.cookies.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// Request payload and its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundBody {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// A request received by the gateway, prior to forwarding.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    method: Method,
    path: String,
    query: QueryParams,
    headers: HeaderCollection,
    cookies: CookieCollection,
    body: Option<InboundBody>,
}

impl InboundRequest {
    /// Start building a request for `method` and `path`.
    pub fn builder(method: Method, path: impl Into<String>) -> InboundRequestBuilder {
        InboundRequestBuilder {
            request: InboundRequest {
                method,
                path: path.into(),
                query: QueryParams::new(),
                headers: HeaderCollection::new(),
                cookies: CookieCollection::new(),
                body: None,
            },
        }
    }

    /// Capture a request from its head and fully buffered body.
    ///
    /// An empty body is treated as absent.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        let headers = HeaderCollection::from(&parts.headers);

        let mut cookies = CookieCollection::new();
        for raw in headers.get_all(header::COOKIE.as_str()) {
            cookies.parse_header(raw);
        }

        let body = if body.is_empty() {
            None
        } else {
            Some(InboundBody {
                content_type: headers.get(header::CONTENT_TYPE.as_str()).map(str::to_string),
                bytes: body,
            })
        };

        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(QueryParams::parse).unwrap_or_default(),
            headers,
            cookies,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn headers(&self) -> &HeaderCollection {
        &self.headers
    }

    pub fn cookies(&self) -> &CookieCollection {
        &self.cookies
    }

    pub fn body(&self) -> Option<&InboundBody> {
        self.body.as_ref()
    }
}

/// Builder for [`InboundRequest`].
#[derive(Debug)]
pub struct InboundRequestBuilder {
    request: InboundRequest,
}

impl InboundRequestBuilder {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.append(name, value);
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.cookies.insert(name, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query.push(key, Some(value.into()));
        self
    }

    pub fn query_flag(mut self, key: impl Into<String>) -> Self {
        self.request.query.push(key, None);
        self
    }

    pub fn body(mut self, bytes: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        self.request.body = Some(InboundBody {
            bytes: bytes.into(),
            content_type: content_type.map(str::to_string),
        });
        self
    }

    pub fn build(self) -> InboundRequest {
        self.request
    }
}
