//! Inbound → outbound translation.
//!
//! # Rules
//! - URL: target base (trailing `/` trimmed) + inbound path + raw query
//! - Method copied as-is, no case normalization
//! - Headers copied in order with their casing, except framing headers the
//!   transport owns (`Content-Length`, `Transfer-Encoding`)
//! - Cookies become one `Cookie: a=1; b=2` header replacing any copied one
//! - Body travels with its own content type; length is measured, not trusted

use axum::http::header;
use url::Url;

use crate::http::{CookieCollection, InboundRequest, OutboundRequest, QueryParams};

/// Headers recomputed from the actual body rather than copied.
const TRANSPORT_OWNED_HEADERS: [&str; 2] = ["content-length", "transfer-encoding"];

/// Build the outbound request for `inbound` against `target`.
pub fn build_outbound(inbound: &InboundRequest, target: &Url) -> OutboundRequest {
    let mut headers = inbound.headers().clone();
    for owned in TRANSPORT_OWNED_HEADERS {
        headers.remove(owned);
    }

    if let Some(cookie) = cookie_header(inbound.cookies()) {
        headers.insert(header::COOKIE.as_str(), cookie);
    }

    let body = inbound.body().map(|body| {
        if let Some(content_type) = &body.content_type {
            headers.insert(header::CONTENT_TYPE.as_str(), content_type.clone());
        }
        headers.insert(header::CONTENT_LENGTH.as_str(), body.bytes.len().to_string());
        body.bytes.clone()
    });

    OutboundRequest {
        method: inbound.method().clone(),
        url: outbound_url(target, inbound.path(), inbound.query()),
        headers,
        body,
    }
}

/// Join the resolved target with the inbound path and query.
pub fn outbound_url(target: &Url, path: &str, query: &QueryParams) -> String {
    let base = target.as_str().trim_end_matches('/');
    let mut url = String::with_capacity(base.len() + path.len() + 1);
    url.push_str(base);
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(path);

    if let Some(query) = query_string(query) {
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// Serialize query pairs in order; `None` if there are none.
pub fn query_string(query: &QueryParams) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    let joined = query
        .iter()
        .map(|(key, value)| match value {
            Some(value) => format!("{key}={value}"),
            None => key.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");
    Some(joined)
}

/// Serialize cookies as a single `Cookie` header value; `None` if empty.
///
/// A nameless cookie is written as its bare value.
pub fn cookie_header(cookies: &CookieCollection) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    let joined = cookies
        .iter()
        .map(|(name, value)| {
            if name.is_empty() {
                value.to_string()
            } else {
                format!("{name}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join("; ");
    Some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Request};

    fn target() -> Url {
        Url::parse("http://www.bbc.co.uk").unwrap()
    }

    #[test]
    fn test_method_is_preserved() {
        for method in [Method::GET, Method::POST, Method::from_bytes(b"get").unwrap()] {
            let inbound = InboundRequest::builder(method.clone(), "/").build();
            assert_eq!(build_outbound(&inbound, &target()).method, method);
        }
    }

    #[test]
    fn test_url_joins_target_and_path() {
        let inbound = InboundRequest::builder(Method::GET, "/news/world").build();
        assert_eq!(
            build_outbound(&inbound, &target()).url,
            "http://www.bbc.co.uk/news/world"
        );

        let empty = InboundRequest::builder(Method::GET, "").build();
        assert_eq!(build_outbound(&empty, &target()).url, "http://www.bbc.co.uk/");
    }

    #[test]
    fn test_url_keeps_target_base_path_and_port() {
        let target = Url::parse("http://10.0.0.7:8080/api/").unwrap();
        let inbound = InboundRequest::builder(Method::GET, "/users").build();
        assert_eq!(
            build_outbound(&inbound, &target).url,
            "http://10.0.0.7:8080/api/users"
        );
    }

    #[test]
    fn test_query_order_and_bare_keys() {
        let inbound = InboundRequest::builder(Method::POST, "/")
            .query("jeff", "1")
            .query("geoff", "2")
            .query_flag("debug")
            .query("jeff", "3")
            .build();

        let url = build_outbound(&inbound, &target()).url;
        assert_eq!(url, "http://www.bbc.co.uk/?jeff=1&geoff=2&debug&jeff=3");
    }

    #[test]
    fn test_query_forwarded_verbatim() {
        let inbound = InboundRequest::builder(Method::GET, "/search")
            .query("q", "a%20b")
            .query("tag", "x+y")
            .build();

        let url = build_outbound(&inbound, &target()).url;
        assert!(url.ends_with("/search?q=a%20b&tag=x+y"));
    }

    #[test]
    fn test_headers_copied_with_casing_and_order() {
        let inbound = InboundRequest::builder(Method::GET, "/")
            .header("ChopSticks", "Bubbles")
            .header("Accept", "text/html")
            .header("accept", "application/json")
            .build();

        let outbound = build_outbound(&inbound, &target());
        let pairs: Vec<_> = outbound.headers.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("ChopSticks", &b"Bubbles"[..]),
                ("Accept", &b"text/html"[..]),
                ("accept", &b"application/json"[..]),
            ]
        );
    }

    #[test]
    fn test_transport_owned_headers_are_recomputed() {
        let inbound = InboundRequest::builder(Method::POST, "/")
            .header("Content-Length", "999")
            .header("Transfer-Encoding", "chunked")
            .body("Hi from Tom", Some("text/plain"))
            .build();

        let outbound = build_outbound(&inbound, &target());
        let lengths: Vec<_> = outbound.headers.get_all("content-length").collect();
        assert_eq!(lengths, vec!["11"]);
        assert!(!outbound.headers.contains("transfer-encoding"));
    }

    #[test]
    fn test_no_body_means_no_content_length() {
        let inbound = InboundRequest::builder(Method::GET, "/")
            .header("Content-Length", "0")
            .build();

        let outbound = build_outbound(&inbound, &target());
        assert!(!outbound.headers.contains("content-length"));
        assert!(outbound.body.is_none());
    }

    #[test]
    fn test_cookies_serialized_into_one_header() {
        let inbound = InboundRequest::builder(Method::GET, "/")
            .header("Cookie", "stale=1")
            .header("X-Other", "kept")
            .cookie("TheCookie", "Monster")
            .cookie("second", "2")
            .build();

        let outbound = build_outbound(&inbound, &target());
        let cookies: Vec<_> = outbound.headers.get_all("cookie").collect();
        assert_eq!(cookies, vec!["TheCookie=Monster; second=2"]);
        assert_eq!(outbound.headers.get("x-other"), Some("kept"));
    }

    #[test]
    fn test_body_and_content_type_forwarded() {
        let inbound = InboundRequest::builder(Method::POST, "/")
            .header("Content-Type", "text/plain")
            .body("Hi from Tom", Some("application/json"))
            .build();

        let outbound = build_outbound(&inbound, &target());
        assert_eq!(outbound.body.as_deref(), Some(&b"Hi from Tom"[..]));
        let content_types: Vec<_> = outbound.headers.get_all("content-type").collect();
        assert_eq!(content_types, vec!["application/json"]);
    }

    #[test]
    fn test_body_without_content_type_keeps_inbound_header() {
        let inbound = InboundRequest::builder(Method::PUT, "/")
            .header("Content-Type", "application/xml")
            .body("<a/>", None)
            .build();

        let outbound = build_outbound(&inbound, &target());
        assert_eq!(outbound.headers.get("content-type"), Some("application/xml"));
    }

    #[test]
    fn test_helpers_return_none_when_empty() {
        assert_eq!(query_string(&QueryParams::new()), None);
        assert_eq!(cookie_header(&CookieCollection::new()), None);
    }

    #[test]
    fn test_captured_cookie_header_forwarded_as_sent() {
        let (parts, ()) = Request::builder()
            .uri("/account")
            .header("Cookie", "sid=specific; flag; sid=generic; note= padded ")
            .body(())
            .unwrap()
            .into_parts();
        let inbound = InboundRequest::from_parts(&parts, Default::default());

        let outbound = build_outbound(&inbound, &target());
        let cookies: Vec<_> = outbound.headers.get_all("cookie").collect();
        assert_eq!(cookies, vec!["sid=specific; flag; note= padded "]);
    }
}
