//! Downstream request dispatch for an API gateway.
//!
//! Given a captured inbound request and a resolved downstream URL, the
//! [`RequestForwarder`] builds an equivalent outbound request, sends it through
//! a pluggable [`TransportClient`] and returns the downstream response as
//! received.

pub mod config;
pub mod forwarder;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod transport;

pub use config::ForwarderConfig;
pub use forwarder::{ForwardError, RequestForwarder};
pub use http::{DownstreamResponse, HttpServer, InboundRequest, OutboundRequest};
pub use lifecycle::Shutdown;
pub use transport::{TransportClient, TransportError};
