//! HTTP data model and the standalone gateway server.
//!
//! # Data Flow
//! ```text
//! client request
//!     → server.rs (Axum setup, body buffering)
//!     → inbound.rs (InboundRequest capture)
//!     → [forwarder builds OutboundRequest, transport sends it]
//!     → outbound.rs (DownstreamResponse → client response, unmodified)
//! ```

pub mod headers;
pub mod inbound;
pub mod outbound;
pub mod server;

pub use headers::{HeaderCollection, HeaderConversionError};
pub use inbound::{CookieCollection, InboundBody, InboundRequest, InboundRequestBuilder, QueryParams};
pub use outbound::{DownstreamResponse, OutboundRequest};
pub use server::HttpServer;
