//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router accepting any method on any path
//! - Buffer the inbound body up to the configured limit
//! - Capture the request and hand it to the forwarder
//! - Return the downstream response unmodified, or 502 when unavailable
//! - Stop accepting connections when the shutdown token fires

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::forwarder::{ForwardError, RequestForwarder};
use crate::http::inbound::InboundRequest;
use crate::lifecycle::Shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: RequestForwarder,
    pub target: Arc<Url>,
    pub max_body_bytes: usize,
}

/// Gateway server forwarding every request to one downstream target.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server forwarding to `target`.
    pub fn new(forwarder: RequestForwarder, target: Url, max_body_bytes: usize) -> Self {
        let state = AppState {
            forwarder,
            target: Arc::new(target),
            max_body_bytes,
        };

        Self {
            router: Self::build_router(state),
        }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Capture the request, forward it and relay the result.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                limit = state.max_body_bytes,
                error = %e,
                "Rejected inbound body"
            );
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let inbound = InboundRequest::from_parts(&parts, bytes);

    match state.forwarder.forward(&inbound, &state.target).await {
        Ok(response) => response.into_response(),
        Err(ForwardError::DownstreamUnavailable { url, source }) => {
            tracing::warn!(url = %url, error = %source, "Downstream unavailable");
            (StatusCode::BAD_GATEWAY, "Downstream unavailable").into_response()
        }
    }
}
