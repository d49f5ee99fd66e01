//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! main.rs
//!     → logging.rs (subscriber setup from ObservabilityConfig + RUST_LOG)
//!
//! Producers:
//!     → http/server.rs (TraceLayer spans, gateway-level warnings)
//!     → transport/instrumented.rs (per-call span, latency, outcome)
//! ```
//!
//! # Design Decisions
//! - Structured field-style events via `tracing`
//! - The forwarder itself only emits trace-level events; failures are
//!   reported by whoever handles the returned error

pub mod logging;

pub use logging::init_logging;
