//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → server stops accepting → in-flight forwards finish → exit
//! ```
//!
//! # Design Decisions
//! - One cancellation token fans out to every long-running task
//! - In-flight forwards are drained, not cancelled, on graceful shutdown

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
