//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ForwarderConfig (validated, immutable)
//!     → consumed once at startup by main.rs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, ConfigError};
pub use schema::{
    DownstreamConfig, ForwarderConfig, ListenerConfig, ObservabilityConfig, TransportConfig,
    TransportKind,
};
pub use validation::{parse_target, validate_config, ValidationError};
