//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the downstream target URL and the bind address
//! - Reject an https target for the plain-HTTP hyper transport
//! - Validate value ranges (sizes and timeouts > 0, known log levels)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ForwarderConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{ForwarderConfig, TransportKind};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("downstream.target_url '{url}' is invalid: {reason}")]
    TargetUrl { url: String, reason: String },

    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    LogLevel(String),

    #[error("downstream.target_url '{0}' is https; transport.kind must be \"reqwest\"")]
    HttpsRequiresReqwest(String),
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &ForwarderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match parse_target(&config.downstream.target_url) {
        Ok(url) if url.scheme() == "https" && config.transport.kind == TransportKind::Hyper => {
            errors.push(ValidationError::HttpsRequiresReqwest(
                config.downstream.target_url.clone(),
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(e),
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::Zero {
            field: "listener.max_body_bytes",
        });
    }

    if config.transport.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "transport.connect_timeout_secs",
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a downstream target: http(s), with a host, without query or fragment.
pub fn parse_target(raw: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: &str| ValidationError::TargetUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }
    Ok(url)
}
