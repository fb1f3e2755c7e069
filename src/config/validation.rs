//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, cadence below deadline)
//! - Check URLs parse before any client is built
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::ClientConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `polling.interval_ms`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.api.base_url).is_err() {
        errors.push(ValidationError::new("api.base_url", "not a valid URL"));
    }
    if config.api.request_timeout_secs == 0 {
        errors.push(ValidationError::new("api.request_timeout_secs", "must be greater than 0"));
    }

    if config.polling.interval_ms == 0 {
        errors.push(ValidationError::new("polling.interval_ms", "must be greater than 0"));
    }
    if config.polling.timeout_ms == 0 {
        errors.push(ValidationError::new("polling.timeout_ms", "must be greater than 0"));
    } else if config.polling.timeout_ms < config.polling.interval_ms {
        errors.push(ValidationError::new(
            "polling.timeout_ms",
            "must not be shorter than polling.interval_ms",
        ));
    }

    if config.chain.enabled {
        if url::Url::parse(&config.chain.rpc_url).is_err() {
            errors.push(ValidationError::new("chain.rpc_url", "not a valid URL"));
        }
        for (i, failover) in config.chain.failover_urls.iter().enumerate() {
            if url::Url::parse(failover).is_err() {
                errors.push(ValidationError::new(
                    &format!("chain.failover_urls[{}]", i),
                    "not a valid URL",
                ));
            }
        }
        if config.chain.rpc_timeout_secs == 0 {
            errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
        }
        if config.chain.event_poll_interval_ms == 0 {
            errors.push(ValidationError::new(
                "chain.event_poll_interval_ms",
                "must be greater than 0",
            ));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
