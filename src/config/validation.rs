//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval and timeout > 0)
//! - Reject empty paths and commands
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WatcherConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::WatcherConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("directory must not be empty")]
    EmptyDirectory,

    #[error("interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("resolve_timeout_secs must be greater than zero")]
    ZeroResolveTimeout,

    #[error("reload.command must not be empty")]
    EmptyReloadCommand,

    #[error("reload.argument must not be empty")]
    EmptyReloadArgument,

    #[error("invalid metrics_address {0:?}")]
    InvalidMetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &WatcherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.directory.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyDirectory);
    }
    if config.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.resolve_timeout_secs == 0 {
        errors.push(ValidationError::ZeroResolveTimeout);
    }
    if config.reload.command.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyReloadCommand);
    }
    if config.reload.argument.trim().is_empty() {
        errors.push(ValidationError::EmptyReloadArgument);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
