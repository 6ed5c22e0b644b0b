//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub enum ValidationError {
    /// Bind address does not parse as a socket address.
    InvalidBindAddress(String),
    /// Backlog of zero would refuse every connection.
    ZeroBacklog,
    /// Log file path is empty.
    EmptyLogFile,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address: {}", addr)
            }
            ValidationError::ZeroBacklog => write!(f, "listener backlog must be at least 1"),
            ValidationError::EmptyLogFile => write!(f, "log file path must not be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Run all semantic checks over a deserialized config.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.backlog == 0 {
        errors.push(ValidationError::ZeroBacklog);
    }
    if config.observability.log_file.is_empty() {
        errors.push(ValidationError::EmptyLogFile);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
