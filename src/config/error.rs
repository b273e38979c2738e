//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Server host '{0}' is not a valid address or hostname")]
    InvalidHost(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid backend URL format")]
    InvalidBackendUrl,

    #[error("Backend URL must use HTTPS when BACKEND__REQUIRE_HTTPS is set")]
    BackendMustBeHttps,

    #[error("Expected status for {operation} must be a 2xx code, got {status}")]
    InvalidExpectedStatus { operation: &'static str, status: u16 },

    #[error("Upload path must start with '/'")]
    InvalidUploadPath,

    #[error("Session TTL must be between one second and one year")]
    InvalidSessionTtl,

    #[error("Session cookie name is empty or contains invalid characters")]
    InvalidCookieName,

    #[error("Upload size limit must be greater than zero")]
    InvalidUploadLimit,
}
