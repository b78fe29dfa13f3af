// --- File: crates/saas_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all crates of the service.
///
/// Each crate converts its own error into this one with `From<SpecificError> for SaasError`;
/// handlers return it and it renders as the JSON error envelope.
#[derive(Error, Debug)]
pub enum SaasError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during authentication or authorization
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to rate limiting
    #[error("Rate limited: {0}")]
    RateLimitError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Maps an error to the HTTP status code it should be reported with.
pub trait HttpStatusCode {
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SaasError {
    fn status_code(&self) -> u16 {
        match self {
            SaasError::HttpError(_) => 500,
            SaasError::ParseError(_) => 400,
            SaasError::ConfigError(_) => 500,
            SaasError::AuthError(_) => 401,
            SaasError::ExternalServiceError { .. } => 502,
            SaasError::NotFoundError(_) => 404,
            SaasError::RateLimitError(_) => 429,
            SaasError::InternalError(_) => 500,
        }
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> SaasError {
    SaasError::ConfigError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> SaasError {
    SaasError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
