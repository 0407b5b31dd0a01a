//! Configuration validation

use super::dialer::DialerConfig;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid buffer size: {0}")]
    InvalidBufferSize(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` variant describing the first invalid field.
    fn validate(&self) -> ConfigResult<()>;
}

impl Validator for DialerConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.user_agent.trim().is_empty() {
            return Err(ConfigurationError::InvalidParameter(
                "user_agent cannot be empty".to_string(),
            ));
        }

        // The value goes on the wire verbatim; CR/LF would break request framing.
        if self
            .user_agent
            .bytes()
            .any(|b| b == b'\r' || b == b'\n' || b == 0)
        {
            return Err(ConfigurationError::InvalidParameter(
                "user_agent contains control characters".to_string(),
            ));
        }

        if self.read_buffer_size < 256 {
            return Err(ConfigurationError::InvalidBufferSize(format!(
                "read_buffer_size must be at least 256 bytes, got {}",
                self.read_buffer_size
            )));
        }

        if self.max_response_headers == 0 {
            return Err(ConfigurationError::InvalidParameter(
                "max_response_headers cannot be zero".to_string(),
            ));
        }

        if let Some(timeout) = self.connect_timeout {
            if timeout.is_zero() {
                return Err(ConfigurationError::InvalidTimeout(
                    "connect_timeout cannot be zero".to_string(),
                ));
            }
        }

        if self.error_body_timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout(
                "error_body_timeout cannot be zero".to_string(),
            ));
        }

        Ok(())
    }
}
