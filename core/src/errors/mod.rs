//! Domain-specific error types and error handling.

use thiserror::Error;

/// Core OTP engine errors
///
/// Validation and configuration errors are raised before any state is
/// written. Storage errors are fatal for the enclosing call. Gateway
/// failures are deliberately NOT part of this taxonomy: they are captured
/// as [`GatewayError`] and recorded on the OTP record instead of being
/// surfaced to the caller (best-effort dispatch).
#[derive(Error, Debug)]
pub enum OtpError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Invalid OTP configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("OTP has expired, try to request a new one")]
    Expired,

    #[error("Duplicate operation id: {operation_id}")]
    DuplicateKey { operation_id: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl OtpError {
    /// Shorthand for an `InvalidArgument` error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Shorthand for an `InvalidConfiguration` error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Shorthand for a `NotFound` error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }
}

/// Error returned by SMS/email gateways
///
/// Kept separate from [`OtpError`] so the engine can downgrade it to a
/// recorded `SendStatus::Failed` + error message on the record.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type OtpResult<T> = Result<T, OtpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = OtpError::invalid_argument("sendTo must be specified");
        assert!(err.to_string().contains("sendTo must be specified"));

        let err = OtpError::not_found("Otp");
        assert!(err.to_string().contains("Otp"));

        let err = OtpError::Expired;
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_gateway_error_preserves_message() {
        let err = GatewayError::new("sms provider unreachable");
        assert_eq!(err.to_string(), "sms provider unreachable");
    }
}
