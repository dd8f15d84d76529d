// --- File: crates/meetslot_common/src/error.rs ---
use crate::services::ServiceError;
use std::fmt;
use thiserror::Error;

/// The base error type for all Meetslot errors.
///
/// Each crate keeps its own error enum and converts into this one at the
/// boundary where a single error type is needed (startup, HTTP mapping).
#[derive(Error, Debug)]
pub enum MeetslotError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already booked)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for MeetslotError {
    fn status_code(&self) -> u16 {
        match self {
            MeetslotError::ParseError(_) => 400,
            MeetslotError::ConfigError(_) => 500,
            MeetslotError::ValidationError(_) => 400,
            MeetslotError::DatabaseError(_) => 500,
            MeetslotError::ExternalServiceError { .. } => 502,
            MeetslotError::ConflictError(_) => 409,
            MeetslotError::TimeoutError(_) => 504,
            MeetslotError::InternalError(_) => 500,
        }
    }
}

impl From<ServiceError> for MeetslotError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Timeout { .. } => MeetslotError::TimeoutError(err.to_string()),
            ServiceError::Conflict { .. } => MeetslotError::ConflictError(err.to_string()),
            _ => external_service_error(err.service(), &err),
        }
    }
}

impl From<serde_json::Error> for MeetslotError {
    fn from(err: serde_json::Error) -> Self {
        MeetslotError::ParseError(err.to_string())
    }
}

/// Builds an [`MeetslotError::ExternalServiceError`].
pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> MeetslotError {
    MeetslotError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_conflict_maps_to_409() {
        let err: MeetslotError = ServiceError::conflict("bookings", "duplicate slot").into();
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn service_outage_maps_to_bad_gateway() {
        let err: MeetslotError = ServiceError::unavailable("zoom", "connection reset").into();
        assert_eq!(err.status_code(), 502);
        assert!(err.to_string().contains("zoom"));
    }

    #[test]
    fn timeout_maps_to_gateway_timeout() {
        let err: MeetslotError = ServiceError::Timeout {
            service: "google-calendar".to_string(),
            seconds: 10,
        }
        .into();
        assert_eq!(err.status_code(), 504);
    }
}
