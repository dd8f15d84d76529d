// --- File: crates/meetslot_zoom/src/error.rs ---
use meetslot_common::services::ServiceError;
use meetslot_common::{HttpStatusCode, MeetslotError};
use thiserror::Error;

/// Name reported in service errors and degradations.
pub const SERVICE_NAME: &str = "zoom";

#[derive(Error, Debug)]
pub enum ZoomError {
    #[error("Zoom API request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Zoom authentication failed: {0}")]
    AuthError(String),
    #[error("Zoom API returned an error: Status={status}, Message='{message}'")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse Zoom API response: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Zoom configuration missing or incomplete: {0}")]
    ConfigError(String),
}

impl HttpStatusCode for ZoomError {
    fn status_code(&self) -> u16 {
        match self {
            ZoomError::ConfigError(_) => 500,
            _ => 502,
        }
    }
}

impl From<ZoomError> for ServiceError {
    fn from(err: ZoomError) -> Self {
        match &err {
            ZoomError::AuthError(_) | ZoomError::ConfigError(_) => {
                ServiceError::auth(SERVICE_NAME, err)
            }
            ZoomError::ApiError { status, .. } if (400..500).contains(status) => {
                ServiceError::rejected(SERVICE_NAME, err)
            }
            _ => ServiceError::unavailable(SERVICE_NAME, err),
        }
    }
}

impl From<ZoomError> for MeetslotError {
    fn from(err: ZoomError) -> Self {
        match err {
            ZoomError::ConfigError(message) => MeetslotError::ConfigError(message),
            other => meetslot_common::external_service_error(SERVICE_NAME, other),
        }
    }
}
