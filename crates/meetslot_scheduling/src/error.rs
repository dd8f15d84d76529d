// --- File: crates/meetslot_scheduling/src/error.rs ---
use chrono::NaiveDate;
use meetslot_common::{HttpStatusCode, MeetslotError};
use thiserror::Error;

/// Problems with the business calendar or the window it is evaluated in.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Unknown time zone: {0}")]
    InvalidTimeZone(String),

    #[error("Invalid business window: {open_hour}:00 - {close_hour}:00")]
    InvalidWindow { open_hour: u32, close_hour: u32 },

    #[error("No business day within {days} days after {from}")]
    NoBusinessDay { from: NaiveDate, days: u32 },
}

impl HttpStatusCode for CalendarError {
    fn status_code(&self) -> u16 {
        match self {
            CalendarError::InvalidTimeZone(_) | CalendarError::InvalidWindow { .. } => 500,
            CalendarError::NoBusinessDay { .. } => 422,
        }
    }
}

impl From<CalendarError> for MeetslotError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::NoBusinessDay { .. } => MeetslotError::ValidationError(err.to_string()),
            _ => MeetslotError::ConfigError(err.to_string()),
        }
    }
}

/// Why a booking could not be created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The request was rejected before any side effect happened.
    #[error("Validation failed")]
    Validation(Vec<String>),

    /// Another confirmed booking already holds this start time.
    #[error("This time slot is no longer available")]
    SlotUnavailable,

    #[error("Failed to save booking: {0}")]
    Persistence(String),
}

impl BookingError {
    /// Granular reasons, empty unless the request failed validation.
    pub fn reasons(&self) -> &[String] {
        match self {
            BookingError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::Validation(_) => 400,
            BookingError::SlotUnavailable => 409,
            BookingError::Persistence(_) => 500,
        }
    }
}

impl From<BookingError> for MeetslotError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(errors) => MeetslotError::ValidationError(errors.join("; ")),
            BookingError::SlotUnavailable => MeetslotError::ConflictError(err.to_string()),
            BookingError::Persistence(message) => MeetslotError::DatabaseError(message),
        }
    }
}
