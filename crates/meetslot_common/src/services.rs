// --- File: crates/meetslot_common/src/services.rs ---
//! Service abstractions for the collaborators of the scheduling engine.
//!
//! The engine never talks to Google, Zoom or the database directly. It consumes
//! these traits, which keeps the orchestration testable with in-memory fakes and
//! lets the backend decide which concrete adapters to wire in.

use crate::models::{Booking, BusyInterval, ConferenceRef, NewBooking};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Failure reported by any collaborator.
///
/// Adapters map their own error enums into this one so the engine can decide
/// between "absorb and record" and "abort" without knowing the provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{service} did not answer within {seconds}s")]
    Timeout { service: String, seconds: u64 },

    #[error("{service} authentication failed: {message}")]
    Auth { service: String, message: String },

    #[error("{service} is unavailable: {message}")]
    Unavailable { service: String, message: String },

    #[error("{service} rejected the request: {message}")]
    Rejected { service: String, message: String },

    /// A uniqueness rule of the collaborator was violated.
    #[error("{service} reported a conflict: {message}")]
    Conflict { service: String, message: String },
}

impl ServiceError {
    pub fn unavailable(service: &str, message: impl ToString) -> Self {
        ServiceError::Unavailable {
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    pub fn rejected(service: &str, message: impl ToString) -> Self {
        ServiceError::Rejected {
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    pub fn auth(service: &str, message: impl ToString) -> Self {
        ServiceError::Auth {
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    pub fn conflict(service: &str, message: impl ToString) -> Self {
        ServiceError::Conflict {
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    /// Name of the collaborator that failed.
    pub fn service(&self) -> &str {
        match self {
            ServiceError::Timeout { service, .. }
            | ServiceError::Auth { service, .. }
            | ServiceError::Unavailable { service, .. }
            | ServiceError::Rejected { service, .. }
            | ServiceError::Conflict { service, .. } => service,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ServiceError::Conflict { .. })
    }
}

/// Recording mode requested from the conference provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingMode {
    Cloud,
    None,
}

impl RecordingMode {
    /// Recording only happens with the attendee's explicit consent.
    pub fn from_consent(consent: bool) -> Self {
        if consent {
            RecordingMode::Cloud
        } else {
            RecordingMode::None
        }
    }
}

/// Parameters for a new conference room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRequest {
    pub topic: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub recording: RecordingMode,
    /// IANA zone the provider should display the meeting in.
    pub time_zone: String,
}

/// Parameters for the calendar entry of a persisted booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventRequest {
    /// Persisted booking id, recorded on the event so it can be traced back.
    pub booking_id: i64,
    pub attendee_email: String,
    pub summary: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub time_zone: String,
}

/// Reads the existing commitments of the remote calendar.
pub trait BusyTimeSource: Send + Sync {
    /// Busy intervals intersecting `[start, end)`.
    fn busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, ServiceError>;
}

/// Creates and releases video conference rooms.
pub trait ConferenceService: Send + Sync {
    fn create_room(&self, request: MeetingRequest) -> BoxFuture<'_, ConferenceRef, ServiceError>;

    /// Deletes a room that is no longer backed by a booking.
    fn release_room(&self, room_id: &str) -> BoxFuture<'_, (), ServiceError>;
}

/// Creates calendar entries for bookings.
pub trait CalendarEventService: Send + Sync {
    /// Returns the provider's opaque event id.
    fn create_event(&self, event: CalendarEventRequest) -> BoxFuture<'_, String, ServiceError>;
}

/// Persistence sink for bookings.
pub trait BookingStore: Send + Sync {
    /// Inserts a booking. A second confirmed booking for the same
    /// `meeting_datetime` must fail with [`ServiceError::Conflict`].
    fn insert(&self, booking: NewBooking) -> BoxFuture<'_, Booking, ServiceError>;

    /// Records the calendar event id on an existing booking.
    fn attach_calendar_event(
        &self,
        booking_id: i64,
        event_id: &str,
    ) -> BoxFuture<'_, Booking, ServiceError>;
}
