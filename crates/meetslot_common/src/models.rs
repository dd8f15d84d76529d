// --- File: crates/meetslot_common/src/models.rs ---

// Data structures shared by the scheduling engine, the adapters and the HTTP layer.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of every slot and every booked meeting.
pub const SLOT_MINUTES: i64 = 30;

/// Returns the slot length as a chrono duration.
pub fn slot_duration() -> Duration {
    Duration::minutes(SLOT_MINUTES)
}

/// A bookable half-hour candidate.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Pre-conflict default is `true`; overwritten once by availability resolution.
    pub available: bool,
}

impl TimeSlot {
    /// Builds a free slot starting at `start`.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: start + slot_duration(),
            available: true,
        }
    }
}

/// An existing commitment reported by the remote calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Open-interval overlap: touching boundaries do not conflict.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}

/// A whole-day closure.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}

/// Incoming booking request as received on the wire.
///
/// Every field is optional here so that a missing value can be reported as a
/// validation error instead of a deserialization failure.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingRequest {
    #[cfg_attr(feature = "openapi", schema(example = "visitor@example.com"))]
    pub attendee_email: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "+1 303 555 0100"))]
    pub attendee_phone: Option<String>,
    /// RFC 3339 instant, or a local date-time in the business time zone.
    #[cfg_attr(feature = "openapi", schema(example = "2025-12-15T10:00:00-07:00"))]
    pub meeting_datetime: Option<String>,
    pub recording_consent: Option<bool>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// Video room attached to a booking.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceRef {
    pub id: String,
    pub join_url: String,
    pub password: Option<String>,
    /// Host link, only known right after creation; never persisted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_url: Option<String>,
}

/// A persisted booking.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub attendee_email: String,
    pub attendee_phone: Option<String>,
    pub meeting_datetime: DateTime<Utc>,
    pub duration_minutes: i64,
    pub recording_consent: bool,
    pub status: BookingStatus,
    pub conference: Option<ConferenceRef>,
    pub calendar_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.meeting_datetime + Duration::minutes(self.duration_minutes)
    }
}

/// Insert payload for the persistence sink; id and timestamps are assigned there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub attendee_email: String,
    pub attendee_phone: Option<String>,
    pub meeting_datetime: DateTime<Utc>,
    pub duration_minutes: i64,
    pub recording_consent: bool,
    pub status: BookingStatus,
    pub conference: Option<ConferenceRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn abutting_busy_interval_does_not_overlap() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 15, 0, 0).unwrap();
        let slot = TimeSlot::starting_at(start);
        let before = BusyInterval::new(start - Duration::hours(1), start);
        let after = BusyInterval::new(slot.end, slot.end + Duration::hours(1));
        assert!(!before.overlaps(slot.start, slot.end));
        assert!(!after.overlaps(slot.start, slot.end));
        assert!(BusyInterval::new(start, slot.end).overlaps(slot.start, slot.end));
    }

    #[test]
    fn booking_status_round_trips_through_str() {
        for status in [
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
        }
        assert!("pending".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn missing_request_fields_deserialize_as_none() {
        let request: BookingRequest =
            serde_json::from_str(r#"{"attendee_email":"a@b.co","recording_consent":null}"#)
                .expect("valid json");
        assert_eq!(request.attendee_email.as_deref(), Some("a@b.co"));
        assert!(request.meeting_datetime.is_none());
        assert!(request.recording_consent.is_none());
    }
}
