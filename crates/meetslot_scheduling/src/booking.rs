// --- File: crates/meetslot_scheduling/src/booking.rs ---
//! Booking orchestration.
//!
//! A booking runs through four steps:
//!
//! 1. validation, which rejects the request without side effects;
//! 2. conference room creation, best-effort;
//! 3. persistence, which is authoritative and fatal on failure;
//! 4. calendar event creation, best-effort.
//!
//! Failures of the best-effort steps are logged and returned to the caller as
//! [`ServiceDegradation`]s so they can be reconciled later. When persistence
//! fails after a room was created, the room is released again.

use crate::error::BookingError;
use crate::external::{time_boxed, CALENDAR, CONFERENCE, PERSISTENCE};
use crate::validation::{BookingValidator, ValidatedBooking};
use meetslot_common::models::{
    Booking, BookingRequest, BookingStatus, ConferenceRef, NewBooking, SLOT_MINUTES,
};
use meetslot_common::services::{
    BookingStore, CalendarEventRequest, CalendarEventService, ConferenceService, MeetingRequest,
    RecordingMode, ServiceError,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn, Instrument};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::availability::DEFAULT_TIMEOUT;

/// An external failure that was absorbed while booking.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ServiceDegradation {
    pub service: String,
    pub message: String,
}

impl ServiceDegradation {
    fn from_error(err: &ServiceError) -> Self {
        Self {
            service: err.service().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub degradations: Vec<ServiceDegradation>,
}

pub struct BookingOrchestrator {
    validator: BookingValidator,
    store: Arc<dyn BookingStore>,
    conference: Option<Arc<dyn ConferenceService>>,
    calendar_events: Option<Arc<dyn CalendarEventService>>,
    timeout: Duration,
}

impl BookingOrchestrator {
    pub fn new(validator: BookingValidator, store: Arc<dyn BookingStore>) -> Self {
        Self {
            validator,
            store,
            conference: None,
            calendar_events: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_conference(mut self, conference: Arc<dyn ConferenceService>) -> Self {
        self.conference = Some(conference);
        self
    }

    pub fn with_calendar_events(mut self, calendar_events: Arc<dyn CalendarEventService>) -> Self {
        self.calendar_events = Some(calendar_events);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validator(&self) -> &BookingValidator {
        &self.validator
    }

    /// Turns a booking request into a persisted, confirmed booking.
    pub async fn create_booking(
        &self,
        request: BookingRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        let attempt = uuid::Uuid::new_v4();
        let span = tracing::info_span!("create_booking", %attempt);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: BookingRequest) -> Result<BookingConfirmation, BookingError> {
        let accepted = self.validator.accept(&request).map_err(|errors| {
            info!("Booking request rejected: {:?}", errors);
            BookingError::Validation(errors)
        })?;

        let mut degradations = Vec::new();

        let conference = match self.create_room(&accepted).await {
            Ok(room) => room,
            Err(e) => {
                warn!("Conference room creation failed, booking without one: {}", e);
                degradations.push(ServiceDegradation::from_error(&e));
                None
            }
        };

        let new_booking = NewBooking {
            attendee_email: accepted.attendee_email.clone(),
            attendee_phone: accepted.attendee_phone.clone(),
            meeting_datetime: accepted.meeting_datetime,
            duration_minutes: SLOT_MINUTES,
            recording_consent: accepted.recording_consent,
            status: BookingStatus::Confirmed,
            conference: conference.clone(),
        };

        let booking = match time_boxed(PERSISTENCE, self.timeout, self.store.insert(new_booking)).await
        {
            Ok(booking) => booking,
            Err(e) => {
                if let Some(room) = &conference {
                    self.release_room(room).await;
                }
                return Err(if e.is_conflict() {
                    info!("Slot {} was taken concurrently", accepted.meeting_datetime);
                    BookingError::SlotUnavailable
                } else {
                    error!("Failed to persist booking: {}", e);
                    BookingError::Persistence(e.to_string())
                });
            }
        };
        info!("Booking {} persisted", booking.id);

        let booking = match self.add_calendar_event(&booking).await {
            Ok(Some(updated)) => updated,
            Ok(None) => booking,
            Err(e) => {
                warn!("Calendar event for booking {} not recorded: {}", booking.id, e);
                degradations.push(ServiceDegradation::from_error(&e));
                booking
            }
        };

        Ok(BookingConfirmation {
            booking,
            degradations,
        })
    }

    async fn create_room(
        &self,
        accepted: &ValidatedBooking,
    ) -> Result<Option<ConferenceRef>, ServiceError> {
        let Some(conference) = &self.conference else {
            return Ok(None);
        };
        let request = MeetingRequest {
            topic: format!("Meeting with {}", accepted.attendee_email),
            start_time: accepted.meeting_datetime,
            duration_minutes: SLOT_MINUTES,
            recording: RecordingMode::from_consent(accepted.recording_consent),
            time_zone: self.validator.window().time_zone().name().to_string(),
        };
        let room = time_boxed(CONFERENCE, self.timeout, conference.create_room(request)).await?;
        debug!("Conference room {} created", room.id);
        Ok(Some(room))
    }

    async fn release_room(&self, room: &ConferenceRef) {
        let Some(conference) = &self.conference else {
            return;
        };
        match time_boxed(CONFERENCE, self.timeout, conference.release_room(&room.id)).await {
            Ok(()) => info!("Released orphaned conference room {}", room.id),
            Err(e) => warn!("Could not release orphaned conference room {}: {}", room.id, e),
        }
    }

    /// Creates the calendar event and records its id on the booking.
    async fn add_calendar_event(&self, booking: &Booking) -> Result<Option<Booking>, ServiceError> {
        let Some(calendar_events) = &self.calendar_events else {
            return Ok(None);
        };
        let event = CalendarEventRequest {
            booking_id: booking.id,
            attendee_email: booking.attendee_email.clone(),
            summary: format!("Meeting with {}", booking.attendee_email),
            description: event_description(booking),
            start_time: booking.meeting_datetime,
            end_time: booking.ends_at(),
            time_zone: self.validator.window().time_zone().name().to_string(),
        };
        let event_id = time_boxed(CALENDAR, self.timeout, calendar_events.create_event(event)).await?;
        debug!("Calendar event {} created", event_id);

        let updated = time_boxed(
            PERSISTENCE,
            self.timeout,
            self.store.attach_calendar_event(booking.id, &event_id),
        )
        .await
        .map_err(|e| ServiceError::Unavailable {
            service: CALENDAR.to_string(),
            message: format!("event {} created but not attached: {}", event_id, e),
        })?;
        Ok(Some(updated))
    }
}

fn event_description(booking: &Booking) -> String {
    let mut lines = vec![
        "Meeting scheduled via booking system.".to_string(),
        format!("Attendee: {}", booking.attendee_email),
        format!(
            "Phone: {}",
            booking.attendee_phone.as_deref().unwrap_or("Not provided")
        ),
        format!(
            "Recording consent: {}",
            if booking.recording_consent { "Yes" } else { "No" }
        ),
    ];
    if let Some(room) = &booking.conference {
        lines.push(format!("Join: {}", room.join_url));
    }
    lines.join("\n")
}
