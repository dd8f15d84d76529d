// --- File: crates/meetslot_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! Provides the busy-time reader and the booking-event writer used by the
//! scheduling engine, both backed by the same service-account hub.

use chrono::{DateTime, Utc};
use google_calendar3::api::{
    Event, EventAttendee, EventDateTime, EventExtendedProperties, FreeBusyRequest,
    FreeBusyRequestItem, FreeBusyResponse,
};
use meetslot_common::models::BusyInterval;
use meetslot_common::services::{
    BoxFuture, BusyTimeSource, CalendarEventRequest, CalendarEventService, ServiceError,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::HubType;

/// Name reported in service errors and degradations.
pub const SERVICE_NAME: &str = "google-calendar";

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Calendar {calendar_id} could not be read: {reason}")]
    CalendarUnreadable { calendar_id: String, reason: String },
    #[error("Calculation error: {0}")]
    CalculationError(String),
    #[error("Booking conflict")]
    Conflict,
    #[error("Google returned an event without an id")]
    MissingEventId,
}

impl From<GcalServiceError> for ServiceError {
    fn from(err: GcalServiceError) -> Self {
        match &err {
            GcalServiceError::ApiError(api) if is_auth_failure(api) => {
                ServiceError::auth(SERVICE_NAME, api)
            }
            GcalServiceError::ApiError(api) => ServiceError::unavailable(SERVICE_NAME, api),
            GcalServiceError::CalendarUnreadable { .. } | GcalServiceError::MissingEventId => {
                ServiceError::unavailable(SERVICE_NAME, err)
            }
            GcalServiceError::CalculationError(_) => ServiceError::rejected(SERVICE_NAME, err),
            GcalServiceError::Conflict => ServiceError::conflict(SERVICE_NAME, err),
        }
    }
}

/// Credentials missing, rejected or lacking permission on the calendar.
fn is_auth_failure(err: &google_calendar3::Error) -> bool {
    let denied = |code: u16| code == 401 || code == 403;
    match err {
        google_calendar3::Error::MissingAPIKey | google_calendar3::Error::MissingToken(_) => true,
        google_calendar3::Error::BadRequest(body) => body["error"]["code"]
            .as_u64()
            .is_some_and(|code| denied(code as u16)),
        google_calendar3::Error::Failure(response) => denied(response.status().as_u16()),
        _ => false,
    }
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
    calendar_id: String,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service for one calendar.
    pub fn new(calendar_hub: Arc<HubType>, calendar_id: impl Into<String>) -> Self {
        Self {
            calendar_hub,
            calendar_id: calendar_id.into(),
        }
    }

    /// Retrieves busy periods of the calendar between `start_time` and `end_time`,
    /// sorted by start.
    pub async fn get_busy_times(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, GcalServiceError> {
        let req = FreeBusyRequest {
            time_min: Some(start_time),
            time_max: Some(end_time),
            time_zone: Some("UTC".to_string()),
            items: Some(vec![FreeBusyRequestItem {
                id: Some(self.calendar_id.clone()),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let (_response, freebusy_response) =
            self.calendar_hub.freebusy().query(req).doit().await?;
        busy_from_response(freebusy_response, &self.calendar_id)
    }

    /// Inserts the booking event, inviting the attendee.
    ///
    /// Fails with [`GcalServiceError::Conflict`] if the calendar already holds
    /// something in that time range.
    pub async fn insert_booking_event(
        &self,
        request: &CalendarEventRequest,
    ) -> Result<String, GcalServiceError> {
        if request.end_time <= request.start_time {
            return Err(GcalServiceError::CalculationError(
                "End time must be after start time".to_string(),
            ));
        }

        let busy = self
            .get_busy_times(request.start_time, request.end_time)
            .await?;
        if busy
            .iter()
            .any(|b| b.overlaps(request.start_time, request.end_time))
        {
            return Err(GcalServiceError::Conflict);
        }

        let (_response, created_event) = self
            .calendar_hub
            .events()
            .insert(build_event(request), &self.calendar_id)
            .send_updates("all")
            .doit()
            .await?;

        let event_id = created_event.id.ok_or(GcalServiceError::MissingEventId)?;
        info!(
            "Created calendar event {} for booking {}",
            event_id, request.booking_id
        );
        Ok(event_id)
    }
}

/// Extracts the busy periods of `calendar_id`; periods without bounds are skipped.
pub(crate) fn busy_from_response(
    response: FreeBusyResponse,
    calendar_id: &str,
) -> Result<Vec<BusyInterval>, GcalServiceError> {
    let Some(cal_info) = response
        .calendars
        .and_then(|mut calendars| calendars.remove(calendar_id))
    else {
        return Ok(Vec::new());
    };

    if let Some(errors) = cal_info.errors.filter(|errors| !errors.is_empty()) {
        let reason = errors
            .iter()
            .filter_map(|e| e.reason.clone())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(GcalServiceError::CalendarUnreadable {
            calendar_id: calendar_id.to_string(),
            reason,
        });
    }

    let mut busy_periods: Vec<BusyInterval> = cal_info
        .busy
        .unwrap_or_default()
        .into_iter()
        .filter_map(|period| match (period.start, period.end) {
            (Some(start), Some(end)) => Some(BusyInterval::new(start, end)),
            _ => {
                debug!("Skipping busy period with missing start/end: {:?}", period);
                None
            }
        })
        .collect();
    busy_periods.sort_by_key(|b| b.start);
    Ok(busy_periods)
}

/// Maps a booking event onto the Google event shape.
pub(crate) fn build_event(request: &CalendarEventRequest) -> Event {
    let mut private = HashMap::new();
    private.insert("booking_id".to_string(), request.booking_id.to_string());

    Event {
        summary: Some(request.summary.clone()),
        description: Some(request.description.clone()),
        start: Some(EventDateTime {
            date_time: Some(request.start_time),
            time_zone: Some(request.time_zone.clone()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(request.end_time),
            time_zone: Some(request.time_zone.clone()),
            ..Default::default()
        }),
        attendees: Some(vec![EventAttendee {
            email: Some(request.attendee_email.clone()),
            ..Default::default()
        }]),
        extended_properties: Some(EventExtendedProperties {
            private: Some(private),
            shared: None,
        }),
        ..Default::default()
    }
}

impl BusyTimeSource for GoogleCalendarService {
    fn busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, ServiceError> {
        Box::pin(async move { Ok(self.get_busy_times(start, end).await?) })
    }
}

impl CalendarEventService for GoogleCalendarService {
    fn create_event(&self, event: CalendarEventRequest) -> BoxFuture<'_, String, ServiceError> {
        Box::pin(async move { Ok(self.insert_booking_event(&event).await?) })
    }
}
