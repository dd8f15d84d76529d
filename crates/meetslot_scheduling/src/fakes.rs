// In-memory collaborators for engine tests.

use chrono::{DateTime, Utc};
use meetslot_common::models::{Booking, BusyInterval, ConferenceRef, NewBooking};
use meetslot_common::services::{
    BookingStore, BoxFuture, BusyTimeSource, CalendarEventRequest, CalendarEventService,
    ConferenceService, MeetingRequest, ServiceError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub struct FakeBusySource {
    pub busy: Vec<BusyInterval>,
    pub fail: bool,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl FakeBusySource {
    pub fn with(busy: Vec<BusyInterval>) -> Self {
        Self {
            busy,
            fail: false,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with(Vec::new())
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::with(Vec::new())
        }
    }
}

impl BusyTimeSource for FakeBusySource {
    fn busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, ServiceError> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ServiceError::unavailable("fake-calendar", "freebusy failed"));
            }
            Ok(self
                .busy
                .iter()
                .filter(|b| b.overlaps(start, end))
                .copied()
                .collect())
        })
    }
}

#[derive(Default)]
pub struct FakeConference {
    pub fail: bool,
    pub delay: Option<Duration>,
    pub created: Mutex<Vec<MeetingRequest>>,
    pub released: Mutex<Vec<String>>,
}

impl FakeConference {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }
}

impl ConferenceService for FakeConference {
    fn create_room(&self, request: MeetingRequest) -> BoxFuture<'_, ConferenceRef, ServiceError> {
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ServiceError::unavailable("fake-zoom", "meeting API down"));
            }
            let mut created = self.created.lock().unwrap();
            created.push(request);
            Ok(ConferenceRef {
                id: format!("room-{}", created.len()),
                join_url: format!("https://meet.example/j/{}", created.len()),
                password: Some("secret".to_string()),
                start_url: None,
            })
        })
    }

    fn release_room(&self, room_id: &str) -> BoxFuture<'_, (), ServiceError> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            self.released.lock().unwrap().push(room_id);
            Ok(())
        })
    }
}

#[derive(Default)]
pub struct FakeCalendarEvents {
    pub fail: bool,
    pub delay: Option<Duration>,
    pub events: Mutex<Vec<CalendarEventRequest>>,
}

impl FakeCalendarEvents {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }
}

impl CalendarEventService for FakeCalendarEvents {
    fn create_event(&self, event: CalendarEventRequest) -> BoxFuture<'_, String, ServiceError> {
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ServiceError::auth("fake-gcal", "token revoked"));
            }
            let id = format!("evt-{}", event.booking_id);
            self.events.lock().unwrap().push(event);
            Ok(id)
        })
    }
}

/// Booking store with a confirmed-slot uniqueness rule.
#[derive(Default)]
pub struct FakeStore {
    pub fail: bool,
    pub fail_attach: bool,
    pub delay: Option<Duration>,
    pub bookings: Mutex<Vec<Booking>>,
}

impl FakeStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }
}

impl BookingStore for FakeStore {
    fn insert(&self, booking: NewBooking) -> BoxFuture<'_, Booking, ServiceError> {
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ServiceError::unavailable("fake-db", "disk full"));
            }
            let mut bookings = self.bookings.lock().unwrap();
            if bookings
                .iter()
                .any(|b| b.meeting_datetime == booking.meeting_datetime && b.status == booking.status)
            {
                return Err(ServiceError::conflict("fake-db", "meeting_datetime taken"));
            }
            let now = Utc::now();
            let stored = Booking {
                id: bookings.len() as i64 + 1,
                attendee_email: booking.attendee_email,
                attendee_phone: booking.attendee_phone,
                meeting_datetime: booking.meeting_datetime,
                duration_minutes: booking.duration_minutes,
                recording_consent: booking.recording_consent,
                status: booking.status,
                conference: booking.conference,
                calendar_event_id: None,
                created_at: now,
                updated_at: now,
            };
            bookings.push(stored.clone());
            Ok(stored)
        })
    }

    fn attach_calendar_event(
        &self,
        booking_id: i64,
        event_id: &str,
    ) -> BoxFuture<'_, Booking, ServiceError> {
        let event_id = event_id.to_string();
        Box::pin(async move {
            if self.fail_attach {
                return Err(ServiceError::unavailable("fake-db", "connection lost"));
            }
            let mut bookings = self.bookings.lock().unwrap();
            let booking = bookings
                .iter_mut()
                .find(|b| b.id == booking_id)
                .ok_or_else(|| ServiceError::rejected("fake-db", "no such booking"))?;
            booking.calendar_event_id = Some(event_id);
            Ok(booking.clone())
        })
    }
}
