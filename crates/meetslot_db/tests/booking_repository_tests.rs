// Booking repository against a private in-memory SQLite database.

use chrono::{TimeZone, Utc};
use meetslot_common::models::{BookingStatus, ConferenceRef, NewBooking};
use meetslot_common::services::{BookingStore, ServiceError};
use meetslot_db::{BookingRepository, DbClient, DbError, SqlBookingRepository};

async fn repository() -> SqlBookingRepository {
    let client = DbClient::from_url("sqlite::memory:")
        .await
        .expect("in-memory database");
    let repository = SqlBookingRepository::new(client);
    repository.init_schema().await.expect("schema");
    repository
}

fn new_booking(hour: u32, status: BookingStatus) -> NewBooking {
    NewBooking {
        attendee_email: "visitor@example.com".to_string(),
        attendee_phone: None,
        meeting_datetime: Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap(),
        duration_minutes: 30,
        recording_consent: true,
        status,
        conference: Some(ConferenceRef {
            id: "98765".to_string(),
            join_url: "https://zoom.us/j/98765".to_string(),
            password: Some("abc123".to_string()),
            start_url: Some("https://zoom.us/s/98765".to_string()),
        }),
    }
}

#[tokio::test]
async fn insert_assigns_id_and_round_trips_fields() {
    let repository = repository().await;
    let inserted = repository
        .insert_booking(new_booking(16, BookingStatus::Confirmed))
        .await
        .unwrap();

    assert!(inserted.id > 0);
    assert_eq!(inserted.status, BookingStatus::Confirmed);
    assert!(inserted.recording_consent);
    assert_eq!(inserted.attendee_phone, None);
    assert_eq!(
        inserted.conference.as_ref().and_then(|c| c.start_url.as_deref()),
        Some("https://zoom.us/s/98765")
    );

    let found = repository.find_by_id(inserted.id).await.unwrap().unwrap();
    assert_eq!(found.meeting_datetime, inserted.meeting_datetime);
    assert_eq!(found.attendee_email, "visitor@example.com");
    assert_eq!(found.duration_minutes, 30);
    let conference = found.conference.unwrap();
    assert_eq!(conference.id, "98765");
    assert_eq!(conference.password.as_deref(), Some("abc123"));
    // Host links are never stored
    assert_eq!(conference.start_url, None);
}

#[tokio::test]
async fn booking_without_conference_reads_back_without_one() {
    let repository = repository().await;
    let mut booking = new_booking(17, BookingStatus::Confirmed);
    booking.conference = None;
    booking.attendee_phone = Some("+1 303 555 0100".to_string());

    let inserted = repository.insert_booking(booking).await.unwrap();
    assert!(inserted.conference.is_none());
    assert_eq!(inserted.calendar_event_id, None);

    let found = repository.find_by_id(inserted.id).await.unwrap().unwrap();
    assert!(found.conference.is_none());
    assert_eq!(found.attendee_phone.as_deref(), Some("+1 303 555 0100"));
}

#[tokio::test]
async fn store_accepts_a_booking_with_no_optional_fields() {
    let repository = repository().await;
    let mut booking = new_booking(19, BookingStatus::Confirmed);
    booking.conference = None;

    let stored = BookingStore::insert(&repository, booking).await.unwrap();
    assert!(stored.conference.is_none());
    assert_eq!(stored.attendee_phone, None);

    let updated = repository
        .attach_calendar_event(stored.id, "evt-9")
        .await
        .unwrap();
    assert!(updated.conference.is_none());
    assert_eq!(updated.calendar_event_id.as_deref(), Some("evt-9"));
}

#[tokio::test]
async fn second_confirmed_booking_for_the_same_instant_is_rejected() {
    let repository = repository().await;
    repository
        .insert_booking(new_booking(16, BookingStatus::Confirmed))
        .await
        .unwrap();

    let err = repository
        .insert_booking(new_booking(16, BookingStatus::Confirmed))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation(_)), "got {err:?}");

    let err = BookingStore::insert(&repository, new_booking(16, BookingStatus::Confirmed))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn cancelled_bookings_do_not_block_the_slot() {
    let repository = repository().await;
    repository
        .insert_booking(new_booking(16, BookingStatus::Cancelled))
        .await
        .unwrap();
    repository
        .insert_booking(new_booking(16, BookingStatus::Cancelled))
        .await
        .unwrap();
    repository
        .insert_booking(new_booking(16, BookingStatus::Confirmed))
        .await
        .unwrap();
}

#[tokio::test]
async fn calendar_event_is_attached() {
    let repository = repository().await;
    let inserted = repository
        .insert_booking(new_booking(18, BookingStatus::Confirmed))
        .await
        .unwrap();

    let updated = repository
        .attach_calendar_event(inserted.id, "evt-123")
        .await
        .unwrap();
    assert_eq!(updated.calendar_event_id.as_deref(), Some("evt-123"));
    assert!(updated.updated_at >= inserted.updated_at);

    let found = repository.find_by_id(inserted.id).await.unwrap().unwrap();
    assert_eq!(found.calendar_event_id.as_deref(), Some("evt-123"));
}

#[tokio::test]
async fn attaching_to_a_missing_booking_fails() {
    let repository = repository().await;
    let err = repository.set_calendar_event(42, "evt-1").await.unwrap_err();
    assert!(matches!(err, DbError::NotFound(42)));

    let err = repository.attach_calendar_event(42, "evt-1").await.unwrap_err();
    assert!(matches!(err, ServiceError::Rejected { .. }));
}

#[tokio::test]
async fn schema_initialisation_is_idempotent() {
    let repository = repository().await;
    repository.init_schema().await.unwrap();
    assert!(repository.client().is_healthy().await);
    assert!(repository.find_by_id(1).await.unwrap().is_none());
}
