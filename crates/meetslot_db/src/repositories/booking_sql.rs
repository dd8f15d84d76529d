//! SQL implementation of the booking repository

use crate::error::DbError;
use crate::repositories::booking::BookingRepository;
use crate::DbClient;
use chrono::{DateTime, Utc};
use meetslot_common::models::{Booking, BookingStatus, ConferenceRef, NewBooking};
use meetslot_common::services::{BookingStore, BoxFuture, ServiceError};
use sqlx::any::AnyRow;
use sqlx::{Row, ValueRef};
use tracing::{debug, error, info};

const BOOKING_COLUMNS: &str = "id, attendee_email, attendee_phone, meeting_datetime, \
     duration_minutes, recording_consent, status, conference_id, conference_join_url, \
     conference_password, calendar_event_id, created_at, updated_at";

/// SQL implementation of the booking repository
///
/// Instants are stored as RFC 3339 text in UTC because `DateTime<Utc>` has no
/// `Any` encoding; booleans are stored as 0/1 integers for the same reason.
#[derive(Debug, Clone)]
pub struct SqlBookingRepository {
    db_client: DbClient,
}

impl SqlBookingRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    pub fn client(&self) -> &DbClient {
        &self.db_client
    }
}

impl BookingRepository for SqlBookingRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing booking schema");

        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                attendee_email TEXT NOT NULL,
                attendee_phone TEXT,
                meeting_datetime TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL DEFAULT 30,
                recording_consent INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'confirmed',
                conference_id TEXT,
                conference_join_url TEXT,
                conference_password TEXT,
                calendar_event_id TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_bookings_email ON bookings(attendee_email)",
            "CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status)",
            // Double-booking guard: one confirmed booking per start instant
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_confirmed_slot \
             ON bookings(meeting_datetime) WHERE status = 'confirmed'",
        ];

        for statement in statements {
            self.db_client.execute(statement).await?;
        }

        info!("Booking schema initialized successfully");
        Ok(())
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, DbError> {
        debug!(
            "Inserting booking for {} at {}",
            booking.attendee_email, booking.meeting_datetime
        );

        let now = to_text(Utc::now());
        let conference = booking.conference.as_ref();
        let query = format!(
            "INSERT INTO bookings (attendee_email, attendee_phone, meeting_datetime, \
             duration_minutes, recording_consent, status, conference_id, conference_join_url, \
             conference_password, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {}",
            BOOKING_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(booking.attendee_email.clone())
            .bind(booking.attendee_phone.clone())
            .bind(to_text(booking.meeting_datetime))
            .bind(booking.duration_minutes)
            .bind(i64::from(booking.recording_consent))
            .bind(booking.status.as_str())
            .bind(conference.map(|c| c.id.clone()))
            .bind(conference.map(|c| c.join_url.clone()))
            .bind(conference.and_then(|c| c.password.clone()))
            .bind(now.clone())
            .bind(now)
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| {
                let err = DbError::from_query(e);
                error!("Failed to insert booking: {}", err);
                err
            })?;

        let mut inserted = booking_from_row(&row)?;
        // The host link is only known at creation time and is not stored.
        if let (Some(stored), Some(original)) = (inserted.conference.as_mut(), conference) {
            stored.start_url = original.start_url.clone();
        }

        info!("Booking {} created successfully", inserted.id);
        Ok(inserted)
    }

    async fn set_calendar_event(&self, booking_id: i64, event_id: &str) -> Result<Booking, DbError> {
        debug!("Attaching calendar event {} to booking {}", event_id, booking_id);

        let query = format!(
            "UPDATE bookings SET calendar_event_id = $1, updated_at = $2 \
             WHERE id = $3 RETURNING {}",
            BOOKING_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(event_id.to_string())
            .bind(to_text(Utc::now()))
            .bind(booking_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to update booking {}: {}", booking_id, e);
                DbError::from_query(e)
            })?
            .ok_or(DbError::NotFound(booking_id))?;

        booking_from_row(&row)
    }

    async fn find_by_id(&self, booking_id: i64) -> Result<Option<Booking>, DbError> {
        debug!("Finding booking {}", booking_id);

        let query = format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS);
        let row = sqlx::query(&query)
            .bind(booking_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find booking {}: {}", booking_id, e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(booking_from_row).transpose()
    }
}

impl BookingStore for SqlBookingRepository {
    fn insert(&self, booking: NewBooking) -> BoxFuture<'_, Booking, ServiceError> {
        Box::pin(async move { Ok(self.insert_booking(booking).await?) })
    }

    fn attach_calendar_event(
        &self,
        booking_id: i64,
        event_id: &str,
    ) -> BoxFuture<'_, Booking, ServiceError> {
        let event_id = event_id.to_string();
        Box::pin(async move { Ok(self.set_calendar_event(booking_id, &event_id).await?) })
    }
}

fn to_text(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339()
}

fn parse_instant(column: &str, raw: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::DecodeError(format!("{} '{}': {}", column, raw, e)))
}

// Manual row mapping; query_as cannot decode DateTime<Utc> through sqlx::Any.
fn booking_from_row(row: &AnyRow) -> Result<Booking, DbError> {
    let text = |column: &str| -> Result<String, DbError> {
        row.try_get::<String, _>(column)
            .map_err(|e| DbError::DecodeError(format!("{}: {}", column, e)))
    };
    // The Any driver refuses to decode NULL into Option<T>, so NULL is checked on the raw value.
    let optional = |column: &str| -> Result<Option<String>, DbError> {
        let raw = row
            .try_get_raw(column)
            .map_err(|e| DbError::DecodeError(format!("{}: {}", column, e)))?;
        if raw.is_null() {
            return Ok(None);
        }
        text(column).map(Some)
    };
    let integer = |column: &str| -> Result<i64, DbError> {
        row.try_get::<i64, _>(column)
            .map_err(|e| DbError::DecodeError(format!("{}: {}", column, e)))
    };

    let status = text("status")?;
    let status = status
        .parse::<BookingStatus>()
        .map_err(DbError::DecodeError)?;

    let conference = match (optional("conference_id")?, optional("conference_join_url")?) {
        (Some(id), Some(join_url)) => Some(ConferenceRef {
            id,
            join_url,
            password: optional("conference_password")?,
            start_url: None,
        }),
        _ => None,
    };

    Ok(Booking {
        id: integer("id")?,
        attendee_email: text("attendee_email")?,
        attendee_phone: optional("attendee_phone")?,
        meeting_datetime: parse_instant("meeting_datetime", &text("meeting_datetime")?)?,
        duration_minutes: integer("duration_minutes")?,
        recording_consent: integer("recording_consent")? != 0,
        status,
        conference,
        calendar_event_id: optional("calendar_event_id")?,
        created_at: parse_instant("created_at", &text("created_at")?)?,
        updated_at: parse_instant("updated_at", &text("updated_at")?)?,
    })
}
