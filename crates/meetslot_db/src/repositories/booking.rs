//! Repository for bookings

use crate::error::DbError;
use meetslot_common::models::{Booking, NewBooking};

/// Storage for bookings.
///
/// At most one booking with status `confirmed` may exist per
/// `meeting_datetime`; a second insert fails with [`DbError::UniqueViolation`].
pub trait BookingRepository {
    /// Creates the `bookings` table and its indexes if they don't already exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Inserts a booking and returns it with id and timestamps set.
    fn insert_booking(
        &self,
        booking: NewBooking,
    ) -> impl std::future::Future<Output = Result<Booking, DbError>> + Send;

    /// Stores the calendar event id on a booking and returns the updated row.
    fn set_calendar_event(
        &self,
        booking_id: i64,
        event_id: &str,
    ) -> impl std::future::Future<Output = Result<Booking, DbError>> + Send;

    /// Finds a booking by id.
    fn find_by_id(
        &self,
        booking_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, DbError>> + Send;
}
