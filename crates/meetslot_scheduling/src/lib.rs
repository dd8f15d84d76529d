// --- File: crates/meetslot_scheduling/src/lib.rs ---
// Declare modules within this crate
pub mod availability;
pub mod booking;
pub mod calendar;
pub mod error;
mod external;
#[cfg(test)]
mod fakes;
pub mod holidays;
pub mod slots;
#[cfg(test)]
mod slots_proptest;
pub mod time;
pub mod validation;

pub use availability::{resolve, AvailabilityService, SlotAvailability};
pub use booking::{BookingConfirmation, BookingOrchestrator, ServiceDegradation};
pub use calendar::BusinessCalendar;
pub use error::{BookingError, CalendarError};
pub use holidays::{HolidaySource, UsFederalHolidays, WithClosures};
pub use slots::SlotGenerator;
pub use time::{local_business_instant, BusinessWindow};
pub use validation::{BookingValidator, ValidatedBooking, ValidationResult};
