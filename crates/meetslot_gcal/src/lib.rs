// --- File: crates/meetslot_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod service;
#[cfg(test)]
mod service_test;

pub use auth::{create_calendar_hub, HubType};
pub use service::{GcalServiceError, GoogleCalendarService};
