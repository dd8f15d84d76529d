// --- File: crates/meetslot_common/src/lib.rs ---

// Declare modules within this crate
pub mod clock; // Injectable "now"
pub mod error; // Error handling
pub mod logging; // Logging utilities
pub mod models; // Data structures shared by the engine and the adapters
pub mod services; // Collaborator abstractions

// Re-export error types and utilities for easier access
pub use error::{external_service_error, HttpStatusCode, MeetslotError};

pub use clock::{Clock, FixedClock, SystemClock};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};

// This crate provides the vocabulary shared across the workspace: the booking and
// slot models, the traits the scheduling engine consumes, and error/logging helpers.
