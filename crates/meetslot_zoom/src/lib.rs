// --- File: crates/meetslot_zoom/src/lib.rs ---
// Declare modules within this crate
pub mod client;
pub mod error;
pub mod models;

pub use client::ZoomClient;
pub use error::ZoomError;
