// --- File: crates/services/meetslot_backend/src/lib.rs ---
pub mod app_state;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod routes;
pub mod startup;

pub use app_state::AppState;
pub use routes::app;
pub use startup::build_state;
