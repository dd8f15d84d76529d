// --- File: crates/services/meetslot_backend/src/app_state.rs ---
use meetslot_common::Clock;
use meetslot_config::AppConfig;
use meetslot_db::DbClient;
use meetslot_scheduling::{AvailabilityService, BookingOrchestrator};
use std::sync::Arc;

/// Application state that is shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub availability: Arc<AvailabilityService>,
    pub bookings: Arc<BookingOrchestrator>,
    /// Source of "today" for defaults such as the business-day listing.
    pub clock: Arc<dyn Clock>,
    /// Checked by the health endpoint; `None` when the store is not SQL backed.
    pub database: Option<DbClient>,
    /// Whether a calendar adapter was actually wired at startup.
    pub calendar_enabled: bool,
    pub conference_enabled: bool,
}
