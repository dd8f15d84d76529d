// --- File: crates/services/meetslot_backend/src/startup.rs ---
//! Builds the scheduling engine and its collaborators from the configuration.
//!
//! The database is mandatory. Google Calendar and Zoom are wired in only when
//! their feature is compiled in and their runtime flag is set; if either
//! cannot be initialised the server still starts and the missing step is
//! skipped for every booking.

use crate::app_state::AppState;
use meetslot_common::{Clock, MeetslotError, SystemClock};
use meetslot_config::AppConfig;
use meetslot_db::{BookingRepository, DbClient, SqlBookingRepository};
use meetslot_scheduling::{
    AvailabilityService, BookingOrchestrator, BookingValidator, BusinessCalendar, BusinessWindow,
    SlotGenerator,
};
use std::sync::Arc;
use std::time::Duration;
#[allow(unused_imports)]
use tracing::{info, warn};

pub async fn build_state(config: Arc<AppConfig>) -> Result<AppState, MeetslotError> {
    let window = BusinessWindow::from_config(&config.scheduling)?;
    let calendar = Arc::new(BusinessCalendar::from_config(&config.scheduling));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let timeout = Duration::from_secs(config.scheduling.external_timeout_secs);
    info!("Business window: {}", window.describe());

    let db_client = DbClient::new(&config).await?;
    let repository = SqlBookingRepository::new(db_client.clone());
    repository.init_schema().await?;

    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut availability =
        AvailabilityService::new(calendar.clone(), SlotGenerator::new(window), clock.clone())
            .with_timeout(timeout);
    let validator = BookingValidator::new(window, calendar, clock.clone());
    #[allow(unused_mut)]
    let mut bookings =
        BookingOrchestrator::new(validator, Arc::new(repository)).with_timeout(timeout);

    #[allow(unused_mut)]
    let mut calendar_enabled = false;
    #[allow(unused_mut)]
    let mut conference_enabled = false;

    #[cfg(feature = "gcal")]
    if let Some(google) = google_calendar(&config).await {
        availability = availability.with_busy_source(google.clone());
        bookings = bookings.with_calendar_events(google);
        calendar_enabled = true;
    }

    #[cfg(feature = "zoom")]
    if let Some(zoom) = zoom_client(&config) {
        bookings = bookings.with_conference(zoom);
        conference_enabled = true;
    }

    Ok(AppState {
        config,
        availability: Arc::new(availability),
        bookings: Arc::new(bookings),
        clock,
        database: Some(db_client),
        calendar_enabled,
        conference_enabled,
    })
}

#[cfg(feature = "gcal")]
async fn google_calendar(config: &AppConfig) -> Option<Arc<meetslot_gcal::GoogleCalendarService>> {
    if !config.use_gcal {
        info!("Google Calendar disabled (use_gcal = false)");
        return None;
    }
    let Some(gcal_config) = config.gcal.as_ref() else {
        warn!("use_gcal is set but the [gcal] section is missing");
        return None;
    };
    let Some(calendar_id) = gcal_config.calendar_id.clone() else {
        warn!("GCal calendar_id missing in GcalConfig");
        return None;
    };

    match meetslot_gcal::create_calendar_hub(gcal_config).await {
        Ok(hub) => {
            info!("Google Calendar enabled for calendar {}", calendar_id);
            Some(Arc::new(meetslot_gcal::GoogleCalendarService::new(
                Arc::new(hub),
                calendar_id,
            )))
        }
        Err(e) => {
            warn!("Google Calendar unavailable, continuing without it: {}", e);
            None
        }
    }
}

#[cfg(feature = "zoom")]
fn zoom_client(config: &AppConfig) -> Option<Arc<meetslot_zoom::ZoomClient>> {
    if !config.use_zoom {
        info!("Zoom disabled (use_zoom = false)");
        return None;
    }
    let Some(zoom_config) = config.zoom.clone() else {
        warn!("use_zoom is set but the [zoom] section is missing");
        return None;
    };

    match meetslot_zoom::ZoomClient::new(zoom_config) {
        Ok(client) => {
            info!("Zoom enabled");
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("Zoom unavailable, continuing without it: {}", e);
            None
        }
    }
}
