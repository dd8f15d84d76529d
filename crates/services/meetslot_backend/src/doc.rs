// File: crates/services/meetslot_backend/src/doc.rs
#![cfg(feature = "openapi")]

use crate::handlers::{
    BookingResponse, BusinessDaysResponse, ErrorResponse, HealthResponse, SlotView, SlotsResponse,
};
use meetslot_common::models::{Booking, BookingRequest, BookingStatus, ConferenceRef};
use meetslot_scheduling::ServiceDegradation;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meetslot API",
        version = "0.1.0",
        description = "Half-hour meeting slots and bookings",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        crate::handlers::get_slots_handler,
        crate::handlers::get_business_days_handler,
        crate::handlers::create_booking_handler,
        crate::handlers::health_handler,
    ),
    components(schemas(
        SlotsResponse,
        SlotView,
        BusinessDaysResponse,
        BookingRequest,
        BookingResponse,
        Booking,
        BookingStatus,
        ConferenceRef,
        ServiceDegradation,
        ErrorResponse,
        HealthResponse,
    )),
    tags(
        (name = "Calendar", description = "Business days and slot availability"),
        (name = "Bookings", description = "Booking creation"),
        (name = "Health", description = "Liveness and database health")
    ),
    servers((url = "/api", description = "Main API Prefix")),
)]
pub struct ApiDoc;

pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_endpoint_is_documented() {
        let doc = openapi();
        for path in [
            "/calendar/slots",
            "/calendar/business-days",
            "/bookings",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
