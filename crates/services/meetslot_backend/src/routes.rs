// --- File: crates/services/meetslot_backend/src/routes.rs ---

use crate::app_state::AppState;
use crate::handlers::{
    create_booking_handler, get_business_days_handler, get_slots_handler, health_handler,
};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates a router containing the API routes, relative to `/api`.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Welcome to the Meetslot API!" }))
        .route("/health", get(health_handler))
        .route("/calendar/slots", get(get_slots_handler))
        .route("/calendar/business-days", get(get_business_days_handler))
        .route("/bookings", post(create_booking_handler))
        .with_state(state)
}

/// The complete application: API under `/api`, request tracing and, with the
/// `openapi` feature, Swagger UI at `/api/docs`.
pub fn app(state: AppState) -> Router {
    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut app = Router::new().nest("/api", routes(state));

    #[cfg(feature = "openapi")]
    {
        use utoipa_swagger_ui::SwaggerUi;
        tracing::info!("Adding Swagger UI at /api/docs");
        app = app.merge(
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", crate::doc::openapi()),
        );
    }

    app.layer(TraceLayer::new_for_http())
}
