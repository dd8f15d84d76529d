// File: crates/services/meetslot_backend/src/handlers.rs
use crate::app_state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use http::StatusCode;
use meetslot_common::models::{Booking, BookingRequest, TimeSlot};
use meetslot_common::HttpStatusCode;
use meetslot_scheduling::{BookingError, ServiceDegradation};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

pub const BOOKING_CREATED: &str = "Meeting scheduled successfully!";
/// Largest `count` accepted by the business-day listing.
pub const MAX_BUSINESS_DAYS: usize = 60;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Error body shared by all endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

fn reject(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.into(),
            errors: Vec::new(),
        }),
    )
}

fn bad_query(rejection: QueryRejection) -> (StatusCode, Json<ErrorResponse>) {
    warn!("Rejected query string: {}", rejection.body_text());
    reject(StatusCode::BAD_REQUEST, "Invalid query parameters")
}

fn parse_date(
    raw: Option<&str>,
    name: &str,
) -> Result<Option<NaiveDate>, (StatusCode, Json<ErrorResponse>)> {
    raw.map(|raw| {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            reject(
                StatusCode::BAD_REQUEST,
                format!("Invalid {} format (YYYY-MM-DD)", name),
            )
        })
    })
    .transpose()
}

// --- Slots ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct SlotsQuery {
    /// Calendar date in YYYY-MM-DD format
    pub date: Option<String>,
}

/// A slot as shown to visitors: UTC bounds plus the local start time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SlotView {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
    /// Start time in the business time zone, e.g. "09:30"
    pub local_time: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SlotsResponse {
    pub success: bool,
    pub date: NaiveDate,
    pub time_zone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday: Option<String>,
    /// Set when busy times could not be read and every slot is shown as free.
    pub degraded: bool,
    pub slots: Vec<SlotView>,
}

/// Handler to list the half-hour slots of one date.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/slots",
    params(SlotsQuery),
    responses(
        (status = 200, description = "Slots of the date, empty on weekends and holidays", body = SlotsResponse),
        (status = 400, description = "Missing or malformed date", body = ErrorResponse)
    ),
    tag = "Calendar"
))]
pub async fn get_slots_handler(
    State(state): State<AppState>,
    query: Result<Query<SlotsQuery>, QueryRejection>,
) -> ApiResult<SlotsResponse> {
    let Query(query) = query.map_err(bad_query)?;
    let date = parse_date(query.date.as_deref(), "date")?
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "Date parameter is required"))?;

    let result = state.availability.slots_for_date(date).await;
    let window = state.availability.generator().window();
    let tz = window.time_zone();
    let slots = result
        .slots
        .iter()
        .map(|slot: &TimeSlot| SlotView {
            start: slot.start,
            end: slot.end,
            available: slot.available,
            local_time: slot.start.with_timezone(&tz).format("%H:%M").to_string(),
        })
        .collect();

    Ok(Json(SlotsResponse {
        success: true,
        date: result.date,
        time_zone: tz.to_string(),
        holiday: result.holiday,
        degraded: result.busy_source_degraded,
        slots,
    }))
}

// --- Business days ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct BusinessDaysQuery {
    /// First date to consider (YYYY-MM-DD); defaults to today in the business time zone
    pub from: Option<String>,
    /// Number of business days to return (1 to 60, default 5)
    pub count: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BusinessDaysResponse {
    pub success: bool,
    pub days: Vec<NaiveDate>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/business-days",
    params(BusinessDaysQuery),
    responses(
        (status = 200, description = "The next business days, starting at `from`", body = BusinessDaysResponse),
        (status = 400, description = "Malformed query, date or count out of range", body = ErrorResponse)
    ),
    tag = "Calendar"
))]
pub async fn get_business_days_handler(
    State(state): State<AppState>,
    query: Result<Query<BusinessDaysQuery>, QueryRejection>,
) -> ApiResult<BusinessDaysResponse> {
    let Query(query) = query.map_err(bad_query)?;
    let count = query.count.unwrap_or(5);
    if count == 0 || count > MAX_BUSINESS_DAYS {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            format!("count must be between 1 and {}", MAX_BUSINESS_DAYS),
        ));
    }

    let window = state.availability.generator().window();
    let from = parse_date(query.from.as_deref(), "from")?
        .unwrap_or_else(|| window.local_date(state.clock.now()));

    let days = state.availability.calendar().business_days_from(from, count);
    Ok(Json(BusinessDaysResponse {
        success: true,
        days,
    }))
}

// --- Bookings ---

#[derive(Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub booking: Booking,
    pub message: String,
    /// External steps that failed and were skipped for this booking.
    pub warnings: Vec<ServiceDegradation>,
}

fn booking_failure(err: BookingError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match err {
        BookingError::Validation(errors) => ErrorResponse {
            success: false,
            error: "Validation failed".to_string(),
            errors,
        },
        BookingError::SlotUnavailable => ErrorResponse {
            success: false,
            error: BookingError::SlotUnavailable.to_string(),
            errors: Vec::new(),
        },
        BookingError::Persistence(_) => ErrorResponse {
            success: false,
            error: "Failed to create booking".to_string(),
            errors: Vec::new(),
        },
    };
    (status, Json(body))
}

/// Handler to book a slot.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Slot already taken", body = ErrorResponse),
        (status = 500, description = "Booking could not be stored", body = ErrorResponse)
    ),
    tag = "Bookings"
))]
pub async fn create_booking_handler(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> ApiResult<BookingResponse> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected booking payload: {}", rejection.body_text());
        reject(StatusCode::BAD_REQUEST, "Invalid request body")
    })?;

    match state.bookings.create_booking(request).await {
        Ok(confirmation) => {
            info!("Booking {} confirmed", confirmation.booking.id);
            Ok(Json(BookingResponse {
                success: true,
                booking: confirmation.booking,
                message: BOOKING_CREATED.to_string(),
                warnings: confirmation.degradations,
            }))
        }
        Err(err) => {
            if let BookingError::Persistence(ref cause) = err {
                error!("Booking failed: {}", cause);
            }
            Err(booking_failure(err))
        }
    }
}

// --- Health ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub calendar_enabled: bool,
    pub conference_enabled: bool,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "Health"
))]
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, database) = match &state.database {
        Some(db) if db.is_healthy().await => (StatusCode::OK, "ok"),
        Some(_) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
        None => (StatusCode::OK, "not configured"),
    };

    (
        status,
        Json(HealthResponse {
            status: if status == StatusCode::OK { "ok" } else { "degraded" }.to_string(),
            database: database.to_string(),
            calendar_enabled: state.calendar_enabled,
            conference_enabled: state.conference_enabled,
        }),
    )
}
