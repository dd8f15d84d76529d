#[cfg(test)]
mod tests {
    use crate::service::{build_event, busy_from_response, GcalServiceError, SERVICE_NAME};
    use chrono::{Duration, TimeZone, Utc};
    use google_calendar3::api::{Error as ApiError, FreeBusyCalendar, FreeBusyResponse, TimePeriod};
    use meetslot_common::services::{CalendarEventRequest, ServiceError};
    use std::collections::HashMap;

    fn response(calendar_id: &str, calendar: FreeBusyCalendar) -> FreeBusyResponse {
        let mut calendars = HashMap::new();
        calendars.insert(calendar_id.to_string(), calendar);
        FreeBusyResponse {
            calendars: Some(calendars),
            ..Default::default()
        }
    }

    #[test]
    fn busy_periods_are_sorted_and_incomplete_ones_skipped() {
        let nine = Utc.with_ymd_and_hms(2025, 6, 2, 15, 0, 0).unwrap();
        let calendar = FreeBusyCalendar {
            busy: Some(vec![
                TimePeriod {
                    start: Some(nine + Duration::hours(2)),
                    end: Some(nine + Duration::hours(3)),
                },
                TimePeriod {
                    start: Some(nine),
                    end: None,
                },
                TimePeriod {
                    start: Some(nine),
                    end: Some(nine + Duration::minutes(30)),
                },
            ]),
            errors: None,
        };

        let busy = busy_from_response(response("primary", calendar), "primary").unwrap();
        assert_eq!(busy.len(), 2);
        assert_eq!(busy[0].start, nine);
        assert_eq!(busy[1].start, nine + Duration::hours(2));
    }

    #[test]
    fn other_calendars_are_ignored() {
        let calendar = FreeBusyCalendar {
            busy: Some(vec![TimePeriod {
                start: Some(Utc::now()),
                end: Some(Utc::now() + Duration::hours(1)),
            }]),
            errors: None,
        };
        let busy = busy_from_response(response("someone-else", calendar), "primary").unwrap();
        assert!(busy.is_empty());
    }

    #[test]
    fn calendar_errors_fail_the_lookup() {
        let calendar = FreeBusyCalendar {
            busy: None,
            errors: Some(vec![ApiError {
                domain: Some("global".to_string()),
                reason: Some("notFound".to_string()),
            }]),
        };
        let err = busy_from_response(response("primary", calendar), "primary").unwrap_err();
        assert!(matches!(
            err,
            GcalServiceError::CalendarUnreadable { ref reason, .. } if reason == "notFound"
        ));
        let service_err: ServiceError = err.into();
        assert!(matches!(service_err, ServiceError::Unavailable { .. }));
        assert_eq!(service_err.service(), SERVICE_NAME);
    }

    #[test]
    fn event_invites_attendee_and_keeps_the_zone() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 16, 0, 0).unwrap();
        let event = build_event(&CalendarEventRequest {
            booking_id: 42,
            attendee_email: "visitor@example.com".to_string(),
            summary: "Meeting with visitor@example.com".to_string(),
            description: "Recording consent: No".to_string(),
            start_time: start,
            end_time: start + Duration::minutes(30),
            time_zone: "America/Denver".to_string(),
        });

        let attendees = event.attendees.unwrap();
        assert_eq!(attendees[0].email.as_deref(), Some("visitor@example.com"));
        let event_start = event.start.unwrap();
        assert_eq!(event_start.date_time, Some(start));
        assert_eq!(event_start.time_zone.as_deref(), Some("America/Denver"));
        let private = event.extended_properties.unwrap().private.unwrap();
        assert_eq!(private.get("booking_id").map(String::as_str), Some("42"));
    }

    #[test]
    fn conflict_maps_to_service_conflict() {
        let err: ServiceError = GcalServiceError::Conflict.into();
        assert!(err.is_conflict());
    }

    #[test]
    fn auth_failures_are_told_apart_by_error_kind() {
        let denied = |code: u16| {
            google_calendar3::Error::BadRequest(serde_json::json!({
                "error": { "code": code, "message": "Request had invalid authentication credentials." }
            }))
        };

        for api in [google_calendar3::Error::MissingAPIKey, denied(401), denied(403)] {
            let err: ServiceError = GcalServiceError::ApiError(api).into();
            assert!(matches!(err, ServiceError::Auth { .. }), "got {err:?}");
        }

        // A message that merely mentions a token is not an auth failure.
        let not_auth = google_calendar3::Error::BadRequest(serde_json::json!({
            "error": { "code": 400, "message": "Invalid sync token value." }
        }));
        for api in [not_auth, denied(503), google_calendar3::Error::Cancelled] {
            let err: ServiceError = GcalServiceError::ApiError(api).into();
            assert!(matches!(err, ServiceError::Unavailable { .. }), "got {err:?}");
            assert_eq!(err.service(), SERVICE_NAME);
        }
    }
}
