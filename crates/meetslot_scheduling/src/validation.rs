// --- File: crates/meetslot_scheduling/src/validation.rs ---
//! Structural and policy checks for booking requests.

use crate::calendar::BusinessCalendar;
use crate::time::BusinessWindow;
use chrono::{DateTime, Utc};
use meetslot_common::models::BookingRequest;
use meetslot_common::Clock;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

pub const EMAIL_REQUIRED: &str = "Email address is required";
pub const DATETIME_REQUIRED: &str = "Meeting date and time is required";
pub const CONSENT_REQUIRED: &str = "Recording consent is required";
pub const EMAIL_INVALID: &str = "Invalid email address";
pub const DATETIME_INVALID: &str = "Invalid meeting date and time";
pub const IN_THE_PAST: &str = "Meeting time cannot be in the past";
pub const NOT_A_BUSINESS_DAY: &str = "Meetings can only be booked on business days";
pub const NOT_SLOT_ALIGNED: &str = "Meeting time must start on the hour or half hour";

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_REGEX should compile"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// A request that passed validation, with its fields normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBooking {
    pub attendee_email: String,
    pub attendee_phone: Option<String>,
    pub meeting_datetime: DateTime<Utc>,
    pub recording_consent: bool,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub struct BookingValidator {
    window: BusinessWindow,
    calendar: Arc<BusinessCalendar>,
    clock: Arc<dyn Clock>,
}

impl BookingValidator {
    pub fn new(window: BusinessWindow, calendar: Arc<BusinessCalendar>, clock: Arc<dyn Clock>) -> Self {
        Self {
            window,
            calendar,
            clock,
        }
    }

    pub fn window(&self) -> &BusinessWindow {
        &self.window
    }

    fn outside_window_message(&self) -> String {
        format!(
            "Meeting time must be during business hours ({})",
            self.window.describe()
        )
    }

    /// Runs every check and reports all failures.
    pub fn validate(&self, request: &BookingRequest) -> ValidationResult {
        match self.accept(request) {
            Ok(_) => ValidationResult {
                valid: true,
                errors: Vec::new(),
            },
            Err(errors) => ValidationResult {
                valid: false,
                errors,
            },
        }
    }

    /// Validates and returns the normalised booking, or every error found.
    ///
    /// Errors are ordered: missing fields, then malformed fields, then
    /// temporal policy.
    pub fn accept(&self, request: &BookingRequest) -> Result<ValidatedBooking, Vec<String>> {
        let mut required = Vec::new();
        let mut format = Vec::new();
        let mut policy = Vec::new();

        let email = present(&request.attendee_email);
        if email.is_none() {
            required.push(EMAIL_REQUIRED.to_string());
        }
        let raw_datetime = present(&request.meeting_datetime);
        if raw_datetime.is_none() {
            required.push(DATETIME_REQUIRED.to_string());
        }
        if request.recording_consent.is_none() {
            required.push(CONSENT_REQUIRED.to_string());
        }

        if let Some(email) = email {
            if !is_valid_email(email) {
                format.push(EMAIL_INVALID.to_string());
            }
        }

        let meeting_datetime = raw_datetime.and_then(|raw| {
            let parsed = self.window.parse_instant(raw);
            if parsed.is_none() {
                format.push(DATETIME_INVALID.to_string());
            }
            parsed
        });

        if let Some(instant) = meeting_datetime {
            if instant <= self.clock.now() {
                policy.push(IN_THE_PAST.to_string());
            }
            if !self.window.contains(instant) {
                policy.push(self.outside_window_message());
            }
            if !self.calendar.is_business_day(self.window.local_date(instant)) {
                policy.push(NOT_A_BUSINESS_DAY.to_string());
            }
            if !self.window.is_slot_aligned(instant) {
                policy.push(NOT_SLOT_ALIGNED.to_string());
            }
        }

        let mut errors = required;
        errors.extend(format);
        errors.extend(policy);

        match (email, meeting_datetime, request.recording_consent) {
            (Some(email), Some(meeting_datetime), Some(recording_consent)) if errors.is_empty() => {
                Ok(ValidatedBooking {
                    attendee_email: email.to_string(),
                    attendee_phone: present(&request.attendee_phone).map(str::to_string),
                    meeting_datetime,
                    recording_consent,
                })
            }
            _ => Err(errors),
        }
    }
}
