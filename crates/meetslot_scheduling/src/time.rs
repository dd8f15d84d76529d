// --- File: crates/meetslot_scheduling/src/time.rs ---
//! Local business time in the reference zone.
//!
//! Every conversion from a local wall-clock time to an absolute instant goes
//! through [`local_business_instant`], so slot generation and booking
//! validation always agree on offsets, including across DST transitions.

use crate::error::CalendarError;
use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use meetslot_config::SchedulingConfig;

/// Converts a local wall-clock time on `date` in `tz` to an instant.
///
/// Returns `None` when the local time does not exist (spring-forward gap).
/// An ambiguous local time (fall-back overlap) resolves to the earlier instant.
pub fn local_business_instant(
    tz: Tz,
    date: NaiveDate,
    hour: u32,
    minute: u32,
) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    to_instant(tz, &naive)
}

fn to_instant(tz: Tz, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(local) => Some(local.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// The fixed local business window, e.g. 07:00 to 17:00 America/Denver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessWindow {
    time_zone: Tz,
    open_hour: u32,
    close_hour: u32,
}

impl BusinessWindow {
    pub fn new(time_zone: Tz, open_hour: u32, close_hour: u32) -> Result<Self, CalendarError> {
        if open_hour >= close_hour || close_hour > 24 {
            return Err(CalendarError::InvalidWindow {
                open_hour,
                close_hour,
            });
        }
        Ok(Self {
            time_zone,
            open_hour,
            close_hour,
        })
    }

    pub fn from_config(config: &SchedulingConfig) -> Result<Self, CalendarError> {
        let time_zone: Tz = config
            .time_zone
            .parse()
            .map_err(|_| CalendarError::InvalidTimeZone(config.time_zone.clone()))?;
        Self::new(time_zone, config.open_hour, config.close_hour)
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn open_hour(&self) -> u32 {
        self.open_hour
    }

    pub fn close_hour(&self) -> u32 {
        self.close_hour
    }

    /// Calendar date of `instant` in the reference zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.time_zone).date_naive()
    }

    /// Whether the local hour of `instant` lies in `[open_hour, close_hour)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let hour = instant.with_timezone(&self.time_zone).hour();
        hour >= self.open_hour && hour < self.close_hour
    }

    /// Whether `instant` is on a local :00 or :30 boundary.
    pub fn is_slot_aligned(&self, instant: DateTime<Utc>) -> bool {
        let local = instant.with_timezone(&self.time_zone);
        local.minute() % 30 == 0 && local.second() == 0 && local.nanosecond() == 0
    }

    /// Parses a meeting start: RFC 3339, or a local date-time without offset
    /// which is then read in the reference zone.
    pub fn parse_instant(&self, raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Some(instant.with_timezone(&Utc));
        }
        LOCAL_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .and_then(|naive| to_instant(self.time_zone, &naive))
    }

    /// Human readable form used in validation messages.
    pub fn describe(&self) -> String {
        format!(
            "{}:00 - {}:00 {}",
            self.open_hour,
            self.close_hour,
            self.time_zone.name()
        )
    }
}

impl Default for BusinessWindow {
    fn default() -> Self {
        Self {
            time_zone: chrono_tz::America::Denver,
            open_hour: 7,
            close_hour: 17,
        }
    }
}
