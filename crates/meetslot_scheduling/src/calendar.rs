// --- File: crates/meetslot_scheduling/src/calendar.rs ---
//! Business-day eligibility.

use crate::error::CalendarError;
use crate::holidays::{HolidaySource, UsFederalHolidays, WithClosures};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use meetslot_common::models::Holiday;
use meetslot_config::SchedulingConfig;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Upper bound for [`BusinessCalendar::next_business_day`].
const MAX_SEARCH_DAYS: u32 = 366;

/// Decides whether a date can carry bookings.
///
/// Holidays are resolved once per year and cached; the cache is shared by all
/// callers and never invalidated.
pub struct BusinessCalendar {
    source: Box<dyn HolidaySource>,
    cache: RwLock<HashMap<i32, Arc<[Holiday]>>>,
}

impl BusinessCalendar {
    pub fn new(source: impl HolidaySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// US federal holidays plus the closures listed in the configuration.
    pub fn from_config(config: &SchedulingConfig) -> Self {
        Self::new(WithClosures::from_entries(
            UsFederalHolidays,
            &config.extra_holidays,
        ))
    }

    fn holidays_for_year(&self, year: i32) -> Arc<[Holiday]> {
        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(holidays) = cache.get(&year) {
                return holidays.clone();
            }
        }

        let computed: Arc<[Holiday]> = self.source.holidays_for_year(year).into();
        debug!("Resolved {} holidays for {}", computed.len(), year);

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        cache.entry(year).or_insert(computed).clone()
    }

    /// The holiday on `date`, if any.
    pub fn holiday(&self, date: NaiveDate) -> Option<Holiday> {
        self.holidays_for_year(date.year())
            .iter()
            .find(|holiday| holiday.date == date)
            .cloned()
    }

    pub fn holiday_name(&self, date: NaiveDate) -> Option<String> {
        self.holiday(date).map(|holiday| holiday.name)
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !Self::is_weekend(date) && self.holiday(date).is_none()
    }

    /// First business day strictly after `date`.
    pub fn next_business_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        let mut candidate = date;
        for _ in 0..MAX_SEARCH_DAYS {
            candidate = match candidate.succ_opt() {
                Some(next) => next,
                None => break,
            };
            if self.is_business_day(candidate) {
                return Ok(candidate);
            }
        }
        Err(CalendarError::NoBusinessDay {
            from: date,
            days: MAX_SEARCH_DAYS,
        })
    }

    /// The first `count` business days on or after `start`.
    ///
    /// Looks at no more than `count * 2 + 14` calendar days, so the result may
    /// be shorter than `count` around long closures.
    pub fn business_days_from(&self, start: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let horizon = count.saturating_mul(2).saturating_add(14);
        let mut days = Vec::with_capacity(count);
        for offset in 0..horizon {
            if days.len() >= count {
                break;
            }
            let Some(date) = start.checked_add_signed(Duration::days(offset as i64)) else {
                break;
            };
            if self.is_business_day(date) {
                days.push(date);
            }
        }
        days
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::new(UsFederalHolidays)
    }
}

impl std::fmt::Debug for BusinessCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let years: Vec<i32> = self
            .cache
            .read()
            .map(|cache| cache.keys().copied().collect())
            .unwrap_or_default();
        f.debug_struct("BusinessCalendar")
            .field("cached_years", &years)
            .finish()
    }
}
