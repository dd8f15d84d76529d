// --- File: crates/meetslot_scheduling/src/holidays.rs ---
//! Holiday data sources for the business calendar.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use meetslot_common::models::Holiday;
use meetslot_config::HolidayEntry;

/// Supplies the public holidays of one year.
pub trait HolidaySource: Send + Sync {
    /// All closures whose date falls in `year`. Order is irrelevant.
    fn holidays_for_year(&self, year: i32) -> Vec<Holiday>;
}

/// United States federal holidays, including the observed weekday of
/// fixed-date holidays that fall on a weekend.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsFederalHolidays;

impl UsFederalHolidays {
    fn fixed(year: i32, month: u32, day: u32, name: &str, out: &mut Vec<Holiday>) {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return;
        };
        out.push(Holiday::new(date, name));
        let observed = match date.weekday() {
            Weekday::Sat => date - Duration::days(1),
            Weekday::Sun => date + Duration::days(1),
            _ => return,
        };
        // New Year's Day on a Saturday is observed on Dec 31 of the prior year,
        // which belongs to that year's list.
        if observed.year() == year {
            out.push(Holiday::new(observed, format!("{} (observed)", name)));
        }
    }

    fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8, name: &str, out: &mut Vec<Holiday>) {
        if let Some(date) = NaiveDate::from_weekday_of_month_opt(year, month, weekday, n) {
            out.push(Holiday::new(date, name));
        }
    }

    fn last_weekday(year: i32, month: u32, weekday: Weekday, name: &str, out: &mut Vec<Holiday>) {
        let last = (1..=5)
            .rev()
            .find_map(|n| NaiveDate::from_weekday_of_month_opt(year, month, weekday, n));
        if let Some(date) = last {
            out.push(Holiday::new(date, name));
        }
    }
}

impl HolidaySource for UsFederalHolidays {
    fn holidays_for_year(&self, year: i32) -> Vec<Holiday> {
        let mut out = Vec::with_capacity(16);

        Self::fixed(year, 1, 1, "New Year's Day", &mut out);
        Self::nth_weekday(year, 1, Weekday::Mon, 3, "Martin Luther King Jr. Day", &mut out);
        Self::nth_weekday(year, 2, Weekday::Mon, 3, "Washington's Birthday", &mut out);
        Self::last_weekday(year, 5, Weekday::Mon, "Memorial Day", &mut out);
        if year >= 2021 {
            Self::fixed(year, 6, 19, "Juneteenth National Independence Day", &mut out);
        }
        Self::fixed(year, 7, 4, "Independence Day", &mut out);
        Self::nth_weekday(year, 9, Weekday::Mon, 1, "Labor Day", &mut out);
        Self::nth_weekday(year, 10, Weekday::Mon, 2, "Columbus Day", &mut out);
        Self::fixed(year, 11, 11, "Veterans Day", &mut out);
        Self::nth_weekday(year, 11, Weekday::Thu, 4, "Thanksgiving Day", &mut out);
        Self::fixed(year, 12, 25, "Christmas Day", &mut out);

        // Observed New Year's Day of the following year.
        if let Some(next_new_year) = NaiveDate::from_ymd_opt(year + 1, 1, 1) {
            if next_new_year.weekday() == Weekday::Sat {
                out.push(Holiday::new(
                    next_new_year - Duration::days(1),
                    "New Year's Day (observed)",
                ));
            }
        }

        out
    }
}

/// Wraps another source and adds fixed business closures.
#[derive(Debug, Clone)]
pub struct WithClosures<S> {
    base: S,
    closures: Vec<Holiday>,
}

impl<S: HolidaySource> WithClosures<S> {
    pub fn new(base: S, closures: Vec<Holiday>) -> Self {
        Self { base, closures }
    }

    pub fn from_entries(base: S, entries: &[HolidayEntry]) -> Self {
        let closures = entries
            .iter()
            .map(|entry| Holiday::new(entry.date, entry.name.clone()))
            .collect();
        Self::new(base, closures)
    }
}

impl<S: HolidaySource> HolidaySource for WithClosures<S> {
    fn holidays_for_year(&self, year: i32) -> Vec<Holiday> {
        let mut holidays = self.base.holidays_for_year(year);
        holidays.extend(
            self.closures
                .iter()
                .filter(|closure| closure.date.year() == year)
                .cloned(),
        );
        holidays
    }
}
