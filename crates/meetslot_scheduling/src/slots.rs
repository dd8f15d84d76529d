// --- File: crates/meetslot_scheduling/src/slots.rs ---
use crate::time::{local_business_instant, BusinessWindow};
use chrono::{DateTime, NaiveDate, Utc};
use meetslot_common::models::{TimeSlot, SLOT_MINUTES};
use tracing::debug;

/// Produces the canonical half-hour slots of one day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotGenerator {
    window: BusinessWindow,
}

impl SlotGenerator {
    pub fn new(window: BusinessWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &BusinessWindow {
        &self.window
    }

    /// Every slot start of `date` inside the window, in order, past or not.
    ///
    /// Local times that do not exist on that date are skipped.
    pub fn candidate_starts(&self, date: NaiveDate) -> Vec<DateTime<Utc>> {
        let tz = self.window.time_zone();
        let per_hour = 60 / SLOT_MINUTES as u32;
        (self.window.open_hour()..self.window.close_hour())
            .flat_map(|hour| (0..per_hour).map(move |i| (hour, i * SLOT_MINUTES as u32)))
            .filter_map(|(hour, minute)| local_business_instant(tz, date, hour, minute))
            .collect()
    }

    /// Slots of `date` whose start lies strictly after `now`, all available.
    ///
    /// Eligibility of the date is the caller's concern.
    pub fn generate_slots(&self, date: NaiveDate, now: DateTime<Utc>) -> Vec<TimeSlot> {
        let slots: Vec<TimeSlot> = self
            .candidate_starts(date)
            .into_iter()
            .filter(|start| *start > now)
            .map(TimeSlot::starting_at)
            .collect();
        debug!("Generated {} slots for {}", slots.len(), date);
        slots
    }
}
