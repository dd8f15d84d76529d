// --- File: crates/meetslot_scheduling/src/availability.rs ---
use crate::calendar::BusinessCalendar;
use crate::external::{time_boxed, BUSY_SOURCE};
use crate::slots::SlotGenerator;
use chrono::NaiveDate;
use meetslot_common::models::{BusyInterval, TimeSlot};
use meetslot_common::services::BusyTimeSource;
use meetslot_common::Clock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Default bound for the busy-time lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Marks every slot that strictly overlaps a busy interval as unavailable.
///
/// Cardinality and order of `slots` are preserved.
pub fn resolve(slots: Vec<TimeSlot>, busy: &[BusyInterval]) -> Vec<TimeSlot> {
    slots
        .into_iter()
        .map(|slot| TimeSlot {
            available: !busy.iter().any(|b| b.overlaps(slot.start, slot.end)),
            ..slot
        })
        .collect()
}

/// Result of a slot query for one date.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SlotAvailability {
    pub date: NaiveDate,
    /// Name of the holiday when the date is closed for one.
    pub holiday: Option<String>,
    /// `true` when the busy-time lookup failed and slots were offered unchecked.
    pub busy_source_degraded: bool,
    pub slots: Vec<TimeSlot>,
}

/// Slot query: eligibility, generation, busy lookup and resolution.
pub struct AvailabilityService {
    calendar: Arc<BusinessCalendar>,
    generator: SlotGenerator,
    busy_source: Option<Arc<dyn BusyTimeSource>>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl AvailabilityService {
    pub fn new(calendar: Arc<BusinessCalendar>, generator: SlotGenerator, clock: Arc<dyn Clock>) -> Self {
        Self {
            calendar,
            generator,
            busy_source: None,
            clock,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_busy_source(mut self, source: Arc<dyn BusyTimeSource>) -> Self {
        self.busy_source = Some(source);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    pub fn generator(&self) -> &SlotGenerator {
        &self.generator
    }

    /// Slots of `date` with their availability.
    ///
    /// Non-business days yield an empty list. When the busy source fails or
    /// times out, all generated slots are reported available and the result
    /// is flagged as degraded.
    #[instrument(skip(self))]
    pub async fn slots_for_date(&self, date: NaiveDate) -> SlotAvailability {
        let holiday = self.calendar.holiday_name(date);
        if !self.calendar.is_business_day(date) {
            info!("{} is not a business day", date);
            return SlotAvailability {
                date,
                holiday,
                busy_source_degraded: false,
                slots: Vec::new(),
            };
        }

        let slots = self.generator.generate_slots(date, self.clock.now());
        let (Some(source), Some(first), Some(last)) =
            (&self.busy_source, slots.first(), slots.last())
        else {
            return SlotAvailability {
                date,
                holiday,
                busy_source_degraded: false,
                slots,
            };
        };

        let (start, end) = (first.start, last.end);
        match time_boxed(BUSY_SOURCE, self.timeout, source.busy_intervals(start, end)).await {
            Ok(busy) => SlotAvailability {
                date,
                holiday,
                busy_source_degraded: false,
                slots: resolve(slots, &busy),
            },
            Err(e) => {
                warn!("Busy-time lookup failed for {}, offering all slots: {}", date, e);
                SlotAvailability {
                    date,
                    holiday,
                    busy_source_degraded: true,
                    slots,
                }
            }
        }
    }
}
