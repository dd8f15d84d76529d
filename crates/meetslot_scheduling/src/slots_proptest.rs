#[cfg(test)]
mod tests {
    use crate::availability::resolve;
    use crate::slots::SlotGenerator;
    use chrono::{Duration, NaiveDate, TimeZone, Timelike, Utc};
    use chrono_tz::America::Denver;
    use meetslot_common::models::BusyInterval;
    use proptest::prelude::*;

    fn date_from_offset(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Duration::days(offset)
    }

    proptest! {
        // Every generated slot is aligned, inside the window and in the future
        #[test]
        fn slots_are_aligned_and_inside_window(
            day_offset in 0..1095i64,
            now_offset_minutes in 0..(24 * 60i64),
        ) {
            let date = date_from_offset(day_offset);
            let now = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
                + Duration::minutes(now_offset_minutes);
            let slots = SlotGenerator::default().generate_slots(date, now);

            prop_assert!(slots.len() <= 20);
            for slot in &slots {
                let local = slot.start.with_timezone(&Denver);
                prop_assert_eq!(local.date_naive(), date);
                prop_assert!(local.hour() >= 7 && local.hour() < 17);
                prop_assert_eq!(local.minute() % 30, 0);
                prop_assert!(slot.start > now);
                prop_assert_eq!(slot.end - slot.start, Duration::minutes(30));
            }
        }

        // A day entirely in the future always has the full set
        #[test]
        fn future_days_are_complete(day_offset in 1..1095i64) {
            let date = date_from_offset(day_offset);
            let now = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
            prop_assert_eq!(SlotGenerator::default().generate_slots(date, now).len(), 20);
        }

        // Resolution keeps cardinality and marks exactly the overlapping slots
        #[test]
        fn resolution_matches_strict_overlap(
            busy_offsets in prop::collection::vec((0..(11 * 60i64), 1..180i64), 0..6),
        ) {
            let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
            let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
            let slots = SlotGenerator::default().generate_slots(date, now);
            let day_start = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
            let busy: Vec<BusyInterval> = busy_offsets
                .iter()
                .map(|(offset, length)| {
                    let start = day_start + Duration::minutes(*offset);
                    BusyInterval::new(start, start + Duration::minutes(*length))
                })
                .collect();

            let resolved = resolve(slots.clone(), &busy);
            prop_assert_eq!(resolved.len(), slots.len());
            for (slot, original) in resolved.iter().zip(&slots) {
                prop_assert_eq!(slot.start, original.start);
                let blocked = busy.iter().any(|b| slot.start < b.end && slot.end > b.start);
                prop_assert_eq!(slot.available, !blocked);
            }
        }
    }
}
