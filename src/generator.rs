//! Slot grid generation.
//!
//! Expands weekday patterns into concrete dates and builds free slots
//! from a session grid. The reference date is always an explicit
//! argument; nothing here reads the clock, which keeps generation
//! reproducible.

use chrono::{Duration, NaiveDate, NaiveTime};
use log::info;

use crate::config::ScheduleConfig;
use crate::models::{TimeSlot, Weekday};

/// Every date on one of the given weekdays within `weeks` weeks.
///
/// The window is `[start, start + weeks * 7)`; results are ascending.
pub fn dates_for_weekdays(start: NaiveDate, weeks: u32, weekdays: &[Weekday]) -> Vec<NaiveDate> {
    let horizon = i64::from(weeks) * 7;
    let mut dates = Vec::new();
    for offset in 0..horizon {
        let date = start + Duration::days(offset);
        if weekdays.contains(&Weekday::of(date)) {
            dates.push(date);
        }
    }
    dates
}

/// The strictly-next Monday after `from`.
///
/// A Monday input yields the Monday of the following week.
pub fn next_monday(from: NaiveDate) -> NaiveDate {
    let passed = Weekday::of(from).days_from_monday();
    from + Duration::days(i64::from(7 - passed))
}

/// Free slots for one date, one per grid range.
pub fn slots_for_date(date: NaiveDate, grid: &[(NaiveTime, NaiveTime)]) -> Vec<TimeSlot> {
    grid.iter()
        .map(|&(start, end)| TimeSlot::new(date, start, end))
        .collect()
}

/// Free slots for every date and grid range, in chronological order.
pub fn slots_for_dates(dates: &[NaiveDate], grid: &[(NaiveTime, NaiveTime)]) -> Vec<TimeSlot> {
    let mut slots = Vec::with_capacity(dates.len() * grid.len());
    for &date in dates {
        for &(start, end) in grid {
            slots.push(TimeSlot::new(date, start, end));
        }
    }
    slots
}

/// Builds the full slot grid for a planning period.
///
/// Takes every date on the given weekdays within the config horizon and
/// lays the config session grid over each. The result is ready for
/// [`crate::models::Schedule::add_slots`].
pub fn build_schedule(
    config: &ScheduleConfig,
    start: NaiveDate,
    weekdays: &[Weekday],
) -> Vec<TimeSlot> {
    let dates = dates_for_weekdays(start, config.weeks_ahead, weekdays);
    let grid = config.time_grid();
    let slots = slots_for_dates(&dates, &grid);
    info!(
        "generated {} slots over {} dates from {start}",
        slots.len(),
        dates.len()
    );
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn t(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    #[test]
    fn test_next_monday_is_strictly_future() {
        // 2026-08-24 is a Monday
        assert_eq!(next_monday(d(2026, 8, 24)), d(2026, 8, 31));
        // Tuesday through Sunday land on the same upcoming Monday
        assert_eq!(next_monday(d(2026, 8, 25)), d(2026, 8, 31));
        assert_eq!(next_monday(d(2026, 8, 29)), d(2026, 8, 31));
        assert_eq!(next_monday(d(2026, 8, 30)), d(2026, 8, 31));
    }

    #[test]
    fn test_dates_for_weekdays() {
        // Two weeks from Monday 2026-09-07, Mondays and Wednesdays
        let dates = dates_for_weekdays(
            d(2026, 9, 7),
            2,
            &[Weekday::Monday, Weekday::Wednesday],
        );
        assert_eq!(
            dates,
            vec![d(2026, 9, 7), d(2026, 9, 9), d(2026, 9, 14), d(2026, 9, 16)]
        );
    }

    #[test]
    fn test_dates_window_excludes_end() {
        // One week from Wednesday: the next Wednesday is outside [start, start+7)
        let dates = dates_for_weekdays(d(2026, 9, 9), 1, &[Weekday::Wednesday]);
        assert_eq!(dates, vec![d(2026, 9, 9)]);
    }

    #[test]
    fn test_dates_empty_inputs() {
        assert!(dates_for_weekdays(d(2026, 9, 7), 0, &[Weekday::Monday]).is_empty());
        assert!(dates_for_weekdays(d(2026, 9, 7), 4, &[]).is_empty());
    }

    #[test]
    fn test_slots_for_date() {
        let grid = [(t(9, 0), t(10, 30)), (t(10, 45), t(12, 15))];
        let slots = slots_for_date(d(2026, 9, 7), &grid);

        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.is_free()));
        assert_eq!(slots[0].start_time, t(9, 0));
        assert_eq!(slots[1].start_time, t(10, 45));
        assert_eq!(slots[0].date, d(2026, 9, 7));
    }

    #[test]
    fn test_slots_for_dates_chronological() {
        let grid = [(t(9, 0), t(10, 30))];
        let dates = [d(2026, 9, 7), d(2026, 9, 8)];
        let slots = slots_for_dates(&dates, &grid);

        assert_eq!(slots.len(), 2);
        assert!(slots[0].date < slots[1].date);
    }

    #[test]
    fn test_build_schedule_uses_config_horizon_and_grid() {
        let config = ScheduleConfig::new().with_weeks_ahead(1);
        let weekdays = [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
        ];
        // One week from a Monday: five working days, seven sessions each
        let slots = build_schedule(&config, d(2026, 9, 7), &weekdays);
        assert_eq!(slots.len(), 35);
        assert!(slots.iter().all(|s| s.is_free()));
        assert_eq!(slots.first().unwrap().date, d(2026, 9, 7));
        assert_eq!(slots.last().unwrap().date, d(2026, 9, 11));
    }
}
