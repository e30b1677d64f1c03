//! Slot selection algorithms.
//!
//! # Algorithms
//!
//! - **Select** (`find_slots_for_expert`): walk the expert's preferred
//!   weekdays chronologically and take the first free slot per date.
//! - **Distribute** (`distribute_evenly`): spread sessions over the
//!   horizon with a minimum interval between picks, trading density for
//!   even coverage.
//! - **Substitute** (`find_alternative_slots`): offer replacements on
//!   the same weekday in the following weeks, preferring the original
//!   start time.
//!
//! All three skip dates the expert already holds, return clones in
//! chronological order, and may return fewer slots than requested. The
//! reference date is an explicit argument; no algorithm reads the
//! clock.

use chrono::{Duration, NaiveDate};
use log::{info, warn};

use crate::generator::dates_for_weekdays;
use crate::models::{Expert, Schedule, SlotStats, TimeSlot, Weekday};

use super::conflict::{self, Conflict};

/// Weeks scanned ahead of the original slot when offering alternatives.
const ALTERNATIVE_WEEKS: i64 = 4;

/// Proposes bookable slots for experts against the live schedule.
///
/// The matcher borrows the schedule, so every proposal is computed
/// against current state. Booking a proposal goes through
/// [`Schedule::book_slot`] once the matcher is dropped; the borrow
/// checker rules out booking while a matcher still holds the schedule.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use slotmatch::matcher::SlotMatcher;
/// use slotmatch::models::{Expert, Schedule, TimeSlot, Weekday};
///
/// let monday = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
/// let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let end = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
///
/// let mut schedule = Schedule::new();
/// schedule.add_slot(TimeSlot::new(monday, start, end));
///
/// let expert = Expert::new(1, "Anna").with_preferred_weekdays(vec![Weekday::Monday]);
///
/// let matcher = SlotMatcher::new(&schedule);
/// let proposed = matcher.find_slots_for_expert(&expert, 1, 4, monday);
/// assert_eq!(proposed.len(), 1);
/// assert_eq!(proposed[0].date, monday);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SlotMatcher<'a> {
    schedule: &'a Schedule,
}

impl<'a> SlotMatcher<'a> {
    /// Creates a matcher over a schedule.
    pub fn new(schedule: &'a Schedule) -> Self {
        Self { schedule }
    }

    /// Picks up to `count` free slots on the expert's preferred weekdays.
    ///
    /// Candidate dates are every preferred weekday within
    /// `[start_date, start_date + weeks_ahead * 7)`, minus dates the
    /// expert already holds. The first free slot of each date is taken,
    /// chronologically, until `count` is reached. An expert without
    /// preferences gets an empty result.
    pub fn find_slots_for_expert(
        &self,
        expert: &Expert,
        count: usize,
        weeks_ahead: u32,
        start_date: NaiveDate,
    ) -> Vec<TimeSlot> {
        if expert.preferred_weekdays().is_empty() {
            warn!("expert {} ({}) has no preferred weekdays", expert.id, expert.name);
            return Vec::new();
        }

        let mut picked = Vec::new();
        for date in dates_for_weekdays(start_date, weeks_ahead, expert.preferred_weekdays()) {
            if picked.len() == count {
                break;
            }
            if expert.is_date_booked(date) {
                continue;
            }
            if let Some(slot) = self.first_free_on(date) {
                picked.push(slot.clone());
            }
        }

        info!(
            "selected {}/{count} slots for expert {} from {start_date}",
            picked.len(),
            expert.id
        );
        picked
    }

    /// Spreads up to `count` sessions evenly over the horizon.
    ///
    /// The target interval is `max(7, weeks_ahead * 7 / count)` days. A
    /// day-stepped cursor starts at `start_date`; on a pick (preferred
    /// weekday, date not held by the expert, free slot available) it
    /// jumps by the interval, otherwise it advances one day. The walk
    /// stops after `count` picks or `weeks_ahead * 7` iterations, so the
    /// result may hold fewer slots than requested.
    pub fn distribute_evenly(
        &self,
        expert: &Expert,
        count: usize,
        weeks_ahead: u32,
        start_date: NaiveDate,
    ) -> Vec<TimeSlot> {
        if count == 0 {
            return Vec::new();
        }
        if expert.preferred_weekdays().is_empty() {
            warn!("expert {} ({}) has no preferred weekdays", expert.id, expert.name);
            return Vec::new();
        }

        let horizon_days = i64::from(weeks_ahead) * 7;
        let interval = (horizon_days / count as i64).max(7);

        let mut picked = Vec::new();
        let mut cursor = start_date;
        let mut attempts = 0;

        while picked.len() < count && attempts < horizon_days {
            attempts += 1;

            let wanted = expert.has_preferred_weekday(Weekday::of(cursor))
                && !expert.is_date_booked(cursor);
            let hit = if wanted { self.first_free_on(cursor) } else { None };

            match hit {
                Some(slot) => {
                    picked.push(slot.clone());
                    cursor += Duration::days(interval);
                }
                None => cursor += Duration::days(1),
            }
        }

        info!(
            "distributed {}/{count} slots for expert {} at >= {interval} day intervals",
            picked.len(),
            expert.id
        );
        picked
    }

    /// Offers up to `count` replacements for an unavailable slot.
    ///
    /// Candidates fall on the same weekday as `original`, one to four
    /// weeks later. Dates the expert already holds are skipped. A free
    /// slot at the original start time is preferred; otherwise the
    /// first free slot of the day stands in.
    pub fn find_alternative_slots(
        &self,
        original: &TimeSlot,
        expert: &Expert,
        count: usize,
    ) -> Vec<TimeSlot> {
        let mut picked = Vec::new();
        for week in 1..=ALTERNATIVE_WEEKS {
            if picked.len() == count {
                break;
            }
            let date = original.date + Duration::days(7 * week);
            if expert.is_date_booked(date) {
                continue;
            }

            let candidates = self.schedule.slots_on(date);
            let same_time = candidates
                .iter()
                .find(|s| s.is_free() && s.start_time == original.start_time);
            let any_free = || candidates.iter().find(|s| s.is_free());

            if let Some(slot) = same_time.or_else(any_free) {
                picked.push(slot.clone());
            }
        }

        info!(
            "found {}/{count} alternatives for {original} (expert {})",
            picked.len(),
            expert.id
        );
        picked
    }

    /// Reviews a proposed slot set; see [`conflict::check_conflicts`].
    pub fn check_conflicts(&self, slots: &[TimeSlot]) -> Vec<Conflict> {
        conflict::check_conflicts(slots)
    }

    /// Occupancy statistics of the underlying schedule.
    pub fn statistics(&self) -> SlotStats {
        self.schedule.statistics()
    }

    fn first_free_on(&self, date: NaiveDate) -> Option<&'a TimeSlot> {
        self.schedule.slots_on(date).iter().find(|s| s.is_free())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::slots_for_dates;
    use crate::matcher::ConflictKind;
    use chrono::NaiveTime;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn t(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    fn slot(date: NaiveDate, hour: u32) -> TimeSlot {
        TimeSlot::new(date, t(hour), NaiveTime::from_hms_opt(hour + 1, 30, 0).unwrap())
    }

    /// Monday 2026-09-07, the base of most fixtures below.
    fn base_monday() -> NaiveDate {
        d(2026, 9, 7)
    }

    fn daily_schedule(weeks: u32) -> Schedule {
        let dates = dates_for_weekdays(base_monday(), weeks, &Weekday::ALL);
        let grid = [(t(9), NaiveTime::from_hms_opt(10, 30, 0).unwrap())];
        let mut schedule = Schedule::new();
        schedule.add_slots(slots_for_dates(&dates, &grid));
        schedule
    }

    #[test]
    fn test_find_slots_honors_preferences_and_order() {
        let mut schedule = Schedule::new();
        // Mon 7th, Tue 8th, Wed 9th, Fri 11th, Mon 14th, Wed 16th
        for day in [7, 8, 9, 11, 14, 16] {
            schedule.add_slot(slot(d(2026, 9, day), 9));
        }
        let expert = Expert::new(1, "Anna")
            .with_preferred_weekdays(vec![Weekday::Monday, Weekday::Wednesday]);

        let matcher = SlotMatcher::new(&schedule);
        let picked = matcher.find_slots_for_expert(&expert, 3, 2, base_monday());

        let dates: Vec<NaiveDate> = picked.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![d(2026, 9, 7), d(2026, 9, 9), d(2026, 9, 14)]);
        for slot in &picked {
            let day = slot.weekday();
            assert!(day == Weekday::Monday || day == Weekday::Wednesday);
        }
    }

    #[test]
    fn test_find_slots_takes_first_free_of_each_date() {
        let mut schedule = Schedule::new();
        let monday = base_monday();
        schedule.add_slot(slot(monday, 9));
        schedule.add_slot(slot(monday, 11));

        let mut other = Expert::new(2, "Boris");
        schedule.book_slot(&slot(monday, 9), &mut other);

        let expert = Expert::new(1, "Anna").with_preferred_weekdays(vec![Weekday::Monday]);
        let matcher = SlotMatcher::new(&schedule);
        let picked = matcher.find_slots_for_expert(&expert, 1, 1, monday);

        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].start_time, t(11));
    }

    #[test]
    fn test_find_slots_skips_dates_the_expert_holds() {
        let schedule = daily_schedule(2);
        let mut expert = Expert::new(1, "Anna").with_preferred_weekdays(vec![Weekday::Monday]);
        expert.add_pending_slot(base_monday());

        let matcher = SlotMatcher::new(&schedule);
        let picked = matcher.find_slots_for_expert(&expert, 5, 2, base_monday());

        // Only the second Monday remains
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].date, d(2026, 9, 14));
    }

    #[test]
    fn test_find_slots_skips_fully_booked_dates() {
        let mut schedule = Schedule::new();
        schedule.add_slot(slot(base_monday(), 9));
        schedule.add_slot(slot(d(2026, 9, 14), 9));

        let mut other = Expert::new(2, "Boris");
        schedule.book_slot(&slot(base_monday(), 9), &mut other);

        let expert = Expert::new(1, "Anna").with_preferred_weekdays(vec![Weekday::Monday]);
        let matcher = SlotMatcher::new(&schedule);
        let picked = matcher.find_slots_for_expert(&expert, 5, 2, base_monday());

        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].date, d(2026, 9, 14));
    }

    #[test]
    fn test_find_slots_without_preferences_is_empty() {
        let schedule = daily_schedule(2);
        let expert = Expert::new(1, "Anna");
        let matcher = SlotMatcher::new(&schedule);

        assert!(matcher.find_slots_for_expert(&expert, 3, 2, base_monday()).is_empty());
    }

    #[test]
    fn test_find_slots_count_bounds() {
        let schedule = daily_schedule(2);
        let expert = Expert::new(1, "Anna").with_preferred_weekdays(vec![Weekday::Monday]);
        let matcher = SlotMatcher::new(&schedule);

        assert!(matcher.find_slots_for_expert(&expert, 0, 2, base_monday()).is_empty());
        // Asking for more than exists returns what exists
        let picked = matcher.find_slots_for_expert(&expert, 10, 2, base_monday());
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_distribute_keeps_minimum_interval() {
        // 84 daily slots, 5 requested over 12 weeks: interval = 84/5 = 16 days
        let schedule = daily_schedule(12);
        let expert = Expert::new(1, "Anna").with_preferred_weekdays(Weekday::ALL.to_vec());

        let matcher = SlotMatcher::new(&schedule);
        let picked = matcher.distribute_evenly(&expert, 5, 12, base_monday());

        assert_eq!(picked.len(), 5);
        for pair in picked.windows(2) {
            let gap = (pair[1].date - pair[0].date).num_days();
            assert!(gap >= 16, "gap {gap} is tighter than the 16 day interval");
        }
    }

    #[test]
    fn test_distribute_interval_never_below_one_week() {
        // 14 days, 12 requested: raw interval would be 1, floor is 7
        let schedule = daily_schedule(2);
        let expert = Expert::new(1, "Anna").with_preferred_weekdays(Weekday::ALL.to_vec());

        let matcher = SlotMatcher::new(&schedule);
        let picked = matcher.distribute_evenly(&expert, 12, 2, base_monday());

        assert_eq!(picked.len(), 2);
        assert_eq!((picked[1].date - picked[0].date).num_days(), 7);
    }

    #[test]
    fn test_distribute_may_under_fill() {
        // Mondays only over 2 weeks: two pickable dates at most
        let mut schedule = Schedule::new();
        schedule.add_slot(slot(base_monday(), 9));
        schedule.add_slot(slot(d(2026, 9, 14), 9));
        let expert = Expert::new(1, "Anna").with_preferred_weekdays(vec![Weekday::Monday]);

        let matcher = SlotMatcher::new(&schedule);
        let picked = matcher.distribute_evenly(&expert, 5, 2, base_monday());

        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_distribute_trivial_inputs() {
        let schedule = daily_schedule(2);
        let with_prefs = Expert::new(1, "Anna").with_preferred_weekdays(vec![Weekday::Monday]);
        let without_prefs = Expert::new(2, "Boris");

        let matcher = SlotMatcher::new(&schedule);
        assert!(matcher.distribute_evenly(&with_prefs, 0, 2, base_monday()).is_empty());
        assert!(matcher.distribute_evenly(&without_prefs, 3, 2, base_monday()).is_empty());
    }

    #[test]
    fn test_alternatives_same_weekday_prefer_same_time() {
        let tuesday = d(2026, 9, 8);
        let original = slot(tuesday, 9);

        let mut schedule = Schedule::new();
        // Week +1: 09:00 taken, 11:00 free → fallback time
        schedule.add_slot(slot(d(2026, 9, 15), 9));
        schedule.add_slot(slot(d(2026, 9, 15), 11));
        let mut other = Expert::new(2, "Boris");
        schedule.book_slot(&slot(d(2026, 9, 15), 9), &mut other);
        // Week +2: 09:00 free → same time wins
        schedule.add_slot(slot(d(2026, 9, 22), 9));
        schedule.add_slot(slot(d(2026, 9, 22), 11));
        // Week +3: free, but the expert already holds that date
        schedule.add_slot(slot(d(2026, 9, 29), 9));
        // Week +4: only 11:00
        schedule.add_slot(slot(d(2026, 10, 6), 11));

        let mut expert = Expert::new(1, "Anna").with_preferred_weekdays(vec![Weekday::Tuesday]);
        expert.add_pending_slot(d(2026, 9, 29));

        let matcher = SlotMatcher::new(&schedule);
        let picked = matcher.find_alternative_slots(&original, &expert, 4);

        assert_eq!(picked.len(), 3);
        assert_eq!(picked[0].date, d(2026, 9, 15));
        assert_eq!(picked[0].start_time, t(11));
        assert_eq!(picked[1].date, d(2026, 9, 22));
        assert_eq!(picked[1].start_time, t(9));
        assert_eq!(picked[2].date, d(2026, 10, 6));
        assert_eq!(picked[2].start_time, t(11));
        for alt in &picked {
            assert_eq!(alt.weekday(), Weekday::Tuesday);
        }
    }

    #[test]
    fn test_alternatives_window_is_four_weeks() {
        let tuesday = d(2026, 9, 8);
        let original = slot(tuesday, 9);

        // Free same-weekday slots for ten weeks ahead
        let mut schedule = Schedule::new();
        for week in 1..=10 {
            schedule.add_slot(slot(tuesday + Duration::days(7 * week), 9));
        }

        let expert = Expert::new(1, "Anna");
        let matcher = SlotMatcher::new(&schedule);
        let picked = matcher.find_alternative_slots(&original, &expert, 10);

        // Only four weeks are scanned
        assert_eq!(picked.len(), 4);
        assert_eq!(picked.last().unwrap().date, d(2026, 10, 6));
    }

    #[test]
    fn test_alternatives_respect_count() {
        let tuesday = d(2026, 9, 8);
        let original = slot(tuesday, 9);

        let mut schedule = Schedule::new();
        for week in 1..=4 {
            schedule.add_slot(slot(tuesday + Duration::days(7 * week), 9));
        }

        let expert = Expert::new(1, "Anna");
        let matcher = SlotMatcher::new(&schedule);
        let picked = matcher.find_alternative_slots(&original, &expert, 2);

        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].date, d(2026, 9, 15));
        assert_eq!(picked[1].date, d(2026, 9, 22));
    }

    #[test]
    fn test_matcher_reads_live_state() {
        let mut schedule = Schedule::new();
        schedule.add_slot(slot(base_monday(), 9));
        let expert = Expert::new(1, "Anna").with_preferred_weekdays(vec![Weekday::Monday]);

        let before = SlotMatcher::new(&schedule).find_slots_for_expert(&expert, 1, 1, base_monday());
        assert_eq!(before.len(), 1);

        let mut other = Expert::new(2, "Boris");
        schedule.book_slot(&slot(base_monday(), 9), &mut other);

        // A matcher built after the booking sees the slot as taken
        let after = SlotMatcher::new(&schedule).find_slots_for_expert(&expert, 1, 1, base_monday());
        assert!(after.is_empty());
    }

    #[test]
    fn test_conflicts_and_statistics_delegate() {
        let mut schedule = Schedule::new();
        schedule.add_slot(slot(base_monday(), 9));
        schedule.add_slot(slot(base_monday(), 11));

        let matcher = SlotMatcher::new(&schedule);

        let proposal = vec![slot(base_monday(), 9), slot(base_monday(), 11)];
        let conflicts = matcher.check_conflicts(&proposal);
        assert!(conflicts.iter().any(|c| c.kind == ConflictKind::DuplicateDate));

        let stats = matcher.statistics();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.free, 2);
    }
}
