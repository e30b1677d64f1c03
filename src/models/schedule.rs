//! Schedule registry model.
//!
//! The schedule owns every time slot, keyed by date. Slots live in a
//! single ordered map, so the date index and the slot collection are one
//! structure and cannot drift apart. Buckets are kept sorted by start
//! time, which makes every query chronological by construction.
//!
//! # Paired Mutations
//!
//! Booking state lives in two places: the slot itself and the owning
//! expert's date ledger. `book_slot`, `confirm_slot` and `release_slot`
//! update both sides together. They re-locate the canonical slot by
//! date and start time, so callers may pass copies obtained from
//! queries; a stale copy whose canonical slot has moved on fails
//! cleanly without touching any ledger.
//!
//! # Queries
//!
//! Queries hand out clones (or the read-only `slots_on` view), never
//! live mutable access. Mutating a query result does not change the
//! registry.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{Expert, TimeSlot, Weekday};

/// Registry of all time slots, indexed by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    slots: BTreeMap<NaiveDate, Vec<TimeSlot>>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a slot, keeping its date bucket ordered by start time.
    pub fn add_slot(&mut self, slot: TimeSlot) {
        debug!("adding slot {slot}");
        self.insert_sorted(slot);
    }

    /// Adds a batch of slots.
    pub fn add_slots(&mut self, slots: Vec<TimeSlot>) {
        let count = slots.len();
        for slot in slots {
            self.insert_sorted(slot);
        }
        info!("added {count} slots to schedule");
    }

    fn insert_sorted(&mut self, slot: TimeSlot) {
        let bucket = self.slots.entry(slot.date).or_default();
        let pos = bucket
            .binary_search_by(|s| {
                (s.start_time, s.end_time).cmp(&(slot.start_time, slot.end_time))
            })
            .unwrap_or_else(|p| p);
        bucket.insert(pos, slot);
    }

    /// Removes a slot matched by value. Returns `false` when absent.
    pub fn remove_slot(&mut self, slot: &TimeSlot) -> bool {
        if let Some(bucket) = self.slots.get_mut(&slot.date) {
            if let Some(pos) = bucket.iter().position(|s| s == slot) {
                bucket.remove(pos);
                if bucket.is_empty() {
                    self.slots.remove(&slot.date);
                }
                debug!("removed slot {slot}");
                return true;
            }
        }
        warn!("slot {slot} not found for removal");
        false
    }

    /// Books a slot for an expert, updating slot and ledger together.
    ///
    /// The canonical slot is located by date and start time, so `slot`
    /// may be a copy from an earlier query. On success the slot becomes
    /// pending and the date enters the expert's pending ledger. When the
    /// slot is unknown or no longer free, nothing changes and `false`
    /// is returned.
    pub fn book_slot(&mut self, slot: &TimeSlot, expert: &mut Expert) -> bool {
        match self.locate_mut(slot.date, slot.start_time) {
            Some(target) => {
                if target.book(expert.id, expert.name.clone()) {
                    info!("booked {target} for expert {} ({})", expert.id, expert.name);
                    expert.add_pending_slot(slot.date);
                    true
                } else {
                    warn!("cannot book {target}: status is {}", target.status());
                    false
                }
            }
            None => {
                warn!(
                    "cannot book: no slot at {} {}",
                    slot.date,
                    slot.start_time.format("%H:%M")
                );
                false
            }
        }
    }

    /// Confirms a pending slot, updating slot and ledger together.
    ///
    /// Same re-location rules as [`Schedule::book_slot`]. On success the
    /// date moves into the expert's confirmed ledger.
    pub fn confirm_slot(&mut self, slot: &TimeSlot, expert: &mut Expert) -> bool {
        match self.locate_mut(slot.date, slot.start_time) {
            Some(target) => {
                if target.confirm() {
                    info!("confirmed {target} for expert {} ({})", expert.id, expert.name);
                    expert.add_confirmed_slot(slot.date);
                    true
                } else {
                    warn!("cannot confirm {target}: status is {}", target.status());
                    false
                }
            }
            None => {
                warn!(
                    "cannot confirm: no slot at {} {}",
                    slot.date,
                    slot.start_time.format("%H:%M")
                );
                false
            }
        }
    }

    /// Releases a slot back to free.
    ///
    /// Unconditional and idempotent. When an expert is supplied, the
    /// date is scrubbed from both of that expert's ledgers even if the
    /// canonical slot is gone.
    pub fn release_slot(&mut self, slot: &TimeSlot, expert: Option<&mut Expert>) {
        if let Some(target) = self.locate_mut(slot.date, slot.start_time) {
            target.release();
            info!("released {target}");
        }
        if let Some(expert) = expert {
            expert.remove_slot(slot.date);
        }
    }

    /// Removes every slot.
    pub fn clear(&mut self) {
        info!("clearing schedule ({} slots)", self.len());
        self.slots.clear();
    }

    fn locate_mut(&mut self, date: NaiveDate, start_time: NaiveTime) -> Option<&mut TimeSlot> {
        self.slots
            .get_mut(&date)?
            .iter_mut()
            .find(|s| s.start_time == start_time)
    }

    /// All slots in chronological order.
    pub fn all_slots(&self) -> Vec<TimeSlot> {
        self.slots.values().flatten().cloned().collect()
    }

    /// All free slots in chronological order.
    pub fn free_slots(&self) -> Vec<TimeSlot> {
        self.filtered(TimeSlot::is_free)
    }

    /// All occupied slots (pending or confirmed).
    pub fn booked_slots(&self) -> Vec<TimeSlot> {
        self.filtered(TimeSlot::is_booked)
    }

    /// All pending slots.
    pub fn pending_slots(&self) -> Vec<TimeSlot> {
        self.filtered(TimeSlot::is_pending)
    }

    /// All confirmed slots.
    pub fn confirmed_slots(&self) -> Vec<TimeSlot> {
        self.filtered(TimeSlot::is_confirmed)
    }

    fn filtered(&self, keep: impl Fn(&TimeSlot) -> bool) -> Vec<TimeSlot> {
        self.slots
            .values()
            .flatten()
            .filter(|s| keep(s))
            .cloned()
            .collect()
    }

    /// Read-only view of one date's slots, ordered by start time.
    pub fn slots_on(&self, date: NaiveDate) -> &[TimeSlot] {
        self.slots.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Copies of one date's slots, ordered by start time.
    pub fn slots_by_date(&self, date: NaiveDate) -> Vec<TimeSlot> {
        self.slots_on(date).to_vec()
    }

    /// Slots within an inclusive date range, chronological.
    ///
    /// An inverted range (`from` after `to`) holds no dates and yields nothing.
    pub fn slots_in_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<TimeSlot> {
        if from > to {
            return Vec::new();
        }
        self.slots
            .range(from..=to)
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect()
    }

    /// Slots falling on a given weekday, chronological.
    pub fn slots_by_weekday(&self, day: Weekday) -> Vec<TimeSlot> {
        self.slots
            .iter()
            .filter(|(date, _)| Weekday::of(**date) == day)
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect()
    }

    /// Slots owned by a given expert, chronological.
    pub fn slots_by_expert(&self, expert_id: u32) -> Vec<TimeSlot> {
        self.filtered(|s| s.expert_id() == Some(expert_id))
    }

    /// Finds the slot at an exact date and start time.
    pub fn find_slot(&self, date: NaiveDate, start_time: NaiveTime) -> Option<TimeSlot> {
        self.slots_on(date)
            .iter()
            .find(|s| s.start_time == start_time)
            .cloned()
    }

    /// Dates that currently carry at least one slot, ascending.
    pub fn dates_with_slots(&self) -> Vec<NaiveDate> {
        self.slots.keys().copied().collect()
    }

    /// Slots on `from` or later, chronological.
    pub fn future_slots(&self, from: NaiveDate) -> Vec<TimeSlot> {
        self.slots
            .range(from..)
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect()
    }

    /// Per-expert booking counts derived from slot owners, by expert id.
    pub fn owner_summaries(&self) -> Vec<OwnerSummary> {
        let mut by_id: BTreeMap<u32, OwnerSummary> = BTreeMap::new();
        for slot in self.slots.values().flatten() {
            if let Some(owner) = slot.owner() {
                by_id
                    .entry(owner.expert_id)
                    .or_insert_with(|| OwnerSummary {
                        expert_id: owner.expert_id,
                        expert_name: owner.expert_name.clone(),
                        slot_count: 0,
                    })
                    .slot_count += 1;
            }
        }
        by_id.into_values().collect()
    }

    /// Total number of slots.
    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Whether the schedule holds no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Occupancy statistics over all slots.
    pub fn statistics(&self) -> SlotStats {
        SlotStats::from_slots(self.slots.values().flatten())
    }
}

/// Booking counts for one expert, derived from slot owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerSummary {
    /// Expert identifier taken from the slot owner.
    pub expert_id: u32,
    /// Expert name taken from the slot owner.
    pub expert_name: String,
    /// Number of slots the expert holds.
    pub slot_count: usize,
}

/// Occupancy statistics over a set of slots.
///
/// `booked` counts occupied slots, so `pending + confirmed == booked`
/// and `free + booked == total`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotStats {
    /// Total number of slots.
    pub total: usize,
    /// Slots open for booking.
    pub free: usize,
    /// Occupied slots (pending or confirmed).
    pub booked: usize,
    /// Booked but unconfirmed slots.
    pub pending: usize,
    /// Confirmed slots.
    pub confirmed: usize,
    /// `booked / total` as a percentage, rounded to two decimals.
    /// `0.0` when there are no slots.
    pub utilization_percent: f64,
}

impl SlotStats {
    /// Computes statistics over any slot iterator.
    pub fn from_slots<'a>(slots: impl IntoIterator<Item = &'a TimeSlot>) -> Self {
        let mut total = 0;
        let mut free = 0;
        let mut pending = 0;
        let mut confirmed = 0;

        for slot in slots {
            total += 1;
            if slot.is_free() {
                free += 1;
            } else if slot.is_pending() {
                pending += 1;
            } else {
                confirmed += 1;
            }
        }

        let booked = pending + confirmed;
        let utilization_percent = if total == 0 {
            0.0
        } else {
            (booked as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
        };

        Self {
            total,
            free,
            booked,
            pending,
            confirmed,
            utilization_percent,
        }
    }
}
