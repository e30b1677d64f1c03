//! Expert model.
//!
//! An expert is a bookable person: identity, weekday preferences used by
//! the matching algorithms, and two private date ledgers tracking which
//! dates the expert holds as pending or confirmed bookings.
//!
//! # Ledger Invariant
//!
//! A date is never in both ledgers. Confirmation moves a date from
//! pending to confirmed, and a date that is already confirmed silently
//! wins over a later pending request. The ledgers are private so every
//! change goes through the methods that preserve this.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Weekday;

/// A bookable expert with weekday preferences and booking ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expert {
    /// Unique expert identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Chat identifier of the messaging account, when linked.
    pub chat_id: Option<i64>,
    preferred_weekdays: Vec<Weekday>,
    confirmed_slots: BTreeSet<NaiveDate>,
    pending_slots: BTreeSet<NaiveDate>,
}

impl Expert {
    /// Creates an expert with no preferences and empty ledgers.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            chat_id: None,
            preferred_weekdays: Vec::new(),
            confirmed_slots: BTreeSet::new(),
            pending_slots: BTreeSet::new(),
        }
    }

    /// Sets the linked chat id.
    pub fn with_chat_id(mut self, chat_id: i64) -> Self {
        self.chat_id = Some(chat_id);
        self
    }

    /// Sets the preferred weekdays.
    pub fn with_preferred_weekdays(mut self, days: Vec<Weekday>) -> Self {
        self.set_preferred_weekdays(days);
        self
    }

    /// Replaces the preferred weekdays, deduplicated in first-seen order.
    pub fn set_preferred_weekdays(&mut self, days: Vec<Weekday>) {
        self.preferred_weekdays.clear();
        for day in days {
            if !self.preferred_weekdays.contains(&day) {
                self.preferred_weekdays.push(day);
            }
        }
    }

    /// Adds a preferred weekday. Returns `false` if already present.
    pub fn add_preferred_weekday(&mut self, day: Weekday) -> bool {
        if self.preferred_weekdays.contains(&day) {
            return false;
        }
        self.preferred_weekdays.push(day);
        true
    }

    /// Removes a preferred weekday. Returns `false` if it was not set.
    pub fn remove_preferred_weekday(&mut self, day: Weekday) -> bool {
        let before = self.preferred_weekdays.len();
        self.preferred_weekdays.retain(|d| *d != day);
        self.preferred_weekdays.len() < before
    }

    /// Whether a weekday is preferred.
    pub fn has_preferred_weekday(&self, day: Weekday) -> bool {
        self.preferred_weekdays.contains(&day)
    }

    /// Preferred weekdays in first-seen order.
    pub fn preferred_weekdays(&self) -> &[Weekday] {
        &self.preferred_weekdays
    }

    /// Records a confirmed booking on a date.
    ///
    /// Idempotent. The date leaves the pending ledger: confirmation
    /// supersedes a pending booking on the same date.
    pub fn add_confirmed_slot(&mut self, date: NaiveDate) {
        self.pending_slots.remove(&date);
        self.confirmed_slots.insert(date);
    }

    /// Records a pending booking on a date.
    ///
    /// Idempotent. A no-op when the date is already confirmed; a
    /// confirmed booking wins over a later pending one.
    pub fn add_pending_slot(&mut self, date: NaiveDate) {
        if self.confirmed_slots.contains(&date) {
            return;
        }
        self.pending_slots.insert(date);
    }

    /// Removes a date from both ledgers.
    pub fn remove_slot(&mut self, date: NaiveDate) {
        self.confirmed_slots.remove(&date);
        self.pending_slots.remove(&date);
    }

    /// Whether the expert already holds a booking on a date, in either
    /// ledger. This is the one-slot-per-date rule the matcher consults.
    pub fn is_date_booked(&self, date: NaiveDate) -> bool {
        self.confirmed_slots.contains(&date) || self.pending_slots.contains(&date)
    }

    /// Number of confirmed bookings.
    pub fn confirmed_slots_count(&self) -> usize {
        self.confirmed_slots.len()
    }

    /// Number of pending bookings.
    pub fn pending_slots_count(&self) -> usize {
        self.pending_slots.len()
    }

    /// Total bookings across both ledgers.
    pub fn total_slots_count(&self) -> usize {
        self.confirmed_slots.len() + self.pending_slots.len()
    }

    /// Whether the expert holds any booking.
    pub fn has_slots(&self) -> bool {
        !self.confirmed_slots.is_empty() || !self.pending_slots.is_empty()
    }

    /// Confirmed booking dates in ascending order.
    pub fn confirmed_dates(&self) -> Vec<NaiveDate> {
        self.confirmed_slots.iter().copied().collect()
    }

    /// Pending booking dates in ascending order.
    pub fn pending_dates(&self) -> Vec<NaiveDate> {
        self.pending_slots.iter().copied().collect()
    }
}
