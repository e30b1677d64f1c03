//! Time slot model.
//!
//! A time slot is one bookable session on a calendar date. It carries a
//! three-state booking lifecycle and, while booked, the owning expert.
//!
//! # State Machine
//!
//! ```text
//! Free ──book──▶ Pending ──confirm──▶ Confirmed
//!   ▲               │                     │
//!   └────release────┴──────release────────┘
//! ```
//!
//! `book` succeeds only from `Free`, `confirm` only from `Pending`.
//! `release` is legal from any state and always lands on `Free`.
//! There is no direct path from `Free` to `Confirmed`.
//!
//! # Owner Invariant
//!
//! The owner is present if and only if the slot is not `Free`. Owner and
//! status are private and move together through the transition methods,
//! so the pair cannot be half-set.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Weekday;
use crate::validation::ValidationError;

/// Booking lifecycle state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Open for booking.
    Free,
    /// Booked, awaiting confirmation.
    Pending,
    /// Booked and confirmed.
    Confirmed,
}

impl Default for SlotStatus {
    fn default() -> Self {
        SlotStatus::Free
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            SlotStatus::Free => "free",
            SlotStatus::Pending => "pending",
            SlotStatus::Confirmed => "confirmed",
        };
        f.write_str(code)
    }
}

impl FromStr for SlotStatus {
    type Err = ValidationError;

    /// Parses a status code, case-insensitive.
    ///
    /// Accepts the legacy code `"booked"` as `Pending` so records written
    /// by earlier versions still load.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(SlotStatus::Free),
            "pending" | "booked" => Ok(SlotStatus::Pending),
            "confirmed" => Ok(SlotStatus::Confirmed),
            _ => Err(ValidationError::UnknownStatus {
                token: s.trim().to_string(),
            }),
        }
    }
}

/// The expert holding a booked slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotOwner {
    /// Owning expert identifier.
    pub expert_id: u32,
    /// Owning expert name (denormalized for display and persistence).
    pub expert_name: String,
}

impl SlotOwner {
    /// Creates an owner.
    pub fn new(expert_id: u32, expert_name: impl Into<String>) -> Self {
        Self {
            expert_id,
            expert_name: expert_name.into(),
        }
    }
}

/// A bookable session slot on a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Calendar date of the session.
    pub date: NaiveDate,
    /// Session start time.
    pub start_time: NaiveTime,
    /// Session end time.
    pub end_time: NaiveTime,
    status: SlotStatus,
    owner: Option<SlotOwner>,
}

impl TimeSlot {
    /// Creates a free slot.
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            date,
            start_time,
            end_time,
            status: SlotStatus::Free,
            owner: None,
        }
    }

    /// Rebuilds a slot from persisted parts, checking the owner invariant.
    ///
    /// A non-free slot must carry an owner and a free slot must not;
    /// anything else is a corrupt record.
    pub fn restore(
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        status: SlotStatus,
        owner: Option<SlotOwner>,
    ) -> Result<Self, ValidationError> {
        match (status, &owner) {
            (SlotStatus::Free, Some(_)) => Err(ValidationError::UnexpectedOwner),
            (SlotStatus::Pending | SlotStatus::Confirmed, None) => {
                Err(ValidationError::MissingOwner { status })
            }
            _ => Ok(Self {
                date,
                start_time,
                end_time,
                status,
                owner,
            }),
        }
    }

    /// Books the slot for an expert.
    ///
    /// Succeeds only from `Free`; the slot becomes `Pending` and takes
    /// the owner. Returns `false` from any other state, unchanged.
    pub fn book(&mut self, expert_id: u32, expert_name: impl Into<String>) -> bool {
        if self.status != SlotStatus::Free {
            return false;
        }
        self.status = SlotStatus::Pending;
        self.owner = Some(SlotOwner::new(expert_id, expert_name));
        true
    }

    /// Confirms a pending booking.
    ///
    /// Succeeds only from `Pending`. Returns `false` from any other
    /// state, unchanged. A free slot cannot be confirmed directly.
    pub fn confirm(&mut self) -> bool {
        if self.status != SlotStatus::Pending {
            return false;
        }
        self.status = SlotStatus::Confirmed;
        true
    }

    /// Releases the slot back to `Free` and clears the owner.
    ///
    /// Legal from any state; releasing a free slot is a no-op.
    pub fn release(&mut self) {
        self.status = SlotStatus::Free;
        self.owner = None;
    }

    /// Current lifecycle state.
    #[inline]
    pub fn status(&self) -> SlotStatus {
        self.status
    }

    /// The owning expert, when booked.
    #[inline]
    pub fn owner(&self) -> Option<&SlotOwner> {
        self.owner.as_ref()
    }

    /// Owning expert id, when booked.
    pub fn expert_id(&self) -> Option<u32> {
        self.owner.as_ref().map(|o| o.expert_id)
    }

    /// Owning expert name, when booked.
    pub fn expert_name(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.expert_name.as_str())
    }

    /// Whether the slot is open for booking.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.status == SlotStatus::Free
    }

    /// Whether the slot is booked but not yet confirmed.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == SlotStatus::Pending
    }

    /// Whether the slot is confirmed.
    #[inline]
    pub fn is_confirmed(&self) -> bool {
        self.status == SlotStatus::Confirmed
    }

    /// Whether the slot is occupied (pending or confirmed).
    #[inline]
    pub fn is_booked(&self) -> bool {
        self.status != SlotStatus::Free
    }

    /// Session length in minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.end_time
            .signed_duration_since(self.start_time)
            .num_minutes()
    }

    /// The weekday this slot falls on.
    pub fn weekday(&self) -> Weekday {
        Weekday::of(self.date)
    }

    /// The time range as `"HH:MM-HH:MM"`.
    pub fn format_time_range(&self) -> String {
        format!(
            "{}-{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.format_time_range())
    }
}
