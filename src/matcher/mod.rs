//! Slot matching and conflict review.
//!
//! Provides preference-driven slot selection and sanity checks over
//! proposed bookings.
//!
//! # Matching
//!
//! `SlotMatcher` borrows a [`Schedule`](crate::models::Schedule) and
//! proposes free slots for an expert: straight preference matching,
//! even distribution over a horizon, and same-weekday alternatives for
//! a slot that fell through.
//!
//! # Conflicts
//!
//! `check_conflicts` reviews a proposed slot set before it is booked,
//! flagging duplicate dates and sessions packed closer than the
//! minimum spacing.

mod conflict;
mod select;

pub use conflict::{check_conflicts, Conflict, ConflictKind, MIN_GAP_DAYS};
pub use select::SlotMatcher;
