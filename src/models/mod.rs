//! Booking domain models.
//!
//! Core data types for the slot allocation engine:
//!
//! - [`TimeSlot`]: one bookable session with a three-state lifecycle
//!   (`Free` → `Pending` → `Confirmed`) and an owner while booked
//! - [`Expert`]: a bookable person with weekday preferences and
//!   per-date booking ledgers
//! - [`Schedule`]: the date-indexed slot registry with paired
//!   slot-and-ledger mutations
//! - [`Weekday`]: calendar weekday with a parsing token table

mod expert;
mod schedule;
mod timeslot;
mod weekday;

pub use expert::Expert;
pub use schedule::{OwnerSummary, Schedule, SlotStats};
pub use timeslot::{SlotOwner, SlotStatus, TimeSlot};
pub use weekday::Weekday;
