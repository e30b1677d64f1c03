//! Slot allocation and booking engine.
//!
//! Generates recurring session slots on a weekly grid, tracks each slot
//! through a book/confirm/release lifecycle, and matches free slots to
//! experts by their preferred weekdays.
//!
//! # Modules
//!
//! - **`models`**: domain types `TimeSlot`, `SlotStatus`, `Expert`,
//!   `Schedule` and `Weekday`
//! - **`matcher`**: Preference-driven slot selection and conflict review
//! - **`generator`**: Date expansion and slot grid construction
//! - **`config`**: Session timing and horizon settings
//! - **`validation`**: Parsing and integrity checks for user input
//! - **`store`**: Flat-record persistence behind the `SlotStore` trait
//! - **`directory`**: Expert registry keyed by chat id
//!
//! # Flow
//!
//! A schedule is built by `generator` from a `ScheduleConfig`, mutated
//! through the paired booking operations on `Schedule` (which keep slot
//! state and expert ledgers in step), queried through `matcher`, and
//! persisted through `store`. All dates are naive local dates; nothing
//! in the crate reads the clock.

pub mod config;
pub mod directory;
pub mod generator;
pub mod matcher;
pub mod models;
pub mod store;
pub mod validation;
