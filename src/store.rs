//! Slot persistence.
//!
//! # Records
//!
//! Slots cross the storage boundary as [`SlotRecord`]s: flat rows of
//! strings using the ISO `YYYY-MM-DD` date format, an `HH:MM-HH:MM`
//! time range, a lowercase status code, and the owner columns when the
//! slot is booked. The format matches what a spreadsheet row or CSV
//! line holds, so any tabular backend can implement [`SlotStore`].
//!
//! # Decoding
//!
//! Decoding is lenient per row and strict per field: a malformed row is
//! skipped (reported as a [`SkippedRecord`] and logged), never guessed
//! at, and the remaining rows still load. The owner invariant is
//! enforced on the way in through [`TimeSlot::restore`].
//!
//! # Reconciliation
//!
//! The in-memory [`Schedule`] is authoritative. Saving overwrites the
//! store with the current state; there is no merge and no rollback. A
//! failed save leaves memory untouched and surfaces a [`StoreError`].

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Schedule, SlotOwner, SlotStatus, TimeSlot};
use crate::validation::{parse_date, parse_time_range, ValidationError, DATE_FORMAT};

/// Storage backend failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not be reached or read.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Writing records to the backend failed.
    #[error("store write failed: {0}")]
    WriteFailed(String),
    /// Flushing written records failed.
    #[error("store commit failed: {0}")]
    CommitFailed(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// One slot as a flat storage row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    /// Date as `YYYY-MM-DD`.
    pub date: String,
    /// Time range as `HH:MM-HH:MM`.
    pub time_range: String,
    /// Status code: `free`, `pending` or `confirmed`.
    pub status: String,
    /// Owning expert id, when booked.
    pub expert_id: Option<u32>,
    /// Owning expert name, when booked.
    pub expert_name: Option<String>,
}

impl SlotRecord {
    /// Encodes a slot as a storage row.
    pub fn from_slot(slot: &TimeSlot) -> Self {
        Self {
            date: slot.date.format(DATE_FORMAT).to_string(),
            time_range: slot.format_time_range(),
            status: slot.status().to_string(),
            expert_id: slot.expert_id(),
            expert_name: slot.expert_name().map(String::from),
        }
    }

    /// Decodes the row back into a slot.
    ///
    /// Fails on an unparseable date, time range or status, and on an
    /// owner column inconsistent with the status. A booked row with an
    /// id but no name gets an empty name; the name is denormalized and
    /// not the source of truth.
    pub fn to_slot(&self) -> Result<TimeSlot, ValidationError> {
        let date = parse_date(&self.date)?;
        let (start_time, end_time) = parse_time_range(&self.time_range)?;
        let status: SlotStatus = self.status.parse()?;
        let owner = self.expert_id.map(|id| {
            SlotOwner::new(id, self.expert_name.clone().unwrap_or_default())
        });
        TimeSlot::restore(date, start_time, end_time, status, owner)
    }
}

/// A row that failed to decode, with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Zero-based index of the record in the loaded batch.
    pub index: usize,
    /// Why the record was rejected.
    pub reason: ValidationError,
}

/// Encodes slots as storage rows.
pub fn encode_slots(slots: &[TimeSlot]) -> Vec<SlotRecord> {
    slots.iter().map(SlotRecord::from_slot).collect()
}

/// Decodes rows into slots, skipping the malformed ones.
///
/// Returns the decoded slots plus one [`SkippedRecord`] per rejected
/// row. Each skip is also logged with its index and reason.
pub fn decode_records(records: &[SlotRecord]) -> (Vec<TimeSlot>, Vec<SkippedRecord>) {
    let mut slots = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match record.to_slot() {
            Ok(slot) => slots.push(slot),
            Err(reason) => {
                warn!("skipping record {index}: {reason}");
                skipped.push(SkippedRecord { index, reason });
            }
        }
    }

    (slots, skipped)
}

/// A tabular backend holding slot rows.
///
/// Implementations only move rows; encoding, decoding and the
/// authoritative in-memory state live in [`save_schedule`] and
/// [`load_schedule`].
pub trait SlotStore {
    /// Reads every record from the backend.
    fn load_all(&self) -> StoreResult<Vec<SlotRecord>>;

    /// Writes records to the backend.
    ///
    /// With `clear_existing` the batch replaces the stored rows,
    /// otherwise it is appended.
    fn write_all(&mut self, records: &[SlotRecord], clear_existing: bool) -> StoreResult<()>;

    /// Flushes buffered writes to durable storage.
    fn commit(&mut self) -> StoreResult<()>;
}

/// In-memory store, used in tests and as the no-persistence default.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<SlotRecord>,
    commits: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with records.
    pub fn with_records(records: Vec<SlotRecord>) -> Self {
        Self {
            records,
            commits: 0,
        }
    }

    /// The stored rows.
    pub fn records(&self) -> &[SlotRecord] {
        &self.records
    }

    /// How many times the store has been committed.
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl SlotStore for MemoryStore {
    fn load_all(&self) -> StoreResult<Vec<SlotRecord>> {
        Ok(self.records.clone())
    }

    fn write_all(&mut self, records: &[SlotRecord], clear_existing: bool) -> StoreResult<()> {
        if clear_existing {
            self.records.clear();
        }
        self.records.extend_from_slice(records);
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.commits += 1;
        Ok(())
    }
}

/// Writes the whole schedule to the store, replacing its contents.
pub fn save_schedule<S: SlotStore>(store: &mut S, schedule: &Schedule) -> StoreResult<()> {
    let records = encode_slots(&schedule.all_slots());
    store.write_all(&records, true)?;
    store.commit()?;
    info!("saved {} slots to store", records.len());
    Ok(())
}

/// Reads the store into a fresh schedule.
///
/// Malformed rows are dropped and returned as [`SkippedRecord`]s; the
/// schedule holds everything that decoded.
pub fn load_schedule<S: SlotStore>(store: &S) -> StoreResult<(Schedule, Vec<SkippedRecord>)> {
    let records = store.load_all()?;
    let (slots, skipped) = decode_records(&records);

    let mut schedule = Schedule::new();
    schedule.add_slots(slots);

    info!(
        "loaded {} slots from store ({} records skipped)",
        schedule.len(),
        skipped.len()
    );
    Ok((schedule, skipped))
}
