//! Input validation and parsing.
//!
//! Turns external text (user messages, persisted records) into typed
//! values, and checks domain rules on them. Every function reports
//! failure through [`ValidationError`] and touches no state.
//!
//! Wire formats are fixed: dates are `YYYY-MM-DD`, times are `HH:MM`,
//! time ranges are `HH:MM-HH:MM`.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::config::ScheduleConfig;
use crate::models::{SlotStatus, Weekday};

/// Date wire format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Time wire format.
pub const TIME_FORMAT: &str = "%H:%M";

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;

/// Result of a validation or parse step.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A validation failure on external input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Date string does not match `YYYY-MM-DD`.
    #[error("invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate { input: String },
    /// Time string does not match `HH:MM`.
    #[error("invalid time '{input}', expected HH:MM")]
    InvalidTime { input: String },
    /// Time range string does not match `HH:MM-HH:MM`.
    #[error("invalid time range '{input}', expected HH:MM-HH:MM")]
    InvalidTimeRange { input: String },
    /// Time range ends at or before its start.
    #[error("time range '{input}' ends at or before its start")]
    EmptyTimeRange { input: String },
    /// Token is not a weekday code or name.
    #[error("unknown weekday '{token}'")]
    UnknownWeekday { token: String },
    /// Weekday list input contained no tokens.
    #[error("no weekdays given")]
    NoWeekdays,
    /// Token is not a slot status code.
    #[error("unknown slot status '{token}'")]
    UnknownStatus { token: String },
    /// A booked slot record carries no owner.
    #[error("slot with status '{status}' has no owner")]
    MissingOwner { status: SlotStatus },
    /// A free slot record carries an owner.
    #[error("free slot has an owner")]
    UnexpectedOwner,
    /// Date lies before the reference day.
    #[error("date {date} is in the past")]
    DateInPast { date: NaiveDate },
    /// Name fails the length rules.
    #[error("invalid name: {reason}")]
    InvalidName { reason: String },
    /// Slot times fall outside the configured working hours.
    #[error(
        "slot {}-{} is outside working hours",
        .start.format("%H:%M"),
        .end.format("%H:%M")
    )]
    OutsideWorkingHours { start: NaiveTime, end: NaiveTime },
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> ValidationResult<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        input: trimmed.to_string(),
    })
}

/// Parses an `HH:MM` time.
pub fn parse_time(input: &str) -> ValidationResult<NaiveTime> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT).map_err(|_| ValidationError::InvalidTime {
        input: trimmed.to_string(),
    })
}

/// Parses an `HH:MM-HH:MM` range. The end must lie after the start.
pub fn parse_time_range(input: &str) -> ValidationResult<(NaiveTime, NaiveTime)> {
    let trimmed = input.trim();
    let (start_part, end_part) =
        trimmed
            .split_once('-')
            .ok_or_else(|| ValidationError::InvalidTimeRange {
                input: trimmed.to_string(),
            })?;

    let start = parse_time(start_part)?;
    let end = parse_time(end_part)?;
    if end <= start {
        return Err(ValidationError::EmptyTimeRange {
            input: trimmed.to_string(),
        });
    }
    Ok((start, end))
}

/// Parses a weekday list from free text.
///
/// Tokens may be separated by commas or whitespace; each token is a
/// three-letter code or full name, any case. Duplicates collapse in
/// first-seen order. Any unknown token fails the whole input.
pub fn parse_weekdays(input: &str) -> ValidationResult<Vec<Weekday>> {
    let mut days = Vec::new();
    for token in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let day: Weekday = token.parse()?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    if days.is_empty() {
        return Err(ValidationError::NoWeekdays);
    }
    Ok(days)
}

/// Checks that a date is not before the reference day.
pub fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    if date < today {
        return Err(ValidationError::DateInPast { date });
    }
    Ok(())
}

/// Validates a display name: 2 to 100 characters after trimming.
///
/// Returns the trimmed name.
pub fn validate_name(input: &str) -> ValidationResult<String> {
    let trimmed = input.trim();
    let chars = trimmed.chars().count();
    if chars < NAME_MIN_CHARS {
        return Err(ValidationError::InvalidName {
            reason: format!("shorter than {NAME_MIN_CHARS} characters"),
        });
    }
    if chars > NAME_MAX_CHARS {
        return Err(ValidationError::InvalidName {
            reason: format!("longer than {NAME_MAX_CHARS} characters"),
        });
    }
    Ok(trimmed.to_string())
}

/// Checks that a session lies within the configured working hours.
pub fn within_working_hours(
    start: NaiveTime,
    end: NaiveTime,
    config: &ScheduleConfig,
) -> ValidationResult<()> {
    if start < config.work_start || end > config.work_end {
        return Err(ValidationError::OutsideWorkingHours { start, end });
    }
    Ok(())
}
