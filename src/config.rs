//! Engine configuration.
//!
//! [`ScheduleConfig`] carries the tunables of the booking engine:
//! session and break lengths, daily working hours, the planning horizon
//! and how many alternatives to offer. The defaults match the standard
//! deployment: 90-minute sessions with 15-minute breaks between 09:00
//! and 21:00, planned 12 weeks ahead.
//!
//! Configs deserialize from any serde format; times use the `"HH:MM"`
//! wire form and missing fields fall back to the defaults.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// Tunables of the booking engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Session length in minutes.
    pub session_minutes: u32,
    /// Break between consecutive sessions in minutes.
    pub break_minutes: u32,
    /// Start of the working day.
    #[serde(with = "hhmm")]
    pub work_start: NaiveTime,
    /// End of the working day.
    #[serde(with = "hhmm")]
    pub work_end: NaiveTime,
    /// Planning horizon in weeks.
    pub weeks_ahead: u32,
    /// How many alternative slots to offer for an unavailable one.
    pub alternatives_count: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            session_minutes: 90,
            break_minutes: 15,
            work_start: hm(9, 0),
            work_end: hm(21, 0),
            weeks_ahead: 12,
            alternatives_count: 3,
        }
    }
}

impl ScheduleConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the session length.
    pub fn with_session_minutes(mut self, minutes: u32) -> Self {
        self.session_minutes = minutes;
        self
    }

    /// Sets the break length.
    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.break_minutes = minutes;
        self
    }

    /// Sets the working hours.
    pub fn with_working_hours(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.work_start = start;
        self.work_end = end;
        self
    }

    /// Sets the planning horizon.
    pub fn with_weeks_ahead(mut self, weeks: u32) -> Self {
        self.weeks_ahead = weeks;
        self
    }

    /// The daily session grid derived from the working hours.
    ///
    /// Sessions are laid back to back from `work_start`, separated by
    /// the break, until the next session would end after `work_end`.
    /// With the defaults this yields seven ranges: 09:00-10:30,
    /// 10:45-12:15, 12:30-14:00, 14:15-15:45, 16:00-17:30, 17:45-19:15
    /// and 19:30-21:00.
    pub fn time_grid(&self) -> Vec<(NaiveTime, NaiveTime)> {
        if self.session_minutes == 0 {
            return Vec::new();
        }
        let session = Duration::minutes(i64::from(self.session_minutes));
        let gap = Duration::minutes(i64::from(self.break_minutes));

        let mut grid = Vec::new();
        let mut cursor = self.work_start;
        loop {
            let (end, wrapped) = cursor.overflowing_add_signed(session);
            if wrapped != 0 || end > self.work_end {
                break;
            }
            grid.push((cursor, end));

            let (next, wrapped) = end.overflowing_add_signed(gap);
            if wrapped != 0 {
                break;
            }
            cursor = next;
        }
        grid
    }
}

fn hm(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).expect("hour and minute are in range")
}

mod hhmm {
    //! `"HH:MM"` serde representation for [`NaiveTime`] fields.

    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&text, FORMAT).map_err(serde::de::Error::custom)
    }
}
