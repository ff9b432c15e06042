use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Length of every slot, in minutes.
pub const SLOT_MINUTES: i64 = 30;

pub fn slot_length() -> Duration {
    Duration::minutes(SLOT_MINUTES)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub clinic_id: Uuid,
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    pub overnight: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Shift {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.work_date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        let end = self.work_date.and_time(self.end_time);
        if self.overnight { end + Duration::days(1) } else { end }
    }

    /// Break window on absolute date-times. A break that starts before the
    /// shift start on an overnight shift belongs to the next day, and a break
    /// whose end is not after its start runs past midnight.
    pub fn break_window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let (break_start, break_end) = (self.break_start?, self.break_end?);
        let mut from = self.work_date.and_time(break_start);
        if self.overnight && break_start < self.start_time {
            from += Duration::days(1);
        }
        let mut to = from.date().and_time(break_end);
        if to <= from {
            to += Duration::days(1);
        }
        Some((from, to))
    }

    /// Whether `at` falls inside `[start, end)`.
    pub fn covers(&self, at: NaiveDateTime) -> bool {
        self.starts_at() <= at && at < self.ends_at()
    }

    /// Whether `[from, to)` lies inside the shift and clear of its break.
    pub fn covers_window(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        if from < self.starts_at() || to > self.ends_at() {
            return false;
        }
        match self.break_window() {
            Some((break_from, break_to)) => to <= break_from || from >= break_to,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Available,
    Booked,
    Blocked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "AVAILABLE",
            SlotStatus::Booked => "BOOKED",
            SlotStatus::Blocked => "BLOCKED",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(SlotStatus::Available),
            "BOOKED" => Ok(SlotStatus::Booked),
            "BLOCKED" => Ok(SlotStatus::Blocked),
            other => Err(format!("Unknown slot status: {}", other)),
        }
    }
}

/// A 30-minute unit carved out of a shift.
///
/// `slot_date` is the calendar date the slot starts on, which is the day
/// after the work date for the post-midnight part of an overnight shift.
/// `version` is bumped on every status transition and guards concurrent
/// reservations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub shift_id: Uuid,
    pub staff_id: Uuid,
    pub clinic_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SlotStatus,
    pub version: i64,
}

impl Slot {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.slot_date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.starts_at() + slot_length()
    }

    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }

    pub fn overlaps(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        self.starts_at() < to && from < self.ends_at()
    }
}

/// Opening hours of a clinic for one weekday, supplied by the clinic
/// directory. `day_of_week` counts from Monday = 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub clinic_id: Uuid,
    pub day_of_week: i16,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_closed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShiftRequest {
    pub staff_id: Uuid,
    pub clinic_id: Uuid,
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    #[serde(default)]
    pub overnight: bool,
    pub notes: Option<String>,
    /// Replace an existing shift for the same staff, clinic and date.
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShiftBatchRequest {
    pub staff_id: Uuid,
    pub clinic_id: Uuid,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    /// Restrict to these weekdays (Monday = 0). All days when absent.
    pub weekdays: Option<Vec<i16>>,
    /// Number of consecutive weeks the range is laid down for.
    #[serde(default = "default_repeat_weeks")]
    pub repeat_weeks: u32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    #[serde(default)]
    pub overnight: bool,
    pub notes: Option<String>,
    #[serde(default)]
    pub force: bool,
}

fn default_repeat_weeks() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftWithSlots {
    pub shift: Shift,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedShift {
    pub work_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShiftBatchResponse {
    pub created: Vec<ShiftWithSlots>,
    pub skipped: Vec<SkippedShift>,
}
