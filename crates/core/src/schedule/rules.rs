//! Preconditions checked before a shift is persisted.

use chrono::Datelike;

use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::shift::{OperatingHours, Shift};

pub fn validate_shift_times(shift: &Shift) -> ScheduleResult<()> {
    if !shift.overnight && shift.end_time <= shift.start_time {
        return Err(ScheduleError::Validation(
            "End time must be after start time for a shift that does not run overnight".to_string(),
        ));
    }
    if shift.overnight && shift.end_time > shift.start_time {
        return Err(ScheduleError::Validation(
            "An overnight shift must end at or before its start time on the next day".to_string(),
        ));
    }

    match (shift.break_start, shift.break_end) {
        (None, None) => Ok(()),
        (Some(_), None) | (None, Some(_)) => Err(ScheduleError::Validation(
            "Break start and break end must be given together".to_string(),
        )),
        (Some(break_start), Some(break_end)) => {
            if !shift.overnight && break_end <= break_start {
                return Err(ScheduleError::Validation(
                    "Break end must be after break start".to_string(),
                ));
            }
            let (from, to) = shift
                .break_window()
                .ok_or_else(|| ScheduleError::Validation("Invalid break window".to_string()))?;
            if from < shift.starts_at() || to > shift.ends_at() {
                return Err(ScheduleError::Validation(
                    "Break must lie within the shift".to_string(),
                ));
            }
            Ok(())
        }
    }
}

/// Checks the shift against the clinic's opening hours for its weekday.
/// Clinics without configured hours accept any shift.
pub fn validate_operating_hours(shift: &Shift, hours: Option<&OperatingHours>) -> ScheduleResult<()> {
    let Some(hours) = hours else {
        return Ok(());
    };

    if hours.is_closed {
        return Err(ScheduleError::Validation(format!(
            "Clinic is closed on {}",
            shift.work_date.weekday()
        )));
    }
    if shift.start_time < hours.open_time {
        return Err(ScheduleError::Validation(format!(
            "Shift starts at {} before the clinic opens at {}",
            shift.start_time, hours.open_time
        )));
    }
    if !shift.overnight && shift.end_time > hours.close_time {
        return Err(ScheduleError::Validation(format!(
            "Shift ends at {} after the clinic closes at {}",
            shift.end_time, hours.close_time
        )));
    }
    Ok(())
}

/// Rejects a shift overlapping any of the staff member's other shifts.
pub fn validate_no_overlap(shift: &Shift, others: &[Shift]) -> ScheduleResult<()> {
    let clash = others.iter().find(|other| {
        other.id != shift.id
            && other.staff_id == shift.staff_id
            && other.starts_at() < shift.ends_at()
            && shift.starts_at() < other.ends_at()
    });

    match clash {
        Some(other) => Err(ScheduleError::Validation(format!(
            "Shift overlaps shift {} on {} ({} - {})",
            other.id, other.work_date, other.start_time, other.end_time
        ))),
        None => Ok(()),
    }
}
