//! Slot generation.
//!
//! A shift is carved into 30-minute slots starting at its start time. An
//! overnight shift is carved in two passes, the first stopping at midnight
//! and the second starting from it, so the boundary slot is produced once.
//! Units overlapping the break window are skipped, and a trailing remainder
//! shorter than a slot is dropped.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::models::shift::{slot_length, Shift, Slot, SlotStatus};

pub fn generate_slots(shift: &Shift) -> Vec<Slot> {
    let start = shift.starts_at();
    let end = shift.ends_at();
    let break_window = shift.break_window();
    let mut slots = Vec::new();

    if shift.overnight {
        let midnight = shift.work_date.and_time(NaiveTime::MIN) + Duration::days(1);
        carve(shift, start, midnight.min(end), break_window, &mut slots);
        carve(shift, midnight, end, break_window, &mut slots);
    } else {
        carve(shift, start, end, break_window, &mut slots);
    }

    slots
}

fn carve(
    shift: &Shift,
    from: NaiveDateTime,
    to: NaiveDateTime,
    break_window: Option<(NaiveDateTime, NaiveDateTime)>,
    out: &mut Vec<Slot>,
) {
    let mut cursor = from;
    while cursor + slot_length() <= to {
        let slot_end = cursor + slot_length();
        let in_break = break_window
            .is_some_and(|(break_from, break_to)| cursor < break_to && break_from < slot_end);

        if !in_break {
            out.push(Slot {
                id: Uuid::new_v4(),
                shift_id: shift.id,
                staff_id: shift.staff_id,
                clinic_id: shift.clinic_id,
                slot_date: cursor.date(),
                start_time: cursor.time(),
                end_time: slot_end.time(),
                status: SlotStatus::Available,
                version: 0,
            });
        }
        cursor = slot_end;
    }
}
