use chrono::{Duration, NaiveDateTime};

use crate::models::shift::SLOT_MINUTES;

/// Start of each item in a sequence that begins at `booking_start`, where
/// item `i` occupies `slot_counts[i]` slots.
pub fn item_start_times(booking_start: NaiveDateTime, slot_counts: &[u32]) -> Vec<NaiveDateTime> {
    slot_counts
        .iter()
        .scan(booking_start, |cursor, &count| {
            let start = *cursor;
            *cursor = start + span(count);
            Some(start)
        })
        .collect()
}

/// Start of the item at `index`, or `None` past the end of the sequence.
pub fn item_start_at(booking_start: NaiveDateTime, slot_counts: &[u32], index: usize) -> Option<NaiveDateTime> {
    if index >= slot_counts.len() {
        return None;
    }
    let before: u32 = slot_counts[..index].iter().sum();
    Some(booking_start + span(before))
}

pub fn span(slot_count: u32) -> Duration {
    Duration::minutes(i64::from(slot_count) * SLOT_MINUTES)
}
