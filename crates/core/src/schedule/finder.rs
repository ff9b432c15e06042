//! Smart availability: every start time in the daily window at which a whole
//! sequence of services could be fulfilled.
//!
//! This reasons over shift coverage and existing reservations rather than
//! chains of slot rows, so it is cheaper than a walk per candidate and may
//! accept a start that a confirmation later rejects (a blocked slot, say).

use chrono::{NaiveDateTime, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use super::{
    matcher::{match_specialty, SpecialtyMatch},
    snapshot::DaySnapshot,
    timeline::{item_start_times, span},
};
use crate::config::SchedulingConfig;
use crate::models::{booking::Service, shift::{slot_length, SlotStatus}};

pub fn find_start_times(snapshot: &DaySnapshot, services: &[Service], config: &SchedulingConfig) -> Vec<NaiveTime> {
    if services.is_empty() || config.window_end <= config.window_start {
        return Vec::new();
    }

    let matches: Vec<SpecialtyMatch<'_>> = services
        .iter()
        .map(|service| match_specialty(&snapshot.roster, service.required_specialty()))
        .collect();

    if let Some(missing) = matches.iter().find(|matched| matched.is_empty()) {
        debug!("No {} staff at clinic {}, no start times", missing.requested, snapshot.clinic_id);
        return Vec::new();
    }

    let counts: Vec<u32> = services.iter().map(Service::slots_needed).collect();
    let window_end = snapshot.date.and_time(config.window_end);
    let mut candidate = snapshot.date.and_time(config.window_start);
    let mut start_times = Vec::new();

    while candidate < window_end {
        let starts = item_start_times(candidate, &counts);
        let fits = starts.iter().zip(&counts).zip(&matches).all(|((start, count), matched)| {
            let end = *start + span(*count);
            matched.staff.iter().any(|staff| is_free(snapshot, staff.id, *start, end))
        });

        if fits {
            start_times.push(candidate.time());
        }
        candidate += slot_length();
    }

    start_times
}

/// On shift for the whole window, outside the break, with nothing booked in it.
fn is_free(snapshot: &DaySnapshot, staff_id: Uuid, from: NaiveDateTime, to: NaiveDateTime) -> bool {
    let on_shift = snapshot
        .staff_shifts(staff_id)
        .any(|shift| shift.covers_window(from, to));

    on_shift
        && !snapshot.slots.iter().any(|slot| {
            slot.staff_id == staff_id && slot.status == SlotStatus::Booked && slot.overlaps(from, to)
        })
}
