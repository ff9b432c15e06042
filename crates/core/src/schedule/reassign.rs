use chrono::NaiveDateTime;
use std::collections::HashMap;
use uuid::Uuid;

use super::{
    engine::chain_for,
    plan::ReservationPlan,
    snapshot::{DaySnapshot, SlotArena},
    timeline::item_start_at,
};
use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::{
    booking::{Booking, Service},
    shift::Slot,
    staff::Staff,
};

#[derive(Debug, Clone)]
pub struct ReassignPlan {
    pub service_item_id: Uuid,
    pub starts_at: NaiveDateTime,
    /// Slots held by the item before the move.
    pub released: Vec<Slot>,
    /// The new staff member's chain, absent when none exists.
    pub chain: Option<Vec<Slot>>,
    pub slots_needed: u32,
    pub plan: ReservationPlan,
}

/// Plans moving one service item to `new_staff`.
///
/// The item's start is replayed from the booking's current ordering, its
/// reservations are released in a working copy first so the new search does
/// not trip over them, and the chain is looked up on the new staff member's
/// covering shift. Without a chain the plan still releases and clears the
/// assignment, leaving the item unassigned rather than half booked.
pub fn plan_reassignment(
    snapshot: &DaySnapshot,
    booking: &Booking,
    services: &HashMap<Uuid, Service>,
    service_item_id: Uuid,
    new_staff: &Staff,
) -> ScheduleResult<ReassignPlan> {
    let ordered = booking.ordered_items();
    let index = ordered
        .iter()
        .position(|item| item.id == service_item_id)
        .ok_or_else(|| {
            ScheduleError::NotFound(format!("Service item {} not in booking {}", service_item_id, booking.id))
        })?;

    let counts = ordered
        .iter()
        .map(|item| {
            services
                .get(&item.service_id)
                .map(Service::slots_needed)
                .ok_or_else(|| ScheduleError::NotFound(format!("Service with ID {} not found", item.service_id)))
        })
        .collect::<ScheduleResult<Vec<u32>>>()?;

    let starts_at = item_start_at(booking.starts_at(), &counts, index)
        .ok_or_else(|| ScheduleError::Validation("Service item position out of range".to_string()))?;
    let needed = counts[index];

    let mut arena = SlotArena::new(&snapshot.slots);
    let released: Vec<Slot> = snapshot
        .reservations
        .iter()
        .filter(|reservation| reservation.service_item_id == service_item_id)
        .filter_map(|reservation| arena.get(reservation.slot_id).cloned())
        .collect();
    let released_ids: Vec<Uuid> = released.iter().map(|slot| slot.id).collect();
    arena.release(&released_ids);

    let chain = chain_for(snapshot, &arena, new_staff.id, starts_at, needed as usize);

    let mut plan = ReservationPlan::new(booking.id);
    plan.release(&released);
    match &chain {
        Some(slots) => {
            plan.claim(service_item_id, slots);
            plan.assign(service_item_id, Some(new_staff.id));
        }
        None => plan.assign(service_item_id, None),
    }

    Ok(ReassignPlan {
        service_item_id,
        starts_at,
        released,
        chain,
        slots_needed: needed,
        plan,
    })
}
