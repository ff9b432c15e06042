use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::{
    booking::Reservation,
    shift::{Shift, Slot, SlotStatus},
    staff::Staff,
};

/// Everything the engine reads to schedule one clinic on one date.
///
/// `shifts` covers the work date and the day before it, so the tail of an
/// overnight shift that started yesterday is visible. `staff_bookings` maps
/// staff ids to the active bookings on `date` they are assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub clinic_id: Uuid,
    pub date: NaiveDate,
    pub roster: Vec<Staff>,
    pub shifts: Vec<Shift>,
    pub slots: Vec<Slot>,
    pub reservations: Vec<Reservation>,
    pub staff_bookings: HashMap<Uuid, HashSet<Uuid>>,
}

impl DaySnapshot {
    pub fn new(clinic_id: Uuid, date: NaiveDate) -> Self {
        Self {
            clinic_id,
            date,
            roster: Vec::new(),
            shifts: Vec::new(),
            slots: Vec::new(),
            reservations: Vec::new(),
            staff_bookings: HashMap::new(),
        }
    }

    pub fn staff(&self, staff_id: Uuid) -> Option<&Staff> {
        self.roster.iter().find(|staff| staff.id == staff_id)
    }

    /// The staff member's shift at this clinic that covers `at`.
    pub fn shift_covering(&self, staff_id: Uuid, at: NaiveDateTime) -> Option<&Shift> {
        self.shifts
            .iter()
            .find(|shift| shift.staff_id == staff_id && shift.clinic_id == self.clinic_id && shift.covers(at))
    }

    pub fn staff_shifts(&self, staff_id: Uuid) -> impl Iterator<Item = &Shift> {
        self.shifts
            .iter()
            .filter(move |shift| shift.staff_id == staff_id && shift.clinic_id == self.clinic_id)
    }

    /// Number of active bookings on the date held by `staff_id`, not counting
    /// `exclude`.
    pub fn load_of(&self, staff_id: Uuid, exclude: Option<Uuid>) -> usize {
        self.staff_bookings
            .get(&staff_id)
            .map(|bookings| {
                bookings
                    .iter()
                    .filter(|booking_id| Some(**booking_id) != exclude)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Reserved slot ids per service item.
    pub fn reservations_by_item(&self) -> HashMap<Uuid, Vec<Uuid>> {
        let mut by_item: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for reservation in &self.reservations {
            by_item
                .entry(reservation.service_item_id)
                .or_default()
                .push(reservation.slot_id);
        }
        by_item
    }
}

/// Working copy of the snapshot's slots, keyed by id and indexed per shift
/// in start order. Status changes bump `version` the same way the stores do,
/// so a plan built against the arena carries the versions the commit will
/// see.
#[derive(Debug, Clone, Default)]
pub struct SlotArena {
    slots: HashMap<Uuid, Slot>,
    by_shift: HashMap<Uuid, Vec<Uuid>>,
}

impl SlotArena {
    pub fn new(slots: &[Slot]) -> Self {
        let mut ordered: Vec<&Slot> = slots.iter().collect();
        ordered.sort_by_key(|slot| slot.starts_at());

        let mut arena = SlotArena::default();
        for slot in ordered {
            arena.by_shift.entry(slot.shift_id).or_default().push(slot.id);
            arena.slots.insert(slot.id, slot.clone());
        }
        arena
    }

    pub fn get(&self, slot_id: Uuid) -> Option<&Slot> {
        self.slots.get(&slot_id)
    }

    /// The shift's slots in start order, whatever their status.
    pub fn shift_slots(&self, shift_id: Uuid) -> Vec<&Slot> {
        self.by_shift
            .get(&shift_id)
            .map(|ids| ids.iter().filter_map(|id| self.slots.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn reserve(&mut self, slot_ids: &[Uuid]) {
        self.transition(slot_ids, SlotStatus::Available, SlotStatus::Booked);
    }

    pub fn release(&mut self, slot_ids: &[Uuid]) {
        self.transition(slot_ids, SlotStatus::Booked, SlotStatus::Available);
    }

    fn transition(&mut self, slot_ids: &[Uuid], from: SlotStatus, to: SlotStatus) {
        for id in slot_ids {
            if let Some(slot) = self.slots.get_mut(id) {
                if slot.status == from {
                    slot.status = to;
                    slot.version += 1;
                }
            }
        }
    }
}
