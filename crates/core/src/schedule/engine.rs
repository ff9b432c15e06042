//! The sequential assignment walk shared by confirmation and dry runs.
//!
//! Items are visited in schedule order with a cursor starting at the booking
//! start. Each item is matched against the roster by specialty, candidates
//! are narrowed to those on shift at the cursor with a full chain of free
//! slots there, and the least loaded one wins. The cursor moves past the item
//! whether or not it was placed.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::{
    matcher::match_specialty,
    search::find_consecutive,
    snapshot::{DaySnapshot, SlotArena},
    timeline::span,
};
use crate::models::{
    booking::{Booking, Service},
    shift::Slot,
    specialty::Specialty,
    staff::{Staff, StaffSummary},
};

/// One entry of the sequence handed to the walk.
#[derive(Debug, Clone)]
pub struct WalkItem {
    /// `None` for drafts that have no persisted item yet.
    pub service_item_id: Option<Uuid>,
    pub position: i32,
    pub service: Service,
    pub price: Decimal,
    /// Staff member picked by a manager, bypassing the specialty search.
    pub manual_staff: Option<Uuid>,
}

impl WalkItem {
    /// Items of a persisted booking in schedule order. Fails with the id of
    /// the first service missing from `services`.
    pub fn from_booking(booking: &Booking, services: &HashMap<Uuid, Service>) -> Result<Vec<WalkItem>, Uuid> {
        booking
            .ordered_items()
            .into_iter()
            .map(|item| {
                let service = services.get(&item.service_id).ok_or(item.service_id)?;
                Ok(WalkItem {
                    service_item_id: Some(item.id),
                    position: item.position,
                    service: service.clone(),
                    price: item.price,
                    manual_staff: None,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum StepResult {
    /// A chain was found and reserved in the working arena. The slots are
    /// cloned before the reservation so they carry the versions to commit
    /// against.
    Reserved { staff: StaffSummary, slots: Vec<Slot> },
    /// The item already held reservations when the walk started.
    AlreadyReserved { staff: StaffSummary, slot_ids: Vec<Uuid> },
    NoStaffAvailable { message: String },
}

#[derive(Debug, Clone)]
pub struct WalkStep {
    pub item: WalkItem,
    pub requested: Specialty,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub result: StepResult,
}

impl WalkStep {
    pub fn is_placed(&self) -> bool {
        !matches!(self.result, StepResult::NoStaffAvailable { .. })
    }
}

/// Runs the walk over `items` starting at `start`.
///
/// `booking_id` is excluded from load counts. Nothing outside the returned
/// steps is modified; the caller decides whether to commit them.
pub fn walk(
    snapshot: &DaySnapshot,
    booking_id: Option<Uuid>,
    start: NaiveDateTime,
    items: &[WalkItem],
) -> Vec<WalkStep> {
    let mut arena = SlotArena::new(&snapshot.slots);
    let existing = snapshot.reservations_by_item();
    let mut preferred: HashMap<Specialty, Uuid> = HashMap::new();
    let mut cursor = start;
    let mut steps = Vec::with_capacity(items.len());

    for item in items {
        let needed = item.service.slots_needed();
        let requested = item.service.required_specialty();
        let starts_at = cursor;
        let ends_at = cursor + span(needed);

        let result = match item.service_item_id.and_then(|id| existing.get(&id)) {
            Some(slot_ids) => already_reserved(snapshot, &arena, slot_ids),
            None => place(snapshot, &mut arena, &mut preferred, booking_id, item, requested, starts_at, needed as usize),
        };

        debug!(
            "Walk step {} ({}) at {}: {:?}",
            item.position, item.service.name, starts_at, result
        );

        steps.push(WalkStep {
            item: item.clone(),
            requested,
            starts_at,
            ends_at,
            result,
        });
        cursor = ends_at;
    }

    steps
}

fn already_reserved(snapshot: &DaySnapshot, arena: &SlotArena, slot_ids: &[Uuid]) -> StepResult {
    let staff = slot_ids
        .first()
        .and_then(|id| arena.get(*id))
        .and_then(|slot| snapshot.staff(slot.staff_id));

    match staff {
        Some(staff) => {
            let mut slot_ids = slot_ids.to_vec();
            slot_ids.sort_by_key(|id| arena.get(*id).map(|slot| slot.starts_at()));
            StepResult::AlreadyReserved {
                staff: StaffSummary::from(staff),
                slot_ids,
            }
        }
        None => StepResult::NoStaffAvailable {
            message: "Reserved staff member is no longer on the clinic roster".to_string(),
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn place(
    snapshot: &DaySnapshot,
    arena: &mut SlotArena,
    preferred: &mut HashMap<Specialty, Uuid>,
    booking_id: Option<Uuid>,
    item: &WalkItem,
    requested: Specialty,
    at: NaiveDateTime,
    needed: usize,
) -> StepResult {
    let candidates: Vec<&Staff> = match item.manual_staff {
        Some(staff_id) => match snapshot.staff(staff_id).filter(|staff| staff.active) {
            Some(staff) => vec![staff],
            None => {
                return StepResult::NoStaffAvailable {
                    message: format!("Staff {} is not an active member of this clinic", staff_id),
                };
            }
        },
        None => {
            let matched = match_specialty(&snapshot.roster, requested);
            if matched.used_fallback() && !matched.is_empty() {
                debug!("No {} staff, falling back to {}", requested, matched.resolved);
            }
            matched.staff
        }
    };

    if candidates.is_empty() {
        return StepResult::NoStaffAvailable {
            message: format!("No qualified {} staff at this clinic", requested),
        };
    }

    // Staff already chosen for this specialty earlier in the walk go first.
    if item.manual_staff.is_none() {
        if let Some(staff) = preferred
            .get(&requested)
            .and_then(|id| candidates.iter().find(|staff| staff.id == *id))
        {
            if let Some(chain) = chain_for(snapshot, arena, staff.id, at, needed) {
                return reserve(arena, staff, chain);
            }
        }
    }

    let on_shift: Vec<&Staff> = candidates
        .iter()
        .copied()
        .filter(|staff| snapshot.shift_covering(staff.id, at).is_some())
        .collect();

    if on_shift.is_empty() {
        return StepResult::NoStaffAvailable {
            message: format!("No qualified {} staff on shift at {}", requested, at.time()),
        };
    }

    let chosen = on_shift
        .into_iter()
        .filter_map(|staff| chain_for(snapshot, arena, staff.id, at, needed).map(|chain| (staff, chain)))
        .min_by_key(|(staff, _)| (snapshot.load_of(staff.id, booking_id), staff.id));

    match chosen {
        Some((staff, chain)) => {
            if item.manual_staff.is_none() {
                preferred.insert(requested, staff.id);
            }
            reserve(arena, staff, chain)
        }
        None => StepResult::NoStaffAvailable {
            message: format!(
                "Qualified {} staff are on shift but none has {} consecutive free slot(s) from {}",
                requested,
                needed,
                at.time()
            ),
        },
    }
}

/// The chain of `needed` free slots at `at` on the staff member's covering
/// shift, cloned out of the arena.
pub(crate) fn chain_for(
    snapshot: &DaySnapshot,
    arena: &SlotArena,
    staff_id: Uuid,
    at: NaiveDateTime,
    needed: usize,
) -> Option<Vec<Slot>> {
    let shift = snapshot.shift_covering(staff_id, at)?;
    find_consecutive(arena.shift_slots(shift.id), at, needed)
        .map(|chain| chain.into_iter().cloned().collect())
}

fn reserve(arena: &mut SlotArena, staff: &Staff, chain: Vec<Slot>) -> StepResult {
    let ids: Vec<Uuid> = chain.iter().map(|slot| slot.id).collect();
    arena.reserve(&ids);
    StepResult::Reserved {
        staff: StaffSummary::from(staff),
        slots: chain,
    }
}
