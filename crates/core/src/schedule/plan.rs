use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::engine::{StepResult, WalkStep};
use crate::models::{booking::BookingStatus, shift::Slot};

/// Slot to flip from AVAILABLE to BOOKED for a service item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotClaim {
    pub slot_id: Uuid,
    pub expected_version: i64,
    pub service_item_id: Uuid,
}

/// Slot to flip from BOOKED back to AVAILABLE, dropping its reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRelease {
    pub slot_id: Uuid,
    pub expected_version: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffUpdate {
    pub service_item_id: Uuid,
    pub staff_id: Option<Uuid>,
}

/// A set of slot transitions committed as one transaction.
///
/// Releases are applied before claims, and every transition must find the
/// slot at its expected version and status or the whole plan is rejected
/// with a conflict. The booking must still be active at commit time. A plan
/// that moves the booking to an inactive status must leave it holding no
/// reservations, otherwise it is rejected with a conflict and re-planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationPlan {
    pub booking_id: Uuid,
    pub releases: Vec<SlotRelease>,
    pub claims: Vec<SlotClaim>,
    pub staff_updates: Vec<StaffUpdate>,
    /// Booking status written in the same transaction.
    pub status_change: Option<BookingStatus>,
}

impl ReservationPlan {
    pub fn new(booking_id: Uuid) -> Self {
        Self {
            booking_id,
            releases: Vec::new(),
            claims: Vec::new(),
            staff_updates: Vec::new(),
            status_change: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
            && self.claims.is_empty()
            && self.staff_updates.is_empty()
            && self.status_change.is_none()
    }

    pub fn release(&mut self, slots: &[Slot]) {
        self.releases.extend(slots.iter().map(|slot| SlotRelease {
            slot_id: slot.id,
            expected_version: slot.version,
        }));
    }

    pub fn claim(&mut self, service_item_id: Uuid, slots: &[Slot]) {
        self.claims.extend(slots.iter().map(|slot| SlotClaim {
            slot_id: slot.id,
            expected_version: slot.version,
            service_item_id,
        }));
    }

    pub fn assign(&mut self, service_item_id: Uuid, staff_id: Option<Uuid>) {
        self.staff_updates.push(StaffUpdate { service_item_id, staff_id });
    }

    pub fn set_status(&mut self, status: BookingStatus) {
        self.status_change = Some(status);
    }

    /// Claims for every step the walk reserved. Steps without a persisted
    /// item are skipped.
    pub fn from_steps(booking_id: Uuid, steps: &[WalkStep]) -> Self {
        let mut plan = ReservationPlan::new(booking_id);
        for step in steps {
            if let (Some(item_id), StepResult::Reserved { staff, slots }) = (step.item.service_item_id, &step.result) {
                plan.claim(item_id, slots);
                plan.assign(item_id, Some(staff.id));
            }
        }
        plan
    }
}
