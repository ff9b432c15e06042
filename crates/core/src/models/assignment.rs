use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::specialty::Specialty;
use super::staff::StaffSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentPolicy {
    /// Commit whatever could be assigned.
    #[default]
    AllowPartial,
    /// Commit only when every item could be assigned.
    AllOrNothing,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignRequest {
    #[serde(default)]
    pub policy: AssignmentPolicy,
    /// Service item id -> staff id chosen by a manager.
    #[serde(default)]
    pub overrides: HashMap<Uuid, Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemOutcome {
    Assigned {
        staff: StaffSummary,
        slot_ids: Vec<Uuid>,
        /// The reservation existed before this call.
        already_reserved: bool,
    },
    NoStaffAvailable {
        message: String,
    },
}

impl ItemOutcome {
    pub fn is_assigned(&self) -> bool {
        matches!(self, ItemOutcome::Assigned { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAssignment {
    pub service_item_id: Uuid,
    pub service_id: Uuid,
    pub position: i32,
    pub required_specialty: Specialty,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentReport {
    pub booking_id: Uuid,
    pub policy: AssignmentPolicy,
    /// Whether reservations were written.
    pub committed: bool,
    pub items: Vec<ItemAssignment>,
}

impl AssignmentReport {
    pub fn assigned_count(&self) -> usize {
        self.items.iter().filter(|item| item.outcome.is_assigned()).count()
    }

    pub fn fully_assigned(&self) -> bool {
        self.assigned_count() == self.items.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemAvailability {
    pub service_item_id: Option<Uuid>,
    pub service_id: Uuid,
    pub service_name: String,
    pub required_specialty: Specialty,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub available: bool,
    pub suggested_staff: Option<StaffSummary>,
    pub reason: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSuggestion {
    pub specialty: Specialty,
    pub date: NaiveDate,
    pub staff: StaffSummary,
    pub first_available: NaiveTime,
    pub available_slots: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub booking_id: Option<Uuid>,
    pub clinic_id: Uuid,
    pub date: NaiveDate,
    pub all_available: bool,
    pub items: Vec<ItemAvailability>,
    pub failed_specialties: Vec<Specialty>,
    /// Total price of the items that cannot be scheduled.
    pub unavailable_total: Decimal,
    /// Total price if the unavailable items are dropped.
    pub available_total: Decimal,
    pub alternatives: Vec<AlternativeSuggestion>,
}

/// Availability question for a booking that does not exist yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftAvailabilityRequest {
    pub clinic_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSlotsRequest {
    pub clinic_id: Uuid,
    pub date: NaiveDate,
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSlotsResponse {
    pub clinic_id: Uuid,
    pub date: NaiveDate,
    pub start_times: Vec<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignRequest {
    pub staff_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReassignOutcome {
    Reassigned {
        service_item_id: Uuid,
        staff_id: Uuid,
        starts_at: NaiveDateTime,
        slot_ids: Vec<Uuid>,
    },
    /// The old reservations were released but the new staff member has no
    /// chain at the item's start; the item is left unassigned.
    NoChainAvailable {
        service_item_id: Uuid,
        staff_id: Uuid,
        starts_at: NaiveDateTime,
        released_slot_ids: Vec<Uuid>,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResponse {
    pub booking_id: Uuid,
    pub released_slot_ids: Vec<Uuid>,
}
