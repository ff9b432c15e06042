use rust_decimal::Decimal;
use uuid::Uuid;

use super::{
    engine::{StepResult, WalkStep},
    matcher::match_specialty,
    snapshot::DaySnapshot,
};
use crate::models::{
    assignment::{AlternativeSuggestion, AvailabilityReport, ItemAvailability},
    specialty::Specialty,
    staff::StaffSummary,
};

/// Turns a dry-run walk into a per-item availability report. Alternatives
/// are left empty; they need other days and are filled in by the caller.
pub fn availability_report(snapshot: &DaySnapshot, booking_id: Option<Uuid>, steps: &[WalkStep]) -> AvailabilityReport {
    let mut failed_specialties: Vec<Specialty> = Vec::new();
    let mut unavailable_total = Decimal::ZERO;
    let mut available_total = Decimal::ZERO;

    let items: Vec<ItemAvailability> = steps
        .iter()
        .map(|step| {
            let (suggested_staff, reason) = match &step.result {
                StepResult::Reserved { staff, .. } | StepResult::AlreadyReserved { staff, .. } => {
                    (Some(staff.clone()), None)
                }
                StepResult::NoStaffAvailable { message } => (None, Some(message.clone())),
            };

            if suggested_staff.is_some() {
                available_total += step.item.price;
            } else {
                unavailable_total += step.item.price;
                if !failed_specialties.contains(&step.requested) {
                    failed_specialties.push(step.requested);
                }
            }

            ItemAvailability {
                service_item_id: step.item.service_item_id,
                service_id: step.item.service.id,
                service_name: step.item.service.name.clone(),
                required_specialty: step.requested,
                starts_at: step.starts_at,
                ends_at: step.ends_at,
                available: suggested_staff.is_some(),
                suggested_staff,
                reason,
                price: step.item.price,
            }
        })
        .collect();

    AvailabilityReport {
        booking_id,
        clinic_id: snapshot.clinic_id,
        date: snapshot.date,
        all_available: failed_specialties.is_empty(),
        items,
        failed_specialties,
        unavailable_total,
        available_total,
        alternatives: Vec::new(),
    }
}

/// Staff qualified for `specialty` with at least one free slot starting on
/// the snapshot date, earliest first.
pub fn alternatives_for_day(snapshot: &DaySnapshot, specialty: Specialty) -> Vec<AlternativeSuggestion> {
    let matched = match_specialty(&snapshot.roster, specialty);

    let mut suggestions: Vec<AlternativeSuggestion> = matched
        .staff
        .into_iter()
        .filter_map(|staff| {
            let mut free: Vec<_> = snapshot
                .slots
                .iter()
                .filter(|slot| {
                    slot.staff_id == staff.id
                        && slot.clinic_id == snapshot.clinic_id
                        && slot.slot_date == snapshot.date
                        && slot.is_available()
                })
                .map(|slot| slot.start_time)
                .collect();
            free.sort();

            free.first().map(|first| AlternativeSuggestion {
                specialty,
                date: snapshot.date,
                staff: StaffSummary::from(staff),
                first_available: *first,
                available_slots: free.len(),
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        a.first_available
            .cmp(&b.first_available)
            .then_with(|| a.staff.full_name.cmp(&b.staff.full_name))
    });
    suggestions
}
