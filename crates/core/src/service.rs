//! The scheduling operations exposed to callers.
//!
//! Each mutating operation reads a fresh snapshot, plans against it and
//! commits the plan through the store. A commit rejected because another
//! transaction touched the same slots is re-planned from scratch, up to
//! `max_commit_attempts` times.

use chrono::{Datelike, Duration, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SchedulingConfig;
use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::{
    assignment::{
        AlternativeSuggestion, AssignRequest, AssignmentPolicy, AssignmentReport, AvailabilityReport,
        DraftAvailabilityRequest,
        GlobalSlotsRequest, GlobalSlotsResponse, ItemAssignment, ItemOutcome, ReassignOutcome, ReleaseResponse,
    },
    booking::{Booking, BookingStatus, Service},
    shift::{
        CreateShiftBatchRequest, CreateShiftBatchResponse, CreateShiftRequest, Shift, ShiftWithSlots, SkippedShift,
        Slot, SlotStatus,
    },
    specialty::Specialty,
    staff::Staff,
};
use crate::schedule::{
    availability::{alternatives_for_day, availability_report},
    engine::{walk, StepResult, WalkItem, WalkStep},
    finder::find_start_times,
    generator::generate_slots,
    plan::ReservationPlan,
    reassign::plan_reassignment,
    rules,
    snapshot::DaySnapshot,
};
use crate::store::SchedulingStore;

/// Longest repetition accepted by batch shift creation.
const MAX_REPEAT_WEEKS: u32 = 52;

#[derive(Clone)]
pub struct Scheduler {
    store: Arc<dyn SchedulingStore>,
    config: SchedulingConfig,
}

impl Scheduler {
    pub fn new(store: Arc<dyn SchedulingStore>, config: SchedulingConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    // Shifts

    /// Validates a shift, generates its slots and persists both.
    pub async fn generate_shift(&self, request: CreateShiftRequest) -> ScheduleResult<ShiftWithSlots> {
        let staff = self.require_staff(request.staff_id).await?;
        if staff.clinic_id != request.clinic_id {
            return Err(ScheduleError::Validation(format!(
                "Staff {} does not work at clinic {}",
                staff.id, request.clinic_id
            )));
        }

        let shift = Shift {
            id: Uuid::new_v4(),
            staff_id: request.staff_id,
            clinic_id: request.clinic_id,
            work_date: request.work_date,
            start_time: request.start_time,
            end_time: request.end_time,
            break_start: request.break_start,
            break_end: request.break_end,
            overnight: request.overnight,
            notes: request.notes,
            created_at: Utc::now(),
        };

        rules::validate_shift_times(&shift)?;

        let day_of_week = shift.work_date.weekday().num_days_from_monday() as i16;
        let hours = self.store.operating_hours(shift.clinic_id, day_of_week).await?;
        rules::validate_operating_hours(&shift, hours.as_ref())?;

        let existing = self
            .store
            .find_shift(shift.staff_id, shift.clinic_id, shift.work_date)
            .await?;
        if let Some(existing) = &existing {
            if !request.force {
                return Err(ScheduleError::Consistency(format!(
                    "Staff {} already has shift {} at this clinic on {}",
                    shift.staff_id, existing.id, shift.work_date
                )));
            }
        }
        let replaces = existing.map(|existing| existing.id);

        let neighbours: Vec<Shift> = self
            .store
            .staff_shifts_between(shift.staff_id, shift.work_date - Duration::days(1), shift.work_date + Duration::days(1))
            .await?
            .into_iter()
            .filter(|other| Some(other.id) != replaces)
            .collect();
        rules::validate_no_overlap(&shift, &neighbours)?;

        let slots = generate_slots(&shift);
        if slots.is_empty() {
            return Err(ScheduleError::Validation(
                "Shift does not leave room for a single slot".to_string(),
            ));
        }

        self.store.save_shift(shift.clone(), slots.clone(), replaces).await?;
        info!(
            "Created shift {} for staff {} on {} with {} slots{}",
            shift.id,
            shift.staff_id,
            shift.work_date,
            slots.len(),
            if replaces.is_some() { " (replaced existing)" } else { "" }
        );

        Ok(ShiftWithSlots { shift, slots })
    }

    /// Creates the same shift on every selected date of a range, repeated
    /// over consecutive weeks. Dates failing validation are reported as
    /// skipped; store failures abort the batch.
    pub async fn generate_shift_batch(&self, request: CreateShiftBatchRequest) -> ScheduleResult<CreateShiftBatchResponse> {
        if request.to_date < request.from_date {
            return Err(ScheduleError::Validation(
                "Batch end date must not be before its start date".to_string(),
            ));
        }
        if request.repeat_weeks == 0 || request.repeat_weeks > MAX_REPEAT_WEEKS {
            return Err(ScheduleError::Validation(format!(
                "Repeat weeks must be between 1 and {}",
                MAX_REPEAT_WEEKS
            )));
        }
        if let Some(weekdays) = &request.weekdays {
            if weekdays.iter().any(|day| !(0..=6).contains(day)) {
                return Err(ScheduleError::Validation(
                    "Weekdays must be between 0 (Monday) and 6 (Sunday)".to_string(),
                ));
            }
        }
        self.require_staff(request.staff_id).await?;

        let mut dates = BTreeSet::new();
        for week in 0..request.repeat_weeks {
            let offset = Duration::weeks(i64::from(week));
            for date in request.from_date.iter_days().take_while(|date| *date <= request.to_date) {
                let day = date.weekday().num_days_from_monday() as i16;
                if request.weekdays.as_ref().is_none_or(|weekdays| weekdays.contains(&day)) {
                    dates.insert(date + offset);
                }
            }
        }

        let mut created = Vec::new();
        let mut skipped = Vec::new();
        for work_date in dates {
            let single = CreateShiftRequest {
                staff_id: request.staff_id,
                clinic_id: request.clinic_id,
                work_date,
                start_time: request.start_time,
                end_time: request.end_time,
                break_start: request.break_start,
                break_end: request.break_end,
                overnight: request.overnight,
                notes: request.notes.clone(),
                force: request.force,
            };

            match self.generate_shift(single).await {
                Ok(shift) => created.push(shift),
                Err(ScheduleError::Validation(reason)) | Err(ScheduleError::Consistency(reason)) => {
                    debug!("Skipping shift on {}: {}", work_date, reason);
                    skipped.push(SkippedShift { work_date, reason });
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            "Batch for staff {}: {} shifts created, {} skipped",
            request.staff_id,
            created.len(),
            skipped.len()
        );
        Ok(CreateShiftBatchResponse { created, skipped })
    }

    pub async fn delete_shift(&self, shift_id: Uuid) -> ScheduleResult<()> {
        self.require_shift(shift_id).await?;
        self.store.delete_shift(shift_id).await?;
        info!("Deleted shift {}", shift_id);
        Ok(())
    }

    pub async fn shift_slots(&self, shift_id: Uuid) -> ScheduleResult<Vec<Slot>> {
        self.require_shift(shift_id).await?;
        self.store.shift_slots(shift_id).await
    }

    // Slots

    pub async fn block_slot(&self, slot_id: Uuid) -> ScheduleResult<Slot> {
        let slot = self.require_slot(slot_id).await?;
        match slot.status {
            SlotStatus::Available => {}
            SlotStatus::Booked => {
                return Err(ScheduleError::Consistency(format!(
                    "Slot {} is booked and cannot be blocked",
                    slot_id
                )));
            }
            SlotStatus::Blocked => {
                return Err(ScheduleError::Consistency(format!("Slot {} is already blocked", slot_id)));
            }
        }

        let slot = self
            .store
            .transition_slot(slot_id, slot.version, SlotStatus::Available, SlotStatus::Blocked)
            .await?;
        info!("Blocked slot {}", slot_id);
        Ok(slot)
    }

    pub async fn unblock_slot(&self, slot_id: Uuid) -> ScheduleResult<Slot> {
        let slot = self.require_slot(slot_id).await?;
        if slot.status != SlotStatus::Blocked {
            return Err(ScheduleError::Consistency(format!(
                "Slot {} is {} and cannot be unblocked",
                slot_id, slot.status
            )));
        }

        let slot = self
            .store
            .transition_slot(slot_id, slot.version, SlotStatus::Blocked, SlotStatus::Available)
            .await?;
        info!("Unblocked slot {}", slot_id);
        Ok(slot)
    }

    // Bookings

    /// Assigns staff to every item of a booking and reserves their slots.
    ///
    /// Unavailability is reported per item, never as an error.
    pub async fn assign_all(&self, booking_id: Uuid, request: AssignRequest) -> ScheduleResult<AssignmentReport> {
        let mut attempt = 1;
        loop {
            let booking = self.require_open_booking(booking_id).await?;
            for item_id in request.overrides.keys() {
                if !booking.items.iter().any(|item| item.id == *item_id) {
                    return Err(ScheduleError::Validation(format!(
                        "Service item {} does not belong to booking {}",
                        item_id, booking_id
                    )));
                }
            }

            let services = self.services_for(&booking).await?;
            let mut items = walk_items(&booking, &services)?;
            for item in &mut items {
                item.manual_staff = item.service_item_id.and_then(|id| request.overrides.get(&id).copied());
            }

            let snapshot = self.store.load_day(booking.clinic_id, booking.booking_date).await?;
            for (item_id, staff_id) in &request.overrides {
                if let Some(holder) = reserved_staff(&snapshot, *item_id) {
                    if holder != *staff_id {
                        return Err(ScheduleError::Validation(format!(
                            "Service item {} is already reserved with staff {}; reassign it instead",
                            item_id, holder
                        )));
                    }
                }
            }

            let steps = walk(&snapshot, Some(booking.id), booking.starts_at(), &items);
            let every_item_placed = steps.iter().all(WalkStep::is_placed);

            let plan = ReservationPlan::from_steps(booking.id, &steps);
            let should_commit = !plan.is_empty()
                && (request.policy == AssignmentPolicy::AllowPartial || every_item_placed);

            if should_commit {
                match self.store.commit(plan).await {
                    Ok(reservations) => {
                        info!(
                            "Booking {}: reserved {} slots (attempt {})",
                            booking.id,
                            reservations.len(),
                            attempt
                        );
                    }
                    Err(err) if err.is_retryable() && attempt < self.commit_attempts() => {
                        warn!("Booking {}: {} - retrying assignment", booking.id, err);
                        attempt += 1;
                        continue;
                    }
                    Err(err) => return Err(err),
                }
            }

            return Ok(AssignmentReport {
                booking_id: booking.id,
                policy: request.policy,
                committed: should_commit,
                items: item_assignments(&steps),
            });
        }
    }

    /// Dry run of [`Scheduler::assign_all`] with alternatives for what fails.
    pub async fn check_availability(&self, booking_id: Uuid) -> ScheduleResult<AvailabilityReport> {
        let booking = self
            .store
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {} not found", booking_id)))?;

        let services = self.services_for(&booking).await?;
        let items = walk_items(&booking, &services)?;
        let snapshot = self.store.load_day(booking.clinic_id, booking.booking_date).await?;
        let steps = walk(&snapshot, Some(booking.id), booking.starts_at(), &items);

        let mut report = availability_report(&snapshot, Some(booking.id), &steps);
        report.alternatives = self.alternatives(snapshot, &report.failed_specialties).await?;
        Ok(report)
    }

    /// Availability for a booking that has not been created yet.
    pub async fn check_draft_availability(&self, request: DraftAvailabilityRequest) -> ScheduleResult<AvailabilityReport> {
        let services = self.ordered_services(request.clinic_id, &request.service_ids).await?;
        let items: Vec<WalkItem> = services
            .into_iter()
            .enumerate()
            .map(|(position, service)| WalkItem {
                service_item_id: None,
                position: position as i32,
                price: service.price,
                service,
                manual_staff: None,
            })
            .collect();

        let snapshot = self.store.load_day(request.clinic_id, request.date).await?;
        let steps = walk(&snapshot, None, request.date.and_time(request.start_time), &items);

        let mut report = availability_report(&snapshot, None, &steps);
        report.alternatives = self.alternatives(snapshot, &report.failed_specialties).await?;
        Ok(report)
    }

    pub async fn find_global_slots(&self, request: GlobalSlotsRequest) -> ScheduleResult<GlobalSlotsResponse> {
        let services = self.ordered_services(request.clinic_id, &request.service_ids).await?;
        let snapshot = self.store.load_day(request.clinic_id, request.date).await?;
        let start_times = find_start_times(&snapshot, &services, &self.config);
        debug!(
            "Clinic {} on {}: {} feasible start times for {} services",
            request.clinic_id,
            request.date,
            start_times.len(),
            services.len()
        );

        Ok(GlobalSlotsResponse {
            clinic_id: request.clinic_id,
            date: request.date,
            start_times,
        })
    }

    /// Moves one service item to another staff member.
    ///
    /// The old reservations are always released. When the new staff member
    /// has no chain at the item's start the item is left unassigned and the
    /// outcome says so.
    pub async fn reassign(&self, service_item_id: Uuid, staff_id: Uuid) -> ScheduleResult<ReassignOutcome> {
        let mut attempt = 1;
        loop {
            let booking = self
                .store
                .get_booking_for_item(service_item_id)
                .await?
                .ok_or_else(|| ScheduleError::NotFound(format!("Service item with ID {} not found", service_item_id)))?;
            ensure_open(&booking)?;

            let staff = self.require_staff(staff_id).await?;
            if staff.clinic_id != booking.clinic_id || !staff.active {
                return Err(ScheduleError::Validation(format!(
                    "Staff {} is not an active member of clinic {}",
                    staff_id, booking.clinic_id
                )));
            }

            let services = self.services_for(&booking).await?;
            let snapshot = self.store.load_day(booking.clinic_id, booking.booking_date).await?;
            let planned = plan_reassignment(&snapshot, &booking, &services, service_item_id, &staff)?;

            match self.store.commit(planned.plan.clone()).await {
                Ok(_) => {}
                Err(err) if err.is_retryable() && attempt < self.commit_attempts() => {
                    warn!("Service item {}: {} - retrying reassignment", service_item_id, err);
                    attempt += 1;
                    continue;
                }
                Err(err) => return Err(err),
            }

            let released_slot_ids: Vec<Uuid> = planned.released.iter().map(|slot| slot.id).collect();
            return Ok(match planned.chain {
                Some(chain) => {
                    info!(
                        "Reassigned service item {} to staff {} at {}",
                        service_item_id, staff_id, planned.starts_at
                    );
                    ReassignOutcome::Reassigned {
                        service_item_id,
                        staff_id,
                        starts_at: planned.starts_at,
                        slot_ids: chain.iter().map(|slot| slot.id).collect(),
                    }
                }
                None => {
                    warn!(
                        "Service item {} released; staff {} has no chain at {}",
                        service_item_id, staff_id, planned.starts_at
                    );
                    ReassignOutcome::NoChainAvailable {
                        service_item_id,
                        staff_id,
                        starts_at: planned.starts_at,
                        released_slot_ids,
                        message: format!(
                            "{} has no {} consecutive free slot(s) from {}",
                            staff.full_name,
                            planned.slots_needed,
                            planned.starts_at.time()
                        ),
                    }
                }
            });
        }
    }

    /// Frees every slot held by a booking and clears its assignments.
    pub async fn release(&self, booking_id: Uuid) -> ScheduleResult<ReleaseResponse> {
        self.release_with_status(booking_id, None).await
    }

    /// Releases a booking and marks it cancelled in the same commit.
    pub async fn cancel_booking(&self, booking_id: Uuid) -> ScheduleResult<ReleaseResponse> {
        let released = self.release_with_status(booking_id, Some(BookingStatus::Cancelled)).await?;
        info!("Cancelled booking {}", booking_id);
        Ok(released)
    }

    async fn release_with_status(
        &self,
        booking_id: Uuid,
        status_change: Option<BookingStatus>,
    ) -> ScheduleResult<ReleaseResponse> {
        let mut attempt = 1;
        loop {
            let booking = match status_change {
                Some(_) => self.require_open_booking(booking_id).await?,
                None => self
                    .store
                    .get_booking(booking_id)
                    .await?
                    .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {} not found", booking_id)))?,
            };

            let snapshot = self.store.load_day(booking.clinic_id, booking.booking_date).await?;
            let held: Vec<Slot> = snapshot
                .reservations
                .iter()
                .filter(|reservation| reservation.booking_id == booking.id)
                .filter_map(|reservation| snapshot.slots.iter().find(|slot| slot.id == reservation.slot_id))
                .cloned()
                .collect();

            let mut plan = ReservationPlan::new(booking.id);
            plan.release(&held);
            for item in &booking.items {
                if item.assigned_staff_id.is_some() {
                    plan.assign(item.id, None);
                }
            }
            if let Some(status) = status_change {
                plan.set_status(status);
            }

            if !plan.is_empty() {
                match self.store.commit(plan).await {
                    Ok(_) => {}
                    Err(err) if err.is_retryable() && attempt < self.commit_attempts() => {
                        warn!("Booking {}: {} - retrying release", booking_id, err);
                        attempt += 1;
                        continue;
                    }
                    Err(err) => return Err(err),
                }
            }

            info!(
                "Released {} slots of booking {} ({} items)",
                held.len(),
                booking_id,
                booking.items.len()
            );
            return Ok(ReleaseResponse {
                booking_id,
                released_slot_ids: held.iter().map(|slot| slot.id).collect(),
            });
        }
    }

    // Helpers

    fn commit_attempts(&self) -> u32 {
        self.config.max_commit_attempts.max(1)
    }

    async fn alternatives(
        &self,
        first_day: DaySnapshot,
        failed: &[Specialty],
    ) -> ScheduleResult<Vec<AlternativeSuggestion>> {
        if failed.is_empty() {
            return Ok(Vec::new());
        }

        let (clinic_id, date) = (first_day.clinic_id, first_day.date);
        let mut days = vec![first_day];
        for offset in 1..i64::from(self.config.alternative_days) {
            days.push(self.store.load_day(clinic_id, date + Duration::days(offset)).await?);
        }

        let mut alternatives = Vec::new();
        for specialty in failed {
            let found = days
                .iter()
                .flat_map(|day| alternatives_for_day(day, *specialty))
                .take(self.config.max_alternatives);
            alternatives.extend(found);
        }
        Ok(alternatives)
    }

    async fn require_staff(&self, staff_id: Uuid) -> ScheduleResult<Staff> {
        self.store
            .get_staff(staff_id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Staff with ID {} not found", staff_id)))
    }

    async fn require_shift(&self, shift_id: Uuid) -> ScheduleResult<Shift> {
        self.store
            .get_shift(shift_id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Shift with ID {} not found", shift_id)))
    }

    async fn require_slot(&self, slot_id: Uuid) -> ScheduleResult<Slot> {
        self.store
            .get_slot(slot_id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Slot with ID {} not found", slot_id)))
    }

    async fn require_open_booking(&self, booking_id: Uuid) -> ScheduleResult<Booking> {
        let booking = self
            .store
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {} not found", booking_id)))?;
        ensure_open(&booking)?;
        Ok(booking)
    }

    async fn services_for(&self, booking: &Booking) -> ScheduleResult<HashMap<Uuid, Service>> {
        let ids: Vec<Uuid> = booking.items.iter().map(|item| item.service_id).collect();
        let services = self.store.get_services(ids).await?;
        Ok(services.into_iter().map(|service| (service.id, service)).collect())
    }

    /// Services in request order, duplicates kept, all offered by `clinic_id`.
    async fn ordered_services(&self, clinic_id: Uuid, service_ids: &[Uuid]) -> ScheduleResult<Vec<Service>> {
        if service_ids.is_empty() {
            return Err(ScheduleError::Validation(
                "At least one service must be requested".to_string(),
            ));
        }

        let known: HashMap<Uuid, Service> = self
            .store
            .get_services(service_ids.to_vec())
            .await?
            .into_iter()
            .map(|service| (service.id, service))
            .collect();

        service_ids
            .iter()
            .map(|id| {
                let service = known
                    .get(id)
                    .ok_or_else(|| ScheduleError::NotFound(format!("Service with ID {} not found", id)))?;
                if service.clinic_id != clinic_id {
                    return Err(ScheduleError::Validation(format!(
                        "Service {} is not offered by clinic {}",
                        id, clinic_id
                    )));
                }
                Ok(service.clone())
            })
            .collect()
    }
}

fn ensure_open(booking: &Booking) -> ScheduleResult<()> {
    if booking.status.is_active() {
        Ok(())
    } else {
        Err(ScheduleError::Consistency(format!(
            "Booking {} is {}",
            booking.id, booking.status
        )))
    }
}

/// Staff member whose slots currently hold the item's reservations.
fn reserved_staff(snapshot: &DaySnapshot, service_item_id: Uuid) -> Option<Uuid> {
    snapshot
        .reservations
        .iter()
        .filter(|reservation| reservation.service_item_id == service_item_id)
        .find_map(|reservation| snapshot.slots.iter().find(|slot| slot.id == reservation.slot_id))
        .map(|slot| slot.staff_id)
}

fn walk_items(booking: &Booking, services: &HashMap<Uuid, Service>) -> ScheduleResult<Vec<WalkItem>> {
    WalkItem::from_booking(booking, services)
        .map_err(|service_id| ScheduleError::NotFound(format!("Service with ID {} not found", service_id)))
}

fn item_assignments(steps: &[WalkStep]) -> Vec<ItemAssignment> {
    steps
        .iter()
        .filter_map(|step| {
            let outcome = match &step.result {
                StepResult::Reserved { staff, slots } => ItemOutcome::Assigned {
                    staff: staff.clone(),
                    slot_ids: slots.iter().map(|slot| slot.id).collect(),
                    already_reserved: false,
                },
                StepResult::AlreadyReserved { staff, slot_ids } => ItemOutcome::Assigned {
                    staff: staff.clone(),
                    slot_ids: slot_ids.clone(),
                    already_reserved: true,
                },
                StepResult::NoStaffAvailable { message } => ItemOutcome::NoStaffAvailable {
                    message: message.clone(),
                },
            };

            Some(ItemAssignment {
                service_item_id: step.item.service_item_id?,
                service_id: step.item.service.id,
                position: step.item.position,
                required_specialty: step.requested,
                starts_at: step.starts_at,
                ends_at: step.ends_at,
                outcome,
            })
        })
        .collect()
}
