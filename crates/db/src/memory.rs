//! In-process [`SchedulingStore`] with the same transition and conflict rules
//! as [`PgStore`](crate::pg_store::PgStore). Every call takes one lock, so
//! each mutation is atomic.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use slotwise_core::errors::{ScheduleError, ScheduleResult};
use slotwise_core::models::{
    booking::{Booking, BookingStatus, Reservation, Service},
    shift::{OperatingHours, Shift, Slot, SlotStatus},
    staff::Staff,
};
use slotwise_core::schedule::{plan::ReservationPlan, snapshot::DaySnapshot};
use slotwise_core::store::SchedulingStore;

#[derive(Debug, Default)]
struct MemoryState {
    staff: HashMap<Uuid, Staff>,
    services: HashMap<Uuid, Service>,
    hours: HashMap<(Uuid, i16), OperatingHours>,
    bookings: HashMap<Uuid, Booking>,
    shifts: HashMap<Uuid, Shift>,
    slots: HashMap<Uuid, Slot>,
    /// Keyed by slot id; a slot carries at most one reservation.
    reservations: HashMap<Uuid, Reservation>,
}

impl MemoryState {
    fn ensure_no_bookings(&self, shift_id: Uuid) -> ScheduleResult<()> {
        let booked = self
            .slots
            .values()
            .filter(|slot| slot.shift_id == shift_id && slot.status == SlotStatus::Booked)
            .count();

        if booked > 0 {
            return Err(ScheduleError::Consistency(format!(
                "Shift {} has {} booked slot(s)",
                shift_id, booked
            )));
        }
        Ok(())
    }

    fn remove_shift(&mut self, shift_id: Uuid) {
        self.shifts.remove(&shift_id);
        self.slots.retain(|_, slot| slot.shift_id != shift_id);
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_staff(&self, staff: Staff) {
        self.state.write().await.staff.insert(staff.id, staff);
    }

    pub async fn insert_service(&self, service: Service) {
        self.state.write().await.services.insert(service.id, service);
    }

    pub async fn insert_booking(&self, booking: Booking) {
        self.state.write().await.bookings.insert(booking.id, booking);
    }

    pub async fn set_operating_hours(&self, hours: OperatingHours) {
        self.state
            .write()
            .await
            .hours
            .insert((hours.clinic_id, hours.day_of_week), hours);
    }

    /// Every reservation currently held, in no particular order.
    pub async fn reservations(&self) -> Vec<Reservation> {
        self.state.read().await.reservations.values().cloned().collect()
    }
}

fn conflict(slot_id: Uuid) -> ScheduleError {
    ScheduleError::Conflict(format!("Slot {} changed since it was read", slot_id))
}

fn closed(booking_id: Uuid, status: BookingStatus) -> ScheduleError {
    ScheduleError::Consistency(format!("Booking {} is {}", booking_id, status))
}

fn step(slot: &mut Slot, expected_version: i64, from: SlotStatus, to: SlotStatus) -> ScheduleResult<()> {
    if slot.version != expected_version || slot.status != from {
        return Err(conflict(slot.id));
    }
    slot.status = to;
    slot.version += 1;
    Ok(())
}

#[async_trait]
impl SchedulingStore for MemoryStore {
    async fn get_staff(&self, staff_id: Uuid) -> ScheduleResult<Option<Staff>> {
        Ok(self.state.read().await.staff.get(&staff_id).cloned())
    }

    async fn get_services(&self, service_ids: Vec<Uuid>) -> ScheduleResult<Vec<Service>> {
        let state = self.state.read().await;
        let unique: HashSet<Uuid> = service_ids.into_iter().collect();
        Ok(unique
            .iter()
            .filter_map(|id| state.services.get(id).cloned())
            .collect())
    }

    async fn operating_hours(&self, clinic_id: Uuid, day_of_week: i16) -> ScheduleResult<Option<OperatingHours>> {
        Ok(self.state.read().await.hours.get(&(clinic_id, day_of_week)).cloned())
    }

    async fn get_booking(&self, booking_id: Uuid) -> ScheduleResult<Option<Booking>> {
        Ok(self.state.read().await.bookings.get(&booking_id).cloned())
    }

    async fn get_booking_for_item(&self, service_item_id: Uuid) -> ScheduleResult<Option<Booking>> {
        let state = self.state.read().await;
        Ok(state
            .bookings
            .values()
            .find(|booking| booking.items.iter().any(|item| item.id == service_item_id))
            .cloned())
    }

    async fn get_shift(&self, shift_id: Uuid) -> ScheduleResult<Option<Shift>> {
        Ok(self.state.read().await.shifts.get(&shift_id).cloned())
    }

    async fn find_shift(&self, staff_id: Uuid, clinic_id: Uuid, work_date: NaiveDate) -> ScheduleResult<Option<Shift>> {
        let state = self.state.read().await;
        Ok(state
            .shifts
            .values()
            .find(|shift| shift.staff_id == staff_id && shift.clinic_id == clinic_id && shift.work_date == work_date)
            .cloned())
    }

    async fn staff_shifts_between(&self, staff_id: Uuid, from: NaiveDate, to: NaiveDate) -> ScheduleResult<Vec<Shift>> {
        let state = self.state.read().await;
        let mut shifts: Vec<Shift> = state
            .shifts
            .values()
            .filter(|shift| shift.staff_id == staff_id && shift.work_date >= from && shift.work_date <= to)
            .cloned()
            .collect();
        shifts.sort_by_key(|shift| shift.starts_at());
        Ok(shifts)
    }

    async fn save_shift(&self, shift: Shift, slots: Vec<Slot>, replaces: Option<Uuid>) -> ScheduleResult<()> {
        let mut state = self.state.write().await;

        if let Some(old_shift) = replaces {
            state.ensure_no_bookings(old_shift)?;
            state.remove_shift(old_shift);
        }

        let duplicate = state.shifts.values().any(|other| {
            other.staff_id == shift.staff_id && other.clinic_id == shift.clinic_id && other.work_date == shift.work_date
        });
        if duplicate {
            return Err(ScheduleError::Consistency(format!(
                "Staff {} already has a shift on {}",
                shift.staff_id, shift.work_date
            )));
        }

        for slot in slots {
            state.slots.insert(slot.id, slot);
        }
        state.shifts.insert(shift.id, shift);
        Ok(())
    }

    async fn delete_shift(&self, shift_id: Uuid) -> ScheduleResult<()> {
        let mut state = self.state.write().await;
        state.ensure_no_bookings(shift_id)?;
        state.remove_shift(shift_id);
        Ok(())
    }

    async fn shift_slots(&self, shift_id: Uuid) -> ScheduleResult<Vec<Slot>> {
        let state = self.state.read().await;
        let mut slots: Vec<Slot> = state
            .slots
            .values()
            .filter(|slot| slot.shift_id == shift_id)
            .cloned()
            .collect();
        slots.sort_by_key(|slot| slot.starts_at());
        Ok(slots)
    }

    async fn get_slot(&self, slot_id: Uuid) -> ScheduleResult<Option<Slot>> {
        Ok(self.state.read().await.slots.get(&slot_id).cloned())
    }

    async fn transition_slot(
        &self,
        slot_id: Uuid,
        expected_version: i64,
        from: SlotStatus,
        to: SlotStatus,
    ) -> ScheduleResult<Slot> {
        if from == SlotStatus::Booked || to == SlotStatus::Booked {
            return Err(ScheduleError::Validation(
                "Booked slots only change through reservations".to_string(),
            ));
        }

        let mut state = self.state.write().await;
        let slot = state.slots.get_mut(&slot_id).ok_or_else(|| conflict(slot_id))?;
        step(slot, expected_version, from, to)?;
        Ok(slot.clone())
    }

    async fn load_day(&self, clinic_id: Uuid, date: NaiveDate) -> ScheduleResult<DaySnapshot> {
        let state = self.state.read().await;
        let mut snapshot = DaySnapshot::new(clinic_id, date);
        let previous = date - Duration::days(1);

        snapshot.roster = state
            .staff
            .values()
            .filter(|staff| staff.clinic_id == clinic_id)
            .cloned()
            .collect();
        snapshot.roster.sort_by(|a, b| a.full_name.cmp(&b.full_name));

        snapshot.shifts = state
            .shifts
            .values()
            .filter(|shift| shift.clinic_id == clinic_id && shift.work_date >= previous && shift.work_date <= date)
            .cloned()
            .collect();
        snapshot.shifts.sort_by_key(|shift| shift.starts_at());

        let shift_ids: HashSet<Uuid> = snapshot.shifts.iter().map(|shift| shift.id).collect();
        snapshot.slots = state
            .slots
            .values()
            .filter(|slot| shift_ids.contains(&slot.shift_id))
            .cloned()
            .collect();
        snapshot.slots.sort_by_key(|slot| slot.starts_at());

        snapshot.reservations = snapshot
            .slots
            .iter()
            .filter_map(|slot| state.reservations.get(&slot.id).cloned())
            .collect();

        for booking in state.bookings.values() {
            if booking.clinic_id != clinic_id || booking.booking_date != date || !booking.status.is_active() {
                continue;
            }
            for staff_id in booking.items.iter().filter_map(|item| item.assigned_staff_id) {
                snapshot.staff_bookings.entry(staff_id).or_default().insert(booking.id);
            }
        }

        Ok(snapshot)
    }

    async fn commit(&self, plan: ReservationPlan) -> ScheduleResult<Vec<Reservation>> {
        let mut state = self.state.write().await;

        let status = state
            .bookings
            .get(&plan.booking_id)
            .map(|booking| booking.status)
            .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {} not found", plan.booking_id)))?;
        if !status.is_active() {
            return Err(closed(plan.booking_id, status));
        }

        // Work on copies so a conflict halfway leaves the state untouched.
        let mut touched: HashMap<Uuid, Slot> = HashMap::new();
        let mut released: HashSet<Uuid> = HashSet::new();

        for release in &plan.releases {
            let mut slot = match touched.remove(&release.slot_id) {
                Some(slot) => slot,
                None => state.slots.get(&release.slot_id).cloned().ok_or_else(|| conflict(release.slot_id))?,
            };
            step(&mut slot, release.expected_version, SlotStatus::Booked, SlotStatus::Available)?;
            released.insert(slot.id);
            touched.insert(slot.id, slot);
        }

        for claim in &plan.claims {
            let mut slot = match touched.remove(&claim.slot_id) {
                Some(slot) => slot,
                None => state.slots.get(&claim.slot_id).cloned().ok_or_else(|| conflict(claim.slot_id))?,
            };
            step(&mut slot, claim.expected_version, SlotStatus::Available, SlotStatus::Booked)?;
            if state.reservations.contains_key(&slot.id) && !released.contains(&slot.id) {
                return Err(conflict(slot.id));
            }
            touched.insert(slot.id, slot);
        }

        if plan.status_change.is_some_and(|status| !status.is_active()) {
            let kept = state
                .reservations
                .values()
                .filter(|reservation| reservation.booking_id == plan.booking_id && !released.contains(&reservation.slot_id))
                .count();
            if kept + plan.claims.len() > 0 {
                return Err(ScheduleError::Conflict(format!(
                    "Booking {} still holds {} reservation(s)",
                    plan.booking_id,
                    kept + plan.claims.len()
                )));
            }
        }

        for slot_id in &released {
            state.reservations.remove(slot_id);
        }
        for (slot_id, slot) in touched {
            state.slots.insert(slot_id, slot);
        }

        let mut reservations = Vec::with_capacity(plan.claims.len());
        for claim in &plan.claims {
            let reservation = Reservation {
                id: Uuid::new_v4(),
                slot_id: claim.slot_id,
                booking_id: plan.booking_id,
                service_item_id: claim.service_item_id,
                created_at: chrono::Utc::now(),
            };
            state.reservations.insert(claim.slot_id, reservation.clone());
            reservations.push(reservation);
        }

        if let Some(booking) = state.bookings.get_mut(&plan.booking_id) {
            for update in &plan.staff_updates {
                if let Some(item) = booking.items.iter_mut().find(|item| item.id == update.service_item_id) {
                    item.assigned_staff_id = update.staff_id;
                }
            }
            if let Some(status) = plan.status_change {
                booking.status = status;
            }
        }

        Ok(reservations)
    }
}
