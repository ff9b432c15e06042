//! [`SchedulingStore`] on Postgres.
//!
//! Slot transitions are conditional UPDATEs on `(id, version, status)`; a
//! statement that matches no row means another transaction moved the slot
//! first, and the whole transaction is rolled back with a conflict.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use eyre::Report;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use uuid::Uuid;

use slotwise_core::errors::{ScheduleError, ScheduleResult};
use slotwise_core::models::{
    booking::{Booking, BookingStatus, Reservation, Service},
    shift::{OperatingHours, Shift, Slot, SlotStatus},
    staff::Staff,
};
use slotwise_core::schedule::{plan::ReservationPlan, snapshot::DaySnapshot};
use slotwise_core::store::SchedulingStore;
use sqlx::PgConnection;

use crate::models::DbShift;
use crate::repositories::{booking, clinic, reservation, service, shift, slot, staff};
use crate::DbPool;

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn shifts_from(rows: Vec<DbShift>) -> Vec<Shift> {
    rows.into_iter().map(Shift::from).collect()
}

async fn load_booking(conn: &mut PgConnection, booking_id: Uuid) -> ScheduleResult<Option<Booking>> {
    let Some(row) = booking::get_booking_by_id(conn, booking_id).await? else {
        return Ok(None);
    };
    let items = booking::get_service_items(conn, booking_id).await?;
    Ok(Some(row.into_booking(items)?))
}

/// Fails with a consistency error if any slot of the shift is booked. The
/// shift's slots stay locked until the transaction ends.
async fn ensure_no_bookings(conn: &mut PgConnection, shift_id: Uuid) -> ScheduleResult<()> {
    let statuses = slot::lock_shift_slots(conn, shift_id).await?;
    let booked = statuses
        .iter()
        .filter(|status| status.as_str() == SlotStatus::Booked.as_str())
        .count();

    if booked > 0 {
        return Err(ScheduleError::Consistency(format!(
            "Shift {} has {} booked slot(s)",
            shift_id, booked
        )));
    }
    Ok(())
}

fn conflict(slot_id: Uuid) -> ScheduleError {
    ScheduleError::Conflict(format!("Slot {} changed since it was read", slot_id))
}

/// Locks the booking row and fails unless the booking is still active.
async fn lock_active_booking(conn: &mut PgConnection, booking_id: Uuid) -> ScheduleResult<()> {
    let status = booking::lock_booking_status(conn, booking_id)
        .await?
        .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {} not found", booking_id)))?
        .parse::<BookingStatus>()
        .map_err(|e| eyre::eyre!(e))?;

    if !status.is_active() {
        return Err(ScheduleError::Consistency(format!("Booking {} is {}", booking_id, status)));
    }
    Ok(())
}

/// A shift insert that lost a race against the same staff, clinic and date
/// surfaces as a unique violation.
fn shift_insert_error(err: Report, shift: &Shift) -> ScheduleError {
    let unique_violation = err
        .downcast_ref::<sqlx::Error>()
        .and_then(|err| err.as_database_error())
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);

    if unique_violation {
        ScheduleError::Consistency(format!(
            "Staff {} already has a shift at this clinic on {}",
            shift.staff_id, shift.work_date
        ))
    } else {
        ScheduleError::Database(err)
    }
}

#[async_trait]
impl SchedulingStore for PgStore {
    async fn get_staff(&self, staff_id: Uuid) -> ScheduleResult<Option<Staff>> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        let row = staff::get_staff_by_id(&mut conn, staff_id).await?;
        Ok(row.map(Staff::try_from).transpose()?)
    }

    async fn get_services(&self, service_ids: Vec<Uuid>) -> ScheduleResult<Vec<Service>> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        let rows = service::get_services_by_ids(&mut conn, &service_ids).await?;
        Ok(rows
            .into_iter()
            .map(Service::try_from)
            .collect::<eyre::Result<Vec<_>>>()?)
    }

    async fn operating_hours(&self, clinic_id: Uuid, day_of_week: i16) -> ScheduleResult<Option<OperatingHours>> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        let row = clinic::get_operating_hours(&mut conn, clinic_id, day_of_week).await?;
        Ok(row.map(OperatingHours::from))
    }

    async fn get_booking(&self, booking_id: Uuid) -> ScheduleResult<Option<Booking>> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        load_booking(&mut conn, booking_id).await
    }

    async fn get_booking_for_item(&self, service_item_id: Uuid) -> ScheduleResult<Option<Booking>> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        match booking::get_booking_id_by_item(&mut conn, service_item_id).await? {
            Some(booking_id) => load_booking(&mut conn, booking_id).await,
            None => Ok(None),
        }
    }

    async fn get_shift(&self, shift_id: Uuid) -> ScheduleResult<Option<Shift>> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        Ok(shift::get_shift_by_id(&mut conn, shift_id).await?.map(Shift::from))
    }

    async fn find_shift(&self, staff_id: Uuid, clinic_id: Uuid, work_date: NaiveDate) -> ScheduleResult<Option<Shift>> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        Ok(shift::find_shift(&mut conn, staff_id, clinic_id, work_date)
            .await?
            .map(Shift::from))
    }

    async fn staff_shifts_between(&self, staff_id: Uuid, from: NaiveDate, to: NaiveDate) -> ScheduleResult<Vec<Shift>> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        Ok(shifts_from(shift::get_staff_shifts_between(&mut conn, staff_id, from, to).await?))
    }

    async fn save_shift(&self, new_shift: Shift, slots: Vec<Slot>, replaces: Option<Uuid>) -> ScheduleResult<()> {
        let mut tx = self.pool.begin().await.map_err(Report::from)?;

        if let Some(old_shift) = replaces {
            ensure_no_bookings(&mut tx, old_shift).await?;
            shift::delete_shift(&mut tx, old_shift).await?;
            debug!("Replaced shift {}", old_shift);
        }

        shift::create_shift(&mut tx, &new_shift)
            .await
            .map_err(|err| shift_insert_error(err, &new_shift))?;
        for new_slot in &slots {
            slot::create_slot(&mut tx, new_slot).await?;
        }

        tx.commit().await.map_err(Report::from)?;
        Ok(())
    }

    async fn delete_shift(&self, shift_id: Uuid) -> ScheduleResult<()> {
        let mut tx = self.pool.begin().await.map_err(Report::from)?;
        ensure_no_bookings(&mut tx, shift_id).await?;
        shift::delete_shift(&mut tx, shift_id).await?;
        tx.commit().await.map_err(Report::from)?;
        Ok(())
    }

    async fn shift_slots(&self, shift_id: Uuid) -> ScheduleResult<Vec<Slot>> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        let rows = slot::get_slots_by_shift_ids(&mut conn, &[shift_id]).await?;
        Ok(rows.into_iter().map(Slot::try_from).collect::<eyre::Result<Vec<_>>>()?)
    }

    async fn get_slot(&self, slot_id: Uuid) -> ScheduleResult<Option<Slot>> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        Ok(slot::get_slot_by_id(&mut conn, slot_id).await?.map(Slot::try_from).transpose()?)
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

        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        let row = slot::transition_slot(&mut conn, slot_id, expected_version, from, to)
            .await?
            .ok_or_else(|| conflict(slot_id))?;
        Ok(Slot::try_from(row)?)
    }

    async fn load_day(&self, clinic_id: Uuid, date: NaiveDate) -> ScheduleResult<DaySnapshot> {
        let mut conn = self.pool.acquire().await.map_err(Report::from)?;
        let mut snapshot = DaySnapshot::new(clinic_id, date);

        snapshot.roster = staff::get_staff_by_clinic(&mut conn, clinic_id)
            .await?
            .into_iter()
            .map(Staff::try_from)
            .collect::<eyre::Result<Vec<_>>>()?;

        // The day before is included for overnight shifts running into `date`.
        snapshot.shifts = shifts_from(
            shift::get_clinic_shifts_between(&mut conn, clinic_id, date - Duration::days(1), date).await?,
        );

        let shift_ids: Vec<Uuid> = snapshot.shifts.iter().map(|shift| shift.id).collect();
        snapshot.slots = slot::get_slots_by_shift_ids(&mut conn, &shift_ids)
            .await?
            .into_iter()
            .map(Slot::try_from)
            .collect::<eyre::Result<Vec<_>>>()?;

        let slot_ids: Vec<Uuid> = snapshot.slots.iter().map(|slot| slot.id).collect();
        snapshot.reservations = reservation::get_reservations_by_slot_ids(&mut conn, &slot_ids)
            .await?
            .into_iter()
            .map(Reservation::from)
            .collect();

        let mut staff_bookings: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
        for row in booking::get_staff_bookings(&mut conn, clinic_id, date).await? {
            staff_bookings.entry(row.staff_id).or_default().insert(row.booking_id);
        }
        snapshot.staff_bookings = staff_bookings;

        Ok(snapshot)
    }

    async fn commit(&self, plan: ReservationPlan) -> ScheduleResult<Vec<Reservation>> {
        let mut tx = self.pool.begin().await.map_err(Report::from)?;
        lock_active_booking(&mut tx, plan.booking_id).await?;

        for release in &plan.releases {
            slot::transition_slot(
                &mut tx,
                release.slot_id,
                release.expected_version,
                SlotStatus::Booked,
                SlotStatus::Available,
            )
            .await?
            .ok_or_else(|| conflict(release.slot_id))?;
            reservation::delete_reservation_by_slot(&mut tx, release.slot_id).await?;
        }

        let mut reservations = Vec::with_capacity(plan.claims.len());
        for claim in &plan.claims {
            slot::transition_slot(
                &mut tx,
                claim.slot_id,
                claim.expected_version,
                SlotStatus::Available,
                SlotStatus::Booked,
            )
            .await?
            .ok_or_else(|| conflict(claim.slot_id))?;

            let created = reservation::create_reservation(&mut tx, claim.slot_id, plan.booking_id, claim.service_item_id)
                .await?
                .ok_or_else(|| conflict(claim.slot_id))?;
            reservations.push(Reservation::from(created));
        }

        for update in &plan.staff_updates {
            booking::update_assigned_staff(&mut tx, update.service_item_id, update.staff_id).await?;
        }

        if let Some(status) = plan.status_change {
            if !status.is_active() {
                let held = reservation::count_booking_reservations(&mut tx, plan.booking_id).await?;
                if held > 0 {
                    return Err(ScheduleError::Conflict(format!(
                        "Booking {} still holds {} reservation(s)",
                        plan.booking_id, held
                    )));
                }
            }
            booking::update_booking_status(&mut tx, plan.booking_id, status).await?;
        }

        tx.commit().await.map_err(Report::from)?;
        debug!(
            "Committed plan for booking {}: {} released, {} reserved",
            plan.booking_id,
            plan.releases.len(),
            reservations.len()
        );
        Ok(reservations)
    }
}
