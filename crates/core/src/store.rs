//! Persistence seam of the engine.
//!
//! Reads return plain domain values; every mutating method is one atomic
//! transaction. Slot transitions are compare-and-swap on the slot's version
//! and status, and a mismatch fails the whole call with
//! [`ScheduleError::Conflict`](crate::errors::ScheduleError::Conflict).

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::ScheduleResult;
use crate::models::{
    booking::{Booking, Reservation, Service},
    shift::{OperatingHours, Shift, Slot, SlotStatus},
    staff::Staff,
};
use crate::schedule::{plan::ReservationPlan, snapshot::DaySnapshot};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    async fn get_staff(&self, staff_id: Uuid) -> ScheduleResult<Option<Staff>>;

    /// Services with the given ids, in no particular order. Unknown ids are
    /// left out.
    async fn get_services(&self, service_ids: Vec<Uuid>) -> ScheduleResult<Vec<Service>>;

    async fn operating_hours(&self, clinic_id: Uuid, day_of_week: i16) -> ScheduleResult<Option<OperatingHours>>;

    /// The booking with all of its service items.
    async fn get_booking(&self, booking_id: Uuid) -> ScheduleResult<Option<Booking>>;

    async fn get_booking_for_item(&self, service_item_id: Uuid) -> ScheduleResult<Option<Booking>>;

    async fn get_shift(&self, shift_id: Uuid) -> ScheduleResult<Option<Shift>>;

    async fn find_shift(&self, staff_id: Uuid, clinic_id: Uuid, work_date: NaiveDate) -> ScheduleResult<Option<Shift>>;

    /// The staff member's shifts at any clinic with a work date in `[from, to]`.
    async fn staff_shifts_between(&self, staff_id: Uuid, from: NaiveDate, to: NaiveDate) -> ScheduleResult<Vec<Shift>>;

    /// Inserts a shift with its slots, first deleting `replaces` if given.
    /// Fails with a consistency error if the replaced shift has booked slots.
    async fn save_shift(&self, shift: Shift, slots: Vec<Slot>, replaces: Option<Uuid>) -> ScheduleResult<()>;

    /// Deletes a shift and its slots. Fails with a consistency error if any
    /// slot is booked.
    async fn delete_shift(&self, shift_id: Uuid) -> ScheduleResult<()>;

    async fn shift_slots(&self, shift_id: Uuid) -> ScheduleResult<Vec<Slot>>;

    async fn get_slot(&self, slot_id: Uuid) -> ScheduleResult<Option<Slot>>;

    /// Moves a slot between two non-booked statuses and returns it updated.
    async fn transition_slot(
        &self,
        slot_id: Uuid,
        expected_version: i64,
        from: SlotStatus,
        to: SlotStatus,
    ) -> ScheduleResult<Slot>;

    async fn load_day(&self, clinic_id: Uuid, date: NaiveDate) -> ScheduleResult<DaySnapshot>;

    /// Applies a plan atomically and returns the reservations it created.
    ///
    /// Fails with a consistency error if the booking is no longer active,
    /// and with a conflict if any slot moved since it was read or if a status
    /// change would leave an inactive booking holding reservations.
    async fn commit(&self, plan: ReservationPlan) -> ScheduleResult<Vec<Reservation>>;
}
