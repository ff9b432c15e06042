#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use slotwise_core::models::{
    booking::{Booking, BookingStatus, Reservation, Service, ServiceItem},
    shift::{Shift, Slot, SlotStatus},
    specialty::{ServiceCategory, Specialty},
    staff::Staff,
};
use slotwise_core::schedule::{generator::generate_slots, snapshot::DaySnapshot};
use uuid::Uuid;

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_time(time(hour, minute))
}

pub fn staff(clinic_id: Uuid, name: &str, specialty: Specialty) -> Staff {
    Staff {
        id: Uuid::new_v4(),
        clinic_id,
        full_name: name.to_string(),
        specialty,
        active: true,
        created_at: Utc::now(),
    }
}

pub fn shift(staff: &Staff, start: NaiveTime, end: NaiveTime) -> Shift {
    Shift {
        id: Uuid::new_v4(),
        staff_id: staff.id,
        clinic_id: staff.clinic_id,
        work_date: day(),
        start_time: start,
        end_time: end,
        break_start: None,
        break_end: None,
        overnight: false,
        notes: None,
        created_at: Utc::now(),
    }
}

pub fn service(clinic_id: Uuid, name: &str, category: ServiceCategory, minutes: i32, cents: i64) -> Service {
    Service {
        id: Uuid::new_v4(),
        clinic_id,
        name: name.to_string(),
        category,
        duration_minutes: minutes,
        price: Decimal::new(cents, 2),
    }
}

pub fn booking(clinic_id: Uuid, start: NaiveTime, services: &[&Service]) -> Booking {
    let id = Uuid::new_v4();
    Booking {
        id,
        clinic_id,
        booking_date: day(),
        start_time: start,
        status: BookingStatus::Confirmed,
        items: services
            .iter()
            .enumerate()
            .map(|(position, service)| ServiceItem {
                id: Uuid::new_v4(),
                booking_id: id,
                service_id: service.id,
                position: position as i32,
                price: service.price,
                assigned_staff_id: None,
            })
            .collect(),
        created_at: Utc::now(),
    }
}

/// Snapshot builder that keeps shifts and their generated slots together.
pub struct World {
    pub snapshot: DaySnapshot,
}

impl World {
    pub fn new(clinic_id: Uuid) -> Self {
        Self { snapshot: DaySnapshot::new(clinic_id, day()) }
    }

    pub fn clinic_id(&self) -> Uuid {
        self.snapshot.clinic_id
    }

    pub fn hire(&mut self, name: &str, specialty: Specialty) -> Staff {
        let member = staff(self.clinic_id(), name, specialty);
        self.snapshot.roster.push(member.clone());
        member
    }

    pub fn add_shift(&mut self, shift: Shift) -> Shift {
        self.snapshot.slots.extend(generate_slots(&shift));
        self.snapshot.shifts.push(shift.clone());
        shift
    }

    pub fn work(&mut self, staff: &Staff, start: NaiveTime, end: NaiveTime) -> Shift {
        self.add_shift(shift(staff, start, end))
    }

    pub fn slot_at(&self, staff_id: Uuid, starts_at: NaiveDateTime) -> &Slot {
        self.snapshot
            .slots
            .iter()
            .find(|slot| slot.staff_id == staff_id && slot.starts_at() == starts_at)
            .unwrap()
    }

    pub fn set_status(&mut self, staff_id: Uuid, starts_at: NaiveDateTime, status: SlotStatus) {
        let slot = self
            .snapshot
            .slots
            .iter_mut()
            .find(|slot| slot.staff_id == staff_id && slot.starts_at() == starts_at)
            .unwrap();
        slot.status = status;
        slot.version += 1;
    }

    /// Books the slot for `booking` and records the reservation.
    pub fn reserve(&mut self, staff_id: Uuid, starts_at: NaiveDateTime, booking_id: Uuid, service_item_id: Uuid) {
        self.set_status(staff_id, starts_at, SlotStatus::Booked);
        let slot_id = self.slot_at(staff_id, starts_at).id;
        self.snapshot.reservations.push(Reservation {
            id: Uuid::new_v4(),
            slot_id,
            booking_id,
            service_item_id,
            created_at: Utc::now(),
        });
    }

    /// Counts `booking_id` towards the staff member's load.
    pub fn load(&mut self, staff_id: Uuid, booking_id: Uuid) {
        self.snapshot
            .staff_bookings
            .entry(staff_id)
            .or_default()
            .insert(booking_id);
    }
}
