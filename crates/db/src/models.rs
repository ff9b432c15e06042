//! Row types as stored in Postgres. Enums are kept as their wire strings and
//! parsed on the way into the core types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::{eyre, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use slotwise_core::models::{
    booking::{Booking, BookingStatus, Reservation, Service, ServiceItem},
    shift::{OperatingHours, Shift, Slot, SlotStatus},
    specialty::{ServiceCategory, Specialty},
    staff::Staff,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStaff {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub full_name: String,
    pub specialty: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbStaff> for Staff {
    type Error = eyre::Report;

    fn try_from(row: DbStaff) -> Result<Self> {
        Ok(Staff {
            id: row.id,
            clinic_id: row.clinic_id,
            full_name: row.full_name,
            specialty: row.specialty.parse::<Specialty>().map_err(|e| eyre!(e))?,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub name: String,
    pub category: String,
    pub duration_minutes: i32,
    pub price: Decimal,
}

impl TryFrom<DbService> for Service {
    type Error = eyre::Report;

    fn try_from(row: DbService) -> Result<Self> {
        Ok(Service {
            id: row.id,
            clinic_id: row.clinic_id,
            name: row.name,
            category: row.category.parse::<ServiceCategory>().map_err(|e| eyre!(e))?,
            duration_minutes: row.duration_minutes,
            price: row.price,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOperatingHours {
    pub clinic_id: Uuid,
    pub day_of_week: i16,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_closed: bool,
}

impl From<DbOperatingHours> for OperatingHours {
    fn from(row: DbOperatingHours) -> Self {
        OperatingHours {
            clinic_id: row.clinic_id,
            day_of_week: row.day_of_week,
            open_time: row.open_time,
            close_time: row.close_time,
            is_closed: row.is_closed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbShift {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub clinic_id: Uuid,
    pub work_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
    pub overnight: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbShift> for Shift {
    fn from(row: DbShift) -> Self {
        Shift {
            id: row.id,
            staff_id: row.staff_id,
            clinic_id: row.clinic_id,
            work_date: row.work_date,
            start_time: row.start_time,
            end_time: row.end_time,
            break_start: row.break_start,
            break_end: row.break_end,
            overnight: row.overnight,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub shift_id: Uuid,
    pub staff_id: Uuid,
    pub clinic_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub version: i64,
}

impl TryFrom<DbSlot> for Slot {
    type Error = eyre::Report;

    fn try_from(row: DbSlot) -> Result<Self> {
        Ok(Slot {
            id: row.id,
            shift_id: row.shift_id,
            staff_id: row.staff_id,
            clinic_id: row.clinic_id,
            slot_date: row.slot_date,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.parse::<SlotStatus>().map_err(|e| eyre!(e))?,
            version: row.version,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbServiceItem {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub service_id: Uuid,
    pub position: i32,
    pub price: Decimal,
    pub assigned_staff_id: Option<Uuid>,
}

impl From<DbServiceItem> for ServiceItem {
    fn from(row: DbServiceItem) -> Self {
        ServiceItem {
            id: row.id,
            booking_id: row.booking_id,
            service_id: row.service_id,
            position: row.position,
            price: row.price,
            assigned_staff_id: row.assigned_staff_id,
        }
    }
}

impl DbBooking {
    pub fn into_booking(self, items: Vec<DbServiceItem>) -> Result<Booking> {
        Ok(Booking {
            id: self.id,
            clinic_id: self.clinic_id,
            booking_date: self.booking_date,
            start_time: self.start_time,
            status: self.status.parse::<BookingStatus>().map_err(|e| eyre!(e))?,
            items: items.into_iter().map(ServiceItem::from).collect(),
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservation {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub booking_id: Uuid,
    pub service_item_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<DbReservation> for Reservation {
    fn from(row: DbReservation) -> Self {
        Reservation {
            id: row.id,
            slot_id: row.slot_id,
            booking_id: row.booking_id,
            service_item_id: row.service_item_id,
            created_at: row.created_at,
        }
    }
}

/// Staff id paired with a booking they are assigned to.
#[derive(Debug, Clone, FromRow)]
pub struct DbStaffBooking {
    pub staff_id: Uuid,
    pub booking_id: Uuid,
}
