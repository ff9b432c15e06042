use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::shift::SLOT_MINUTES;
use super::specialty::{ServiceCategory, Specialty};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    /// Bookings that still hold staff time and count towards staff load.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::InProgress
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "IN_PROGRESS" => Ok(BookingStatus::InProgress),
            "COMPLETED" => Ok(BookingStatus::Completed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            other => Err(format!("Unknown booking status: {}", other)),
        }
    }
}

/// A service offered by a clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub name: String,
    pub category: ServiceCategory,
    pub duration_minutes: i32,
    pub price: Decimal,
}

impl Service {
    pub fn required_specialty(&self) -> Specialty {
        self.category.required_specialty()
    }

    pub fn slots_needed(&self) -> u32 {
        slots_needed(self.duration_minutes)
    }
}

/// Number of slots a service of `duration_minutes` occupies, never below one.
pub fn slots_needed(duration_minutes: i32) -> u32 {
    let minutes = i64::from(duration_minutes.max(1));
    ((minutes + SLOT_MINUTES - 1) / SLOT_MINUTES) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub service_id: Uuid,
    /// Zero-based schedule order inside the booking.
    pub position: i32,
    pub price: Decimal,
    pub assigned_staff_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: BookingStatus,
    pub items: Vec<ServiceItem>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.booking_date.and_time(self.start_time)
    }

    /// Items in schedule order.
    pub fn ordered_items(&self) -> Vec<&ServiceItem> {
        let mut items: Vec<&ServiceItem> = self.items.iter().collect();
        items.sort_by_key(|item| (item.position, item.id));
        items
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub booking_id: Uuid,
    pub service_item_id: Uuid,
    pub created_at: DateTime<Utc>,
}
