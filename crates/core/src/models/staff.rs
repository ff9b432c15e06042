use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::specialty::Specialty;

/// A bookable staff member. Veterinarians and groomers share this type and
/// are told apart by their specialty only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub full_name: String,
    pub specialty: Specialty,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffSummary {
    pub id: Uuid,
    pub full_name: String,
    pub specialty: Specialty,
}

impl From<&Staff> for StaffSummary {
    fn from(staff: &Staff) -> Self {
        Self {
            id: staff.id,
            full_name: staff.full_name.clone(),
            specialty: staff.specialty,
        }
    }
}
