use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Capability tag carried by staff and required by services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Specialty {
    #[serde(rename = "VET_GENERAL")]
    GeneralPractice,
    #[serde(rename = "VET_SURGERY")]
    Surgery,
    #[serde(rename = "VET_DENTAL")]
    Dental,
    #[serde(rename = "VET_DERMATOLOGY")]
    Dermatology,
    #[serde(rename = "VET_CARDIOLOGY")]
    Cardiology,
    #[serde(rename = "VET_EXOTIC")]
    Exotic,
    #[serde(rename = "GROOMER")]
    Groomer,
}

impl Specialty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Specialty::GeneralPractice => "VET_GENERAL",
            Specialty::Surgery => "VET_SURGERY",
            Specialty::Dental => "VET_DENTAL",
            Specialty::Dermatology => "VET_DERMATOLOGY",
            Specialty::Cardiology => "VET_CARDIOLOGY",
            Specialty::Exotic => "VET_EXOTIC",
            Specialty::Groomer => "GROOMER",
        }
    }

    /// The specialty to retry with when nobody carries `self`.
    ///
    /// General practice has nowhere to go, and grooming is not a medical
    /// service, so neither falls back.
    pub fn fallback(&self) -> Option<Specialty> {
        match self {
            Specialty::GeneralPractice | Specialty::Groomer => None,
            _ => Some(Specialty::GeneralPractice),
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Specialty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VET_GENERAL" => Ok(Specialty::GeneralPractice),
            "VET_SURGERY" => Ok(Specialty::Surgery),
            "VET_DENTAL" => Ok(Specialty::Dental),
            "VET_DERMATOLOGY" => Ok(Specialty::Dermatology),
            "VET_CARDIOLOGY" => Ok(Specialty::Cardiology),
            "VET_EXOTIC" => Ok(Specialty::Exotic),
            "GROOMER" => Ok(Specialty::Groomer),
            other => Err(format!("Unknown specialty: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceCategory {
    Checkup,
    Vaccination,
    Surgery,
    Dental,
    Dermatology,
    Cardiology,
    Exotic,
    Grooming,
}

impl ServiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Checkup => "CHECKUP",
            ServiceCategory::Vaccination => "VACCINATION",
            ServiceCategory::Surgery => "SURGERY",
            ServiceCategory::Dental => "DENTAL",
            ServiceCategory::Dermatology => "DERMATOLOGY",
            ServiceCategory::Cardiology => "CARDIOLOGY",
            ServiceCategory::Exotic => "EXOTIC",
            ServiceCategory::Grooming => "GROOMING",
        }
    }

    pub fn required_specialty(&self) -> Specialty {
        match self {
            ServiceCategory::Checkup | ServiceCategory::Vaccination => Specialty::GeneralPractice,
            ServiceCategory::Surgery => Specialty::Surgery,
            ServiceCategory::Dental => Specialty::Dental,
            ServiceCategory::Dermatology => Specialty::Dermatology,
            ServiceCategory::Cardiology => Specialty::Cardiology,
            ServiceCategory::Exotic => Specialty::Exotic,
            ServiceCategory::Grooming => Specialty::Groomer,
        }
    }
}

impl FromStr for ServiceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CHECKUP" => Ok(ServiceCategory::Checkup),
            "VACCINATION" => Ok(ServiceCategory::Vaccination),
            "SURGERY" => Ok(ServiceCategory::Surgery),
            "DENTAL" => Ok(ServiceCategory::Dental),
            "DERMATOLOGY" => Ok(ServiceCategory::Dermatology),
            "CARDIOLOGY" => Ok(ServiceCategory::Cardiology),
            "EXOTIC" => Ok(ServiceCategory::Exotic),
            "GROOMING" => Ok(ServiceCategory::Grooming),
            other => Err(format!("Unknown service category: {}", other)),
        }
    }
}
