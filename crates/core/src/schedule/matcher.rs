use crate::models::{specialty::Specialty, staff::Staff};

/// Result of matching a roster against a required specialty.
#[derive(Debug, Clone)]
pub struct SpecialtyMatch<'a> {
    pub requested: Specialty,
    /// The specialty the staff actually carry, which differs from
    /// `requested` when the general-practice fallback kicked in.
    pub resolved: Specialty,
    pub staff: Vec<&'a Staff>,
}

impl SpecialtyMatch<'_> {
    pub fn is_empty(&self) -> bool {
        self.staff.is_empty()
    }

    pub fn used_fallback(&self) -> bool {
        self.requested != self.resolved
    }
}

/// Active staff in `roster` carrying `required`, retrying with general
/// practice when nobody does and the specialty allows it.
pub fn match_specialty(roster: &[Staff], required: Specialty) -> SpecialtyMatch<'_> {
    let staff = with_specialty(roster, required);
    if !staff.is_empty() {
        return SpecialtyMatch { requested: required, resolved: required, staff };
    }

    match required.fallback() {
        Some(fallback) => SpecialtyMatch {
            requested: required,
            resolved: fallback,
            staff: with_specialty(roster, fallback),
        },
        None => SpecialtyMatch { requested: required, resolved: required, staff },
    }
}

fn with_specialty(roster: &[Staff], specialty: Specialty) -> Vec<&Staff> {
    roster
        .iter()
        .filter(|staff| staff.active && staff.specialty == specialty)
        .collect()
}
