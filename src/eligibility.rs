//! The eligibility predicate: may employee `e` work shift `s`?
//!
//! Grounded on `constraints_hard.py::eligible_for_shift` in the original
//! source; restated here as a pure free function over the typed domain.

use crate::domain::{Employee, Modality, ShiftType};

/// `true` iff `employee` may be assigned to `shift` (SPEC_FULL.md §4.3).
pub fn eligible(employee: &Employee, shift: &ShiftType) -> bool {
    if employee.group != shift.group {
        return false;
    }
    if shift.is_24h && !employee.may_work_24h {
        return false;
    }
    match shift.modality {
        Modality::Mr => employee.skills.contains(&Modality::Mr),
        Modality::Tk => employee.skills.contains(&Modality::Tk),
        Modality::Zdo => employee.skills.contains(&Modality::Zdo),
        Modality::All => employee.group == crate::domain::Group::Radiographer,
    }
}
