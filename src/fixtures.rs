//! Deterministic synthetic employees and shift catalogs, used by tests, the
//! benchmark binary and manual exploration. Grounded on the teacher's
//! `demo_data.rs` (`StdRng::seed_from_u64`, weighted-distribution picker,
//! small/large size presets), re-themed from shift-location scheduling to
//! a hospital imaging department's radiographer/nurse roster.

use chrono::NaiveTime;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{ContractType, Employee, Group, Modality, ShiftCatalog, ShiftType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureSize {
    Small,
    Large,
}

impl std::str::FromStr for FixtureSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(FixtureSize::Small),
            "LARGE" => Ok(FixtureSize::Large),
            _ => Err(()),
        }
    }
}

impl FixtureSize {
    fn employee_count(self) -> usize {
        match self {
            FixtureSize::Small => 15,
            FixtureSize::Large => 80,
        }
    }
}

const FIRST_NAMES: &[&str] = &[
    "Anna", "Piotr", "Maria", "Jan", "Ewa", "Tomasz", "Kasia", "Pawel", "Zofia", "Marek",
];
const LAST_NAMES: &[&str] = &[
    "Kowalski", "Nowak", "Wisniewski", "Wojcik", "Kaminski", "Lewandowski", "Zielinski",
    "Szymanski", "Dabrowski", "Kozlowski",
];

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// The standard imaging-department shift set: one 24h radiographer line,
/// a daytime MR line, day/night TK lines, and day/night nurse lines.
pub fn shift_catalog() -> ShiftCatalog {
    ShiftCatalog::new(vec![
        ShiftType::new("ER-24", Group::Radiographer, Modality::All, time(7, 0), time(7, 0), 24.0, true),
        ShiftType::new("ER-MR", Group::Radiographer, Modality::Mr, time(7, 0), time(15, 0), 8.0, false),
        ShiftType::new("ER-TK-D", Group::Radiographer, Modality::Tk, time(7, 0), time(15, 0), 8.0, false),
        ShiftType::new("ER-TK-N", Group::Radiographer, Modality::Tk, time(19, 0), time(7, 0), 12.0, false),
        ShiftType::new("ZDO-D", Group::Nurse, Modality::Zdo, time(7, 0), time(19, 0), 12.0, false),
        ShiftType::new("ZDO-N", Group::Nurse, Modality::Zdo, time(19, 0), time(7, 0), 12.0, false),
    ])
    .expect("fixture catalog codes are unique by construction")
}

fn pick_weighted<T: Copy>(rng: &mut StdRng, options: &[(T, f64)]) -> T {
    let total: f64 = options.iter().map(|(_, w)| w).sum();
    let mut choice = rng.gen::<f64>() * total;
    for (value, weight) in options {
        if choice < *weight {
            return *value;
        }
        choice -= weight;
    }
    options.last().expect("non-empty weighted option list").0
}

/// Generates `size.employee_count()` employees with a realistic mix of
/// groups, contract types, skills and monthly hour caps. Deterministic: the
/// RNG is always seeded with `0`, so repeated calls return the same roster.
pub fn generate_employees(size: FixtureSize) -> Vec<Employee> {
    let mut rng = StdRng::seed_from_u64(0);
    let count = size.employee_count();

    let mut names = Vec::with_capacity(FIRST_NAMES.len() * LAST_NAMES.len());
    for first in FIRST_NAMES {
        for last in LAST_NAMES {
            names.push(format!("{first} {last}"));
        }
    }
    names.shuffle(&mut rng);

    let mut employees = Vec::with_capacity(count);
    for i in 0..count {
        let name = names[i % names.len()].clone();
        let id = format!("E{i:03}");

        let group = pick_weighted(&mut rng, &[(Group::Radiographer, 0.7), (Group::Nurse, 0.3)]);
        let contract_type = pick_weighted(
            &mut rng,
            &[
                (ContractType::Employment, 0.6),
                (ContractType::B2b, 0.3),
                (ContractType::Mandate, 0.1),
            ],
        );

        let mut employee = Employee::new(id, name, "radiographer/nurse", group, contract_type);

        if contract_type == ContractType::Employment {
            let fraction = pick_weighted(&mut rng, &[(1.0, 0.6), (0.75, 0.2), (0.5, 0.2)]);
            employee = employee.with_employment_fraction(fraction);
            if rng.gen_bool(0.5) {
                employee = employee.with_target_hours(crate::domain::TargetHours::Auto);
            }
        }

        match group {
            Group::Radiographer => {
                let mr = rng.gen_bool(0.8);
                let tk = rng.gen_bool(0.6) || !mr;
                employee = employee.with_derived_skills(mr, tk);
                if rng.gen_bool(0.3) {
                    employee = employee.with_may_work_24h(true);
                }
            }
            Group::Nurse => {
                employee = employee.with_derived_skills(false, false);
            }
        }

        if rng.gen_bool(0.3) {
            employee = employee.with_min_hours(100.0);
        }
        if rng.gen_bool(0.3) {
            employee = employee.with_max_hours(180.0);
        }

        employees.push(employee);
    }

    employees
}

/// A month with a realistic number of weekdays and at least one weekend,
/// used as the default fixture month.
pub fn fixture_month() -> &'static str {
    "2026-02"
}
