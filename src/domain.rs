//! Domain model: typed employee, shift-type, demand, assignment and settings
//! records, plus the closed label-normalization tables from the source
//! system's ingestion layer (kept here so adapters don't have to
//! re-implement them — see SPEC_FULL.md §3.1).

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// The two staff groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Group {
    Radiographer,
    Nurse,
}

impl Group {
    /// Parses a free-text label (case- and accent-insensitive), per the
    /// closed synonym table in SPEC_FULL.md §6. Fails closed on anything
    /// else: unknown labels are a boundary error, never a silent default.
    pub fn parse(label: &str) -> Result<Self, RosterError> {
        match normalize_label(label).as_str() {
            "elektroradiolog" | "er" | "radiographer" => Ok(Group::Radiographer),
            "pielegniarka" | "piel" | "zdo" | "nurse" => Ok(Group::Nurse),
            _ => Err(RosterError::UnknownGroup(label.to_string())),
        }
    }
}

/// The three contract forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    Employment,
    B2b,
    Mandate,
}

impl ContractType {
    pub fn parse(label: &str) -> Result<Self, RosterError> {
        match normalize_label(label).as_str() {
            "uop" | "umowaoprace" | "employment" => Ok(ContractType::Employment),
            "b2b" | "kontrakt" => Ok(ContractType::B2b),
            "zlecenie" | "umowazlecenie" | "uz" | "mandate" => Ok(ContractType::Mandate),
            _ => Err(RosterError::UnknownContractType(label.to_string())),
        }
    }

    /// Only B2B and MANDATE are subject to the weekly 48-hour cap.
    pub fn subject_to_weekly_cap(self) -> bool {
        matches!(self, ContractType::B2b | ContractType::Mandate)
    }
}

/// Shared domain for employee skills and shift modalities: `MR`/`TK` are
/// imaging modalities, `ZDO` is the nurse-specific qualification, and `ALL`
/// marks a radiographer qualified for both MR and TK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modality {
    Mr,
    Tk,
    Zdo,
    All,
}

fn normalize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .filter_map(|c| match c.to_ascii_lowercase() {
            'ę' => Some('e'),
            'ą' => Some('a'),
            'ł' => Some('l'),
            'ń' => Some('n'),
            'ó' => Some('o'),
            'ś' => Some('s'),
            'ź' | 'ż' => Some('z'),
            c if c.is_whitespace() || c == '-' || c == '_' => None,
            c => Some(c),
        })
        .collect()
}

/// An explicit monthly target, or the `AUTO` sentinel meaning "compute from
/// `fraction × workdays × 7.5833`".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetHours {
    Fixed(f64),
    Auto,
}

/// A person eligible for scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub position: String,
    pub group: Group,
    pub contract_type: ContractType,
    pub employment_fraction: Option<f64>,
    pub may_work_24h: bool,
    pub weekday_only: bool,
    pub skills: HashSet<Modality>,
    pub min_hours: Option<f64>,
    pub max_hours: Option<f64>,
    pub target_hours: Option<TargetHours>,
    pub accounting_period_months: u32,
}

impl Employee {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: impl Into<String>,
        group: Group,
        contract_type: ContractType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: position.into(),
            group,
            contract_type,
            employment_fraction: None,
            may_work_24h: false,
            weekday_only: false,
            skills: HashSet::new(),
            min_hours: None,
            max_hours: None,
            target_hours: None,
            accounting_period_months: 1,
        }
    }

    pub fn with_employment_fraction(mut self, fraction: f64) -> Self {
        self.employment_fraction = Some(fraction);
        self
    }

    pub fn with_may_work_24h(mut self, value: bool) -> Self {
        self.may_work_24h = value;
        self
    }

    pub fn with_weekday_only(mut self, value: bool) -> Self {
        self.weekday_only = value;
        self
    }

    pub fn with_skill(mut self, skill: Modality) -> Self {
        self.skills.insert(skill);
        self
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = Modality>) -> Self {
        self.skills.extend(skills);
        self
    }

    /// Derives skills the way the source ingestion layer does from raw
    /// MR/TK boolean flags, for callers building an `Employee` from a
    /// flag-shaped source rather than an explicit skill set: nurses always
    /// get `ZDO`; radiographers get `MR` and/or `TK`, plus `ALL` when both
    /// are present.
    pub fn with_derived_skills(mut self, mr: bool, tk: bool) -> Self {
        match self.group {
            Group::Nurse => {
                self.skills.insert(Modality::Zdo);
            }
            Group::Radiographer => {
                if mr {
                    self.skills.insert(Modality::Mr);
                }
                if tk {
                    self.skills.insert(Modality::Tk);
                }
                if mr && tk {
                    self.skills.insert(Modality::All);
                }
            }
        }
        self
    }

    pub fn with_min_hours(mut self, hours: f64) -> Self {
        self.min_hours = Some(hours);
        self
    }

    pub fn with_max_hours(mut self, hours: f64) -> Self {
        self.max_hours = Some(hours);
        self
    }

    pub fn with_target_hours(mut self, target: TargetHours) -> Self {
        self.target_hours = Some(target);
        self
    }

    pub fn with_accounting_period_months(mut self, months: u32) -> Self {
        self.accounting_period_months = months;
        self
    }

    /// Validates the §3 invariants. Called once by the demand/solver driver
    /// before a record is used; construction itself never fails.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.contract_type == ContractType::Employment && self.employment_fraction.is_none() {
            return Err(RosterError::InvalidEmployee {
                id: self.id.clone(),
                reason: "EMPLOYMENT contract requires an employment_fraction".to_string(),
            });
        }
        if let Some(fraction) = self.employment_fraction {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(RosterError::InvalidEmployee {
                    id: self.id.clone(),
                    reason: format!("employment_fraction {fraction} is not in (0, 1]"),
                });
            }
        }
        if self.group == Group::Radiographer
            && !(self.skills.contains(&Modality::Mr) || self.skills.contains(&Modality::Tk))
        {
            return Err(RosterError::InvalidEmployee {
                id: self.id.clone(),
                reason: "RADIOGRAPHER must hold at least one of MR or TK".to_string(),
            });
        }
        if self.target_hours == Some(TargetHours::Auto)
            && !(self.contract_type == ContractType::Employment
                && self.employment_fraction.is_some())
        {
            return Err(RosterError::InvalidEmployee {
                id: self.id.clone(),
                reason: "AUTO target requires EMPLOYMENT contract with an employment_fraction"
                    .to_string(),
            });
        }
        if self.accounting_period_months == 0 {
            return Err(RosterError::InvalidEmployee {
                id: self.id.clone(),
                reason: "accounting_period_months must be >= 1".to_string(),
            });
        }
        Ok(())
    }
}

/// A catalog entry for a kind of shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftType {
    pub code: String,
    pub group: Group,
    pub modality: Modality,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_hours: f64,
    pub is_24h: bool,
}

impl ShiftType {
    pub fn new(
        code: impl Into<String>,
        group: Group,
        modality: Modality,
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration_hours: f64,
        is_24h: bool,
    ) -> Self {
        Self {
            code: code.into(),
            group,
            modality,
            start_time,
            end_time,
            duration_hours,
            is_24h,
        }
    }

    pub fn validate(&self) -> Result<(), RosterError> {
        if self.duration_hours <= 0.0 {
            return Err(RosterError::InvalidShift {
                code: self.code.clone(),
                reason: format!("duration_hours {} must be positive", self.duration_hours),
            });
        }
        Ok(())
    }

    /// True if this shift crosses midnight: `end_time <= start_time` and
    /// it isn't the 24h shift (which uses equal start/end to mean "the
    /// full day starting at `start_time`", not "ends immediately").
    pub fn is_night(&self) -> bool {
        !self.is_24h && self.end_time <= self.start_time
    }

    /// Rounds `duration_hours` to the nearest minute, the integer unit all
    /// objective arithmetic is done in (SPEC_FULL.md §9).
    pub fn duration_minutes(&self) -> i64 {
        (self.duration_hours * 60.0).round() as i64
    }
}

/// An ordered, unique-keyed collection of shift types.
///
/// A plain `HashMap<String, ShiftType>` can't preserve catalog insertion
/// order, which several callers (the demand builder, the decision-variable
/// allocator) rely on for reproducible output (SPEC_FULL.md §7). This wraps
/// a `Vec` with a derived code index instead.
#[derive(Debug, Clone, Default)]
pub struct ShiftCatalog {
    shifts: Vec<ShiftType>,
    index: HashMap<String, usize>,
}

impl ShiftCatalog {
    /// Builds a catalog from `shifts` in the given order. Rejects duplicate
    /// codes rather than silently keeping the last one.
    pub fn new(shifts: Vec<ShiftType>) -> Result<Self, RosterError> {
        let mut index = HashMap::with_capacity(shifts.len());
        for (i, shift) in shifts.iter().enumerate() {
            if index.insert(shift.code.clone(), i).is_some() {
                return Err(RosterError::CatalogShape(format!(
                    "duplicate shift code '{}'",
                    shift.code
                )));
            }
        }
        Ok(Self { shifts, index })
    }

    pub fn get(&self, code: &str) -> Option<&ShiftType> {
        self.index.get(code).map(|&i| &self.shifts[i])
    }

    /// Shifts in catalog (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &ShiftType> {
        self.shifts.iter()
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }
}

/// A per-day minimum/target staffing line produced by the demand builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub date: NaiveDate,
    pub shift_code: String,
    pub min_staff: u32,
    pub target_staff: u32,
    pub required_modality: Modality,
    pub group: Group,
}

/// An immutable day/shift/employee assignment produced by a feasible solve.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    pub date: NaiveDate,
    pub shift_code: String,
    pub employee_id: String,
    pub name: String,
}

/// Objective weights and reporting tolerances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub w_max_hours: i64,
    pub w_min_hours: i64,
    pub w_target_hours: i64,
    pub w_weekly_48h: i64,
    pub w_balance: i64,
    /// Tolerance bands for adapter-side reporting; not consulted by the
    /// core's constraint/objective builders.
    pub tolerances: HashMap<String, f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            w_max_hours: 1000,
            w_min_hours: 500,
            w_target_hours: 100,
            w_weekly_48h: 500,
            w_balance: 50,
            tolerances: HashMap::new(),
        }
    }
}
