//! Decision-variable allocation and hard-constraint emission.
//!
//! Grounded on `constraints_hard.py` in the original source: one 0/1
//! decision variable per eligible (employee, day, shift) triple, plus the
//! four hard-constraint families (coverage, one-shift-per-day, rest,
//! max-consecutive-days) posted directly against the model.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use selen::prelude::*;

use crate::domain::{Demand, Employee, ShiftCatalog, ShiftType};
use crate::eligibility::eligible;

/// Minimum rest between the end of one shift and the start of the next.
pub const MIN_REST_HOURS: i64 = 11;
/// No employee may work more than this many days in any rolling 7-day window.
pub const MAX_CONSECUTIVE_DAYS: usize = 6;

/// The sparse `(employee, day, shift code) -> decision variable` map.
///
/// Only eligible triples get a variable at all — there is no fixed-zero
/// placeholder for ineligible combinations, so the map stays exactly as
/// large as the problem's real degrees of freedom.
#[derive(Debug, Default)]
pub struct DecisionVars {
    vars: HashMap<(usize, usize, String), VarId>,
}

impl DecisionVars {
    pub fn get(&self, e_idx: usize, d_idx: usize, shift_code: &str) -> Option<VarId> {
        self.vars.get(&(e_idx, d_idx, shift_code.to_string())).copied()
    }

    /// Number of eligible `(employee, day, shift)` triples allocated a variable.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    fn insert(&mut self, e_idx: usize, d_idx: usize, shift_code: &str, var: VarId) {
        self.vars.insert((e_idx, d_idx, shift_code.to_string()), var);
    }

    /// All variables for a given employee and day, in catalog order.
    fn for_day<'a>(&self, e_idx: usize, d_idx: usize, shifts: &'a ShiftCatalog) -> Vec<VarId> {
        shifts
            .iter()
            .filter_map(|s| self.get(e_idx, d_idx, &s.code))
            .collect()
    }
}

/// Allocates one binary variable per eligible `(employee, day, shift)` triple.
pub fn build_decision_vars(
    m: &mut Model,
    employees: &[Employee],
    days: &[NaiveDate],
    shifts: &ShiftCatalog,
) -> DecisionVars {
    let mut vars = DecisionVars::default();
    for (e_idx, employee) in employees.iter().enumerate() {
        for d_idx in 0..days.len() {
            for shift in shifts.iter() {
                if !eligible(employee, shift) {
                    continue;
                }
                let var = m.int(0, 1);
                vars.insert(e_idx, d_idx, &shift.code, var);
            }
        }
    }
    vars
}

/// Posts all four hard-constraint families against `m`.
pub fn add_hard_constraints(
    m: &mut Model,
    employees: &[Employee],
    days: &[NaiveDate],
    shifts: &ShiftCatalog,
    demands: &[Demand],
    vars: &DecisionVars,
) {
    let day_index: HashMap<NaiveDate, usize> =
        days.iter().enumerate().map(|(idx, &day)| (day, idx)).collect();

    add_min_coverage(m, demands, &day_index, employees, shifts, vars);
    add_one_shift_per_day(m, employees, days, shifts, vars);
    add_rest_constraints(m, employees, days, shifts, vars, MIN_REST_HOURS);
    add_max_consecutive_days(m, employees, days, shifts, vars, MAX_CONSECUTIVE_DAYS);
}

fn add_min_coverage(
    m: &mut Model,
    demands: &[Demand],
    day_index: &HashMap<NaiveDate, usize>,
    employees: &[Employee],
    shifts: &ShiftCatalog,
    vars: &DecisionVars,
) {
    for demand in demands {
        let d_idx = day_index[&demand.date];
        let Some(shift) = shifts.get(&demand.shift_code) else {
            continue;
        };
        let eligible_vars: Vec<VarId> = employees
            .iter()
            .enumerate()
            .filter(|(_, employee)| eligible(employee, shift))
            .filter_map(|(e_idx, _)| vars.get(e_idx, d_idx, &demand.shift_code))
            .collect();

        if eligible_vars.is_empty() {
            if demand.min_staff > 0 {
                // Nobody can ever fill this line: force infeasibility instead
                // of silently shipping an under-staffed schedule.
                let zero = m.int(0, 0);
                m.c(zero).ge(int(demand.min_staff as i32));
            }
            continue;
        }
        let covered = m.sum(&eligible_vars);
        m.c(covered).ge(int(demand.min_staff as i32));
    }
}

fn add_one_shift_per_day(
    m: &mut Model,
    employees: &[Employee],
    days: &[NaiveDate],
    shifts: &ShiftCatalog,
    vars: &DecisionVars,
) {
    for e_idx in 0..employees.len() {
        for d_idx in 0..days.len() {
            let day_vars = vars.for_day(e_idx, d_idx, shifts);
            if !day_vars.is_empty() {
                let total = m.sum(&day_vars);
                m.c(total).le(int(1));
            }
        }
    }
}

/// The instant a shift posted on `day` ends, handling overnight crossings
/// and the 24h shift's equal start/end convention.
pub fn shift_end(day: NaiveDate, shift: &ShiftType) -> chrono::NaiveDateTime {
    let start = day.and_time(shift.start_time);
    if shift.is_24h && shift.end_time == shift.start_time {
        return start + Duration::hours(24);
    }
    let mut end = day.and_time(shift.end_time);
    if shift.end_time <= shift.start_time {
        end += Duration::days(1);
    }
    end
}

fn add_rest_constraints(
    m: &mut Model,
    employees: &[Employee],
    days: &[NaiveDate],
    shifts: &ShiftCatalog,
    vars: &DecisionVars,
    min_rest_hours: i64,
) {
    if days.len() < 2 {
        return;
    }
    for e_idx in 0..employees.len() {
        for d_idx in 0..days.len() - 1 {
            let day = days[d_idx];
            let next_day = days[d_idx + 1];
            for shift_a in shifts.iter() {
                let Some(var_a) = vars.get(e_idx, d_idx, &shift_a.code) else {
                    continue;
                };
                let end_a = shift_end(day, shift_a);
                for shift_b in shifts.iter() {
                    let Some(var_b) = vars.get(e_idx, d_idx + 1, &shift_b.code) else {
                        continue;
                    };
                    let start_b = next_day.and_time(shift_b.start_time);
                    let rest_minutes = (start_b - end_a).num_minutes();
                    if rest_minutes < min_rest_hours * 60 {
                        let pair = m.sum(&[var_a, var_b]);
                        m.c(pair).le(int(1));
                    }
                }
            }
        }
    }
}

fn add_max_consecutive_days(
    m: &mut Model,
    employees: &[Employee],
    days: &[NaiveDate],
    shifts: &ShiftCatalog,
    vars: &DecisionVars,
    max_days: usize,
) {
    let window = max_days + 1;
    if days.len() < window {
        return;
    }
    for e_idx in 0..employees.len() {
        for start in 0..=(days.len() - window) {
            let mut work_vars = Vec::new();
            for d_idx in start..start + window {
                work_vars.extend(vars.for_day(e_idx, d_idx, shifts));
            }
            if !work_vars.is_empty() {
                let total = m.sum(&work_vars);
                m.c(total).le(int(max_days as i32));
            }
        }
    }
}
