//! `solve_schedule`: the one entry point. Builds the CP model from a month's
//! employees, shift catalog and demand lines, hands it to the solver, and
//! turns the result into assignments or a coverage-shortage diagnostic.
//!
//! Grounded on `solver.py::solve_schedule` in the original source for the
//! control flow (collect days, build variables, add hard constraints, add
//! the soft objective, solve, interpret status, extract or diagnose).

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use selen::prelude::*;

use crate::domain::{Assignment, Demand, Employee, Settings, ShiftCatalog};
use crate::eligibility::eligible;
use crate::error::RosterError;
use crate::{hard, soft};

/// The outcome of a solve attempt. Infeasibility is a normal result, not an
/// error — see `crate::error`.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub feasible: bool,
    pub assignments: Vec<Assignment>,
    /// Present only when infeasible: a human-readable coverage diagnosis.
    pub report: Option<String>,
}

fn collect_days(demands: &[Demand]) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = demands.iter().map(|d| d.date).collect::<HashSet<_>>().into_iter().collect();
    days.sort();
    days
}

fn candidate_counts(
    demands: &[Demand],
    employees: &[Employee],
    shifts: &ShiftCatalog,
) -> HashMap<(NaiveDate, String), usize> {
    let mut counts = HashMap::new();
    for demand in demands {
        let Some(shift) = shifts.get(&demand.shift_code) else {
            continue;
        };
        let count = employees.iter().filter(|e| eligible(e, shift)).count();
        counts.insert((demand.date, demand.shift_code.clone()), count);
    }
    counts
}

fn coverage_shortage_report(
    demands: &[Demand],
    employees: &[Employee],
    shifts: &ShiftCatalog,
) -> String {
    let counts = candidate_counts(demands, employees, shifts);
    let mut shortage: Vec<(NaiveDate, String)> = Vec::new();
    for demand in demands {
        let available = counts.get(&(demand.date, demand.shift_code.clone())).copied().unwrap_or(0);
        if available < demand.min_staff as usize {
            shortage.push((
                demand.date,
                format!("{}: {available}/{}", demand.shift_code, demand.min_staff),
            ));
        }
    }
    if shortage.is_empty() {
        return "model infeasible: no detailed coverage shortage found".to_string();
    }
    shortage.sort();
    let mut by_day: HashMap<NaiveDate, Vec<String>> = HashMap::new();
    for (day, line) in shortage {
        by_day.entry(day).or_default().push(line);
    }
    let mut days: Vec<&NaiveDate> = by_day.keys().collect();
    days.sort();
    let mut lines = vec!["no eligible candidates for the following demand lines:".to_string()];
    for day in days {
        lines.push(format!("- {day}: {}", by_day[day].join(", ")));
    }
    lines.join("\n")
}

/// Solves one month's roster.
///
/// `settings` defaults when `None`. Returns an error only for malformed
/// inputs (see `RosterError`); a model the backend cannot satisfy comes
/// back as `SolveResult { feasible: false, .. }`.
#[tracing::instrument(skip(employees, shifts, demands, settings), fields(demands = demands.len(), employees = employees.len()))]
pub fn solve_schedule(
    employees: &[Employee],
    shifts: &ShiftCatalog,
    demands: &[Demand],
    settings: Option<&Settings>,
) -> Result<SolveResult, RosterError> {
    for employee in employees {
        employee.validate()?;
    }

    if demands.is_empty() {
        tracing::debug!("no demand lines, trivially feasible");
        return Ok(SolveResult { feasible: true, assignments: Vec::new(), report: None });
    }

    let default_settings = Settings::default();
    let settings = settings.unwrap_or(&default_settings);

    let days = collect_days(demands);
    let mut model = Model::default();
    let vars = hard::build_decision_vars(&mut model, employees, &days, shifts);
    tracing::debug!(variables = vars.len(), "decision variables allocated");

    hard::add_hard_constraints(&mut model, employees, &days, shifts, demands, &vars);
    tracing::debug!(
        families = "coverage, one_shift_per_day, rest, max_consecutive_days",
        "hard constraint families posted"
    );

    let objective = soft::add_soft_objective(&mut model, employees, &days, shifts, &vars, settings);
    tracing::debug!(has_objective = objective.is_some(), days = days.len(), "model built, invoking solver");

    // The backend's `solve`/`minimize` return a single undifferentiated
    // error on failure (its only available usage example collapses every
    // `Err` into "no solution found"), so a rejected model and a genuinely
    // infeasible roster aren't distinguishable here; both are reported as
    // infeasibility.
    let solution = match objective {
        Some(obj) => model.minimize(obj),
        None => model.solve(),
    };

    let solution = match solution {
        Ok(solution) => solution,
        Err(_) => {
            tracing::info!("solver reported infeasible");
            let report = coverage_shortage_report(demands, employees, shifts);
            return Ok(SolveResult { feasible: false, assignments: Vec::new(), report: Some(report) });
        }
    };

    let day_index: HashMap<NaiveDate, usize> =
        days.iter().enumerate().map(|(idx, &day)| (day, idx)).collect();

    let mut assignments = Vec::new();
    for demand in demands {
        let d_idx = day_index[&demand.date];
        for (e_idx, employee) in employees.iter().enumerate() {
            let Some(var) = vars.get(e_idx, d_idx, &demand.shift_code) else {
                continue;
            };
            if solution.get::<i32>(var) == 1 {
                assignments.push(Assignment {
                    date: demand.date,
                    shift_code: demand.shift_code.clone(),
                    employee_id: employee.id.clone(),
                    name: employee.name.clone(),
                });
            }
        }
    }
    assignments.sort();

    tracing::info!(assignments = assignments.len(), "solve complete");
    Ok(SolveResult { feasible: true, assignments, report: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContractType, Group, Modality, ShiftType};
    use chrono::NaiveTime;

    fn shift(code: &str, group: Group, modality: Modality, start: u32, end: u32, hours: f64) -> ShiftType {
        ShiftType::new(
            code,
            group,
            modality,
            NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
            hours,
            false,
        )
    }

    #[test]
    fn no_demands_is_trivially_feasible() {
        let employees = vec![];
        let shifts = ShiftCatalog::new(vec![]).unwrap();
        let result = solve_schedule(&employees, &shifts, &[], None).unwrap();
        assert!(result.feasible);
        assert!(result.assignments.is_empty());
    }

    #[test]
    fn single_day_single_shift_single_eligible_employee_is_covered() {
        let shifts = ShiftCatalog::new(vec![shift("D", Group::Radiographer, Modality::Mr, 7, 15, 8.0)]).unwrap();
        let employee = Employee::new("1", "A", "", Group::Radiographer, ContractType::B2b)
            .with_skill(Modality::Mr);
        let demands = vec![Demand {
            date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            shift_code: "D".to_string(),
            min_staff: 1,
            target_staff: 1,
            required_modality: Modality::Mr,
            group: Group::Radiographer,
        }];
        let result = solve_schedule(&[employee], &shifts, &demands, None).unwrap();
        assert!(result.feasible);
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].employee_id, "1");
    }

    #[test]
    fn unmet_coverage_with_no_eligible_employee_is_infeasible() {
        let shifts = ShiftCatalog::new(vec![shift("D", Group::Radiographer, Modality::Mr, 7, 15, 8.0)]).unwrap();
        let nurse = Employee::new("1", "A", "", Group::Nurse, ContractType::B2b).with_derived_skills(false, false);
        let demands = vec![Demand {
            date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            shift_code: "D".to_string(),
            min_staff: 1,
            target_staff: 1,
            required_modality: Modality::Mr,
            group: Group::Radiographer,
        }];
        let result = solve_schedule(&[nurse], &shifts, &demands, None).unwrap();
        assert!(!result.feasible);
        assert!(result.report.is_some());
    }
}
