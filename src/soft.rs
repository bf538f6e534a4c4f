//! The soft-constraint objective: monthly min/max/target-hour penalties,
//! the B2B/MANDATE weekly 48h cap, and group balance penalties.
//!
//! Grounded on `constraints_soft.py` in the original source for the exact
//! formulas. The original's `model.add_abs_equality` / `add_max_equality`
//! calls are deliberately not replicated here — each is re-expressed as an
//! auxiliary non-negative variable plus one or two linear inequalities, as
//! a general-purpose CSP/ILP solver gives us `>=`/`<=`/`==` but no
//! dedicated abs/max primitive.
//!
//! Linear-expression support assumed of `selen::Model` beyond the single
//! confirmed usage pattern (`m.c(var).cmp(int(n))`): `VarId` supports
//! `+`, and `-`/`*` against an `i32` constant, producing an expression
//! that `m.c(...)` and `.eq`/`.le`/`.ge` accept on either side, alongside
//! a bare `VarId`. This is the ordinary way linear constraint builders
//! read in this family of solver.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use selen::prelude::*;

use crate::calendar;
use crate::domain::{ContractType, Employee, Group, Settings, ShiftCatalog, ShiftType, TargetHours};
use crate::hard::DecisionVars;

const UOP_DAILY_HOURS: f64 = 7.5833;
const WEEKLY_LIMIT_MINUTES: i64 = 48 * 60;

fn minutes_from_hours(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

/// Clamps a non-negative `i64` bound into `selen`'s `i32` domain range
/// instead of truncating: a large roster's aggregate objective bound can
/// exceed `i32::MAX` well before every penalty term is summed in, and an
/// `as i32` cast there would silently wrap into a corrupted (possibly
/// negative) upper bound.
fn clamp_bound(bound: i64) -> i32 {
    bound.clamp(0, i32::MAX as i64) as i32
}

/// Builds `total = sum(coeff_i * var_i)` as one equality constraint against
/// a fresh aggregate variable, matching the original's `model.add(total ==
/// sum(...))` pattern rather than materializing one variable per term.
fn weighted_sum_var(m: &mut Model, terms: &[(VarId, i64)], bound: i64) -> VarId {
    let total = m.int(0, clamp_bound(bound));
    let Some(((first_var, first_coeff), rest)) = terms.split_first() else {
        m.c(total).eq(int(0));
        return total;
    };
    let mut expr = *first_var * (*first_coeff as i32);
    for (var, coeff) in rest {
        expr = expr + (*var * (*coeff as i32));
    }
    m.c(total).eq(expr);
    total
}

/// `target_minutes` for the monthly-target penalty, or `None` when the
/// employee has no target set (AUTO without the EMPLOYMENT+fraction
/// prerequisite already failed `Employee::validate`, so this only ever
/// sees a well-formed record).
fn target_minutes(employee: &Employee, workdays: usize) -> Option<i64> {
    match employee.target_hours {
        Some(TargetHours::Auto) => {
            let fraction = employee.employment_fraction?;
            Some(minutes_from_hours(fraction * workdays as f64 * UOP_DAILY_HOURS))
        }
        Some(TargetHours::Fixed(hours)) => Some(minutes_from_hours(hours)),
        None => None,
    }
}

struct EmployeeAggregates {
    minutes: HashMap<usize, VarId>,
    metric_counts: HashMap<(usize, &'static str), VarId>,
}

const BALANCE_METRICS: [&str; 3] = ["night", "weekend", "shift_24h"];

fn metric_matches(metric: &str, shift: &ShiftType, day: NaiveDate) -> bool {
    match metric {
        "night" => shift.is_night(),
        "weekend" => calendar::is_weekend(day) || calendar::is_holiday(day),
        "shift_24h" => shift.is_24h,
        _ => unreachable!("closed metric set"),
    }
}

/// Builds the per-employee minute totals and per-(employee, metric) balance
/// counts used by both the monthly penalties and the group balance penalty.
fn build_aggregates(
    m: &mut Model,
    employees: &[Employee],
    days: &[NaiveDate],
    shifts: &ShiftCatalog,
    vars: &DecisionVars,
    total_max_minutes: i64,
) -> EmployeeAggregates {
    let mut minutes = HashMap::new();
    let mut metric_counts = HashMap::new();

    for (e_idx, employee) in employees.iter().enumerate() {
        let minute_terms: Vec<(VarId, i64)> = days
            .iter()
            .enumerate()
            .flat_map(|(d_idx, _)| {
                shifts.iter().filter_map(move |shift| {
                    vars.get(e_idx, d_idx, &shift.code)
                        .map(|v| (v, shift.duration_minutes()))
                })
            })
            .collect();
        let total = weighted_sum_var(m, &minute_terms, total_max_minutes);
        minutes.insert(e_idx, total);

        for metric in BALANCE_METRICS {
            let terms: Vec<(VarId, i64)> = days
                .iter()
                .enumerate()
                .flat_map(|(d_idx, &day)| {
                    shifts.iter().filter_map(move |shift| {
                        if shift.group != employee.group || !metric_matches(metric, shift, day) {
                            return None;
                        }
                        vars.get(e_idx, d_idx, &shift.code).map(|v| (v, 1))
                    })
                })
                .collect();
            let count = weighted_sum_var(m, &terms, days.len() as i64);
            metric_counts.insert((e_idx, metric), count);
        }
    }

    EmployeeAggregates { minutes, metric_counts }
}

fn add_monthly_penalties(
    m: &mut Model,
    employees: &[Employee],
    aggregates: &EmployeeAggregates,
    workdays: usize,
    total_max_minutes: i64,
    settings: &Settings,
    objective_terms: &mut Vec<(VarId, i64, i64)>,
) {
    for (e_idx, employee) in employees.iter().enumerate() {
        let total_minutes = aggregates.minutes[&e_idx];

        if let Some(max_hours) = employee.max_hours {
            let threshold = minutes_from_hours(max_hours);
            let excess = m.int(0, clamp_bound(total_max_minutes));
            m.c(excess).ge(total_minutes - threshold as i32);
            objective_terms.push((excess, settings.w_max_hours, total_max_minutes));
        }

        if let Some(min_hours) = employee.min_hours {
            let threshold = minutes_from_hours(min_hours);
            let shortage = m.int(0, clamp_bound(total_max_minutes));
            // shortage >= threshold - total  <=>  shortage + total >= threshold
            m.c(shortage + total_minutes).ge(int(threshold as i32));
            objective_terms.push((shortage, settings.w_min_hours, total_max_minutes));
        }

        if let Some(target) = target_minutes(employee, workdays) {
            let deviation = m.int(0, clamp_bound(total_max_minutes));
            m.c(deviation).ge(total_minutes - target as i32);
            m.c(deviation + total_minutes).ge(int(target as i32));
            objective_terms.push((deviation, settings.w_target_hours, total_max_minutes));
        }
    }
}

fn add_weekly_cap_penalties(
    m: &mut Model,
    employees: &[Employee],
    days: &[NaiveDate],
    shifts: &ShiftCatalog,
    vars: &DecisionVars,
    settings: &Settings,
    objective_terms: &mut Vec<(VarId, i64, i64)>,
) {
    let mut weeks: HashMap<(i32, u32), Vec<usize>> = HashMap::new();
    for (d_idx, day) in days.iter().enumerate() {
        let iso = day.iso_week();
        weeks.entry((iso.year(), iso.week())).or_default().push(d_idx);
    }

    let max_shift_minutes = shifts.iter().map(|s| s.duration_minutes()).max().unwrap_or(0);

    for (e_idx, employee) in employees.iter().enumerate() {
        if !employee.contract_type.subject_to_weekly_cap() {
            continue;
        }
        for week_days in weeks.values() {
            let terms: Vec<(VarId, i64)> = week_days
                .iter()
                .flat_map(|&d_idx| {
                    shifts.iter().filter_map(move |shift| {
                        vars.get(e_idx, d_idx, &shift.code).map(|v| (v, shift.duration_minutes()))
                    })
                })
                .collect();
            if terms.is_empty() {
                continue;
            }
            // Bounded by this week's own day count, not the whole month's —
            // a week can never carry more minutes than its own days allow.
            let max_week_minutes = week_days.len() as i64 * max_shift_minutes;
            let week_minutes = weighted_sum_var(m, &terms, max_week_minutes);
            let excess = m.int(0, clamp_bound(max_week_minutes));
            m.c(excess).ge(week_minutes - WEEKLY_LIMIT_MINUTES as i32);
            objective_terms.push((excess, settings.w_weekly_48h, max_week_minutes));
        }
    }
}

fn add_balance_penalties(
    m: &mut Model,
    employees: &[Employee],
    aggregates: &EmployeeAggregates,
    days_len: usize,
    settings: &Settings,
    objective_terms: &mut Vec<(VarId, i64, i64)>,
) {
    if employees.is_empty() {
        return;
    }
    let mut group_members: HashMap<Group, Vec<usize>> = HashMap::new();
    for (idx, employee) in employees.iter().enumerate() {
        group_members.entry(employee.group).or_default().push(idx);
    }

    for members in group_members.values() {
        let group_size = members.len() as i64;
        let total_max = members.len() as i64 * days_len as i64;

        for metric in BALANCE_METRICS {
            let count_terms: Vec<(VarId, i64)> =
                members.iter().map(|&idx| (aggregates.metric_counts[&(idx, metric)], 1)).collect();
            let total_var = weighted_sum_var(m, &count_terms, total_max);

            for &idx in members {
                let count_var = aggregates.metric_counts[&(idx, metric)];
                let dev_bound = total_max * group_size;
                let dev = m.int(0, clamp_bound(dev_bound));
                // dev >= count*G - total
                m.c(dev + total_var).ge(count_var * group_size as i32);
                // dev >= total - count*G
                m.c(dev + (count_var * group_size as i32)).ge(total_var);
                objective_terms.push((dev, settings.w_balance, dev_bound));
            }
        }
    }
}

/// Builds the full soft objective and, if any penalty terms exist, posts a
/// `minimize` call against `m`. Returns the aggregate objective variable
/// when one was created, matching `solve.py`'s "only call `model.minimize`
/// when `penalty_terms` is non-empty" guard.
pub fn add_soft_objective(
    m: &mut Model,
    employees: &[Employee],
    days: &[NaiveDate],
    shifts: &ShiftCatalog,
    vars: &DecisionVars,
    settings: &Settings,
) -> Option<VarId> {
    let max_shift_minutes = shifts.iter().map(|s| s.duration_minutes()).max().unwrap_or(0);
    let total_max_minutes = days.len() as i64 * max_shift_minutes;
    let workdays = calendar::workdays(days);

    let aggregates = build_aggregates(m, employees, days, shifts, vars, total_max_minutes);

    let mut objective_terms: Vec<(VarId, i64, i64)> = Vec::new();
    add_monthly_penalties(
        m,
        employees,
        &aggregates,
        workdays,
        total_max_minutes,
        settings,
        &mut objective_terms,
    );
    add_weekly_cap_penalties(m, employees, days, shifts, vars, settings, &mut objective_terms);
    add_balance_penalties(m, employees, &aggregates, days.len(), settings, &mut objective_terms);

    if objective_terms.is_empty() {
        return None;
    }

    let bound: i64 = objective_terms.iter().map(|(_, weight, aux_bound)| weight * aux_bound).sum();
    let weighted: Vec<(VarId, i64)> =
        objective_terms.into_iter().map(|(var, weight, _)| (var, weight)).collect();
    Some(weighted_sum_var(m, &weighted, bound))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContractType, Group};

    #[test]
    fn clamp_bound_passes_through_small_values() {
        assert_eq!(clamp_bound(0), 0);
        assert_eq!(clamp_bound(4550), 4550);
    }

    #[test]
    fn clamp_bound_saturates_instead_of_wrapping() {
        // The reported failure case: ~3.23 billion, already past i32::MAX,
        // before every penalty term across a large roster is even summed in.
        let huge = 3_230_000_000_i64;
        assert_eq!(clamp_bound(huge), i32::MAX);
        assert_eq!(clamp_bound(i64::MAX), i32::MAX);
        assert_eq!(clamp_bound(-5), 0);
    }

    #[test]
    fn target_minutes_none_when_employee_has_no_target() {
        let employee = Employee::new("1", "A", "", Group::Nurse, ContractType::B2b)
            .with_derived_skills(false, false);
        assert_eq!(target_minutes(&employee, 20), None);
    }

    #[test]
    fn target_minutes_fixed_ignores_workdays() {
        let employee = Employee::new("1", "A", "", Group::Nurse, ContractType::B2b)
            .with_derived_skills(false, false)
            .with_target_hours(TargetHours::Fixed(80.0));
        assert_eq!(target_minutes(&employee, 5), Some(4800));
    }

    #[test]
    fn target_minutes_auto_uses_fraction_times_workdays_times_daily_hours() {
        let employee = Employee::new("1", "A", "", Group::Nurse, ContractType::Employment)
            .with_employment_fraction(0.5)
            .with_derived_skills(false, false)
            .with_target_hours(TargetHours::Auto);
        // 0.5 * 20 * 7.5833 * 60 = 4549.98 -> rounds to 4550.
        assert_eq!(target_minutes(&employee, 20), Some(4550));
    }

    #[test]
    fn target_minutes_auto_without_fraction_is_none() {
        let employee = Employee::new("1", "A", "", Group::Nurse, ContractType::B2b)
            .with_derived_skills(false, false)
            .with_target_hours(TargetHours::Auto);
        assert_eq!(target_minutes(&employee, 20), None);
    }

    #[test]
    fn weighted_sum_var_with_no_terms_is_fixed_at_zero() {
        let mut m = Model::default();
        let total = weighted_sum_var(&mut m, &[], 100);
        let solution = m.solve().expect("trivial model is feasible");
        assert_eq!(solution.get::<i32>(total), 0);
    }

    #[test]
    fn weighted_sum_var_matches_hand_computed_total() {
        let mut m = Model::default();
        let a = m.int(0, 1);
        let b = m.int(0, 1);
        m.c(a).eq(int(1));
        m.c(b).eq(int(0));
        let total = weighted_sum_var(&mut m, &[(a, 3), (b, 5)], 8);
        let solution = m.solve().expect("fixed inputs are feasible");
        assert_eq!(solution.get::<i32>(total), 3);
    }

    /// `excess >= x - threshold` linearizes `max(0, x - threshold)`: with
    /// `x` fixed above the threshold the minimized excess equals the exact
    /// overage, not some looser value the non-negativity bound alone allows.
    #[test]
    fn max_with_zero_linearization_hits_the_exact_overage_at_the_optimum() {
        let mut m = Model::default();
        let x = m.int(0, 20);
        m.c(x).eq(int(12));
        let threshold = 5;
        let excess = m.int(0, 20);
        m.c(excess).ge(x - threshold);
        let solution = m.minimize(excess).expect("feasible model");
        assert_eq!(solution.get::<i32>(excess), 7);
    }

    /// The two-inequality pattern used for the target-hours penalty
    /// (`dev >= x - target`, `dev + x >= target`) linearizes `|x - target|`
    /// on both sides of the target, matching the original's abs-equality.
    #[test]
    fn absolute_deviation_linearization_handles_either_side_of_the_target() {
        let target = 7;

        let mut above = Model::default();
        let x_above = above.int(0, 20);
        above.c(x_above).eq(int(10));
        let dev_above = above.int(0, 20);
        above.c(dev_above).ge(x_above - target);
        above.c(dev_above + x_above).ge(int(target));
        let solution_above = above.minimize(dev_above).expect("feasible model");
        assert_eq!(solution_above.get::<i32>(dev_above), 3);

        let mut below = Model::default();
        let x_below = below.int(0, 20);
        below.c(x_below).eq(int(4));
        let dev_below = below.int(0, 20);
        below.c(dev_below).ge(x_below - target);
        below.c(dev_below + x_below).ge(int(target));
        let solution_below = below.minimize(dev_below).expect("feasible model");
        assert_eq!(solution_below.get::<i32>(dev_below), 3);
    }
}
