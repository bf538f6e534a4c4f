//! Per-employee summaries over a finished solve. Grounded on
//! `report.py::summarize_employees` in the original source.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::calendar;
use crate::domain::{Assignment, ContractType, Employee, Settings, ShiftCatalog, TargetHours};

const UOP_DAILY_HOURS: f64 = 7.5833;

/// A single employee's totals over the month being reported on.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeSummary {
    pub employee_id: String,
    pub name: String,
    pub total_hours: f64,
    pub night_count: u32,
    pub weekend_count: u32,
    pub shift_24h_count: u32,
    pub target_hours: Option<f64>,
    pub min_hours: Option<f64>,
    pub max_hours: Option<f64>,
}

/// Builds one summary per employee in `employees`, in that order.
pub fn summarize_employees(
    employees: &[Employee],
    assignments: &[Assignment],
    shifts: &ShiftCatalog,
    month_days: &[NaiveDate],
    _settings: Option<&Settings>,
) -> Vec<EmployeeSummary> {
    let workdays = calendar::workdays(month_days);

    let mut by_employee: HashMap<&str, Vec<&Assignment>> = HashMap::new();
    for assignment in assignments {
        by_employee.entry(assignment.employee_id.as_str()).or_default().push(assignment);
    }

    employees
        .iter()
        .map(|employee| {
            let mut total_hours = 0.0;
            let mut night_count = 0;
            let mut weekend_count = 0;
            let mut shift_24h_count = 0;

            for assignment in by_employee.get(employee.id.as_str()).into_iter().flatten() {
                let Some(shift) = shifts.get(&assignment.shift_code) else {
                    continue;
                };
                total_hours += shift.duration_hours;
                if shift.is_24h {
                    shift_24h_count += 1;
                }
                if shift.is_night() {
                    night_count += 1;
                }
                if calendar::is_weekend(assignment.date) || calendar::is_holiday(assignment.date) {
                    weekend_count += 1;
                }
            }

            let target_hours = match employee.target_hours {
                Some(TargetHours::Auto) => employee
                    .employment_fraction
                    .filter(|_| employee.contract_type == ContractType::Employment)
                    .map(|fraction| fraction * workdays as f64 * UOP_DAILY_HOURS),
                Some(TargetHours::Fixed(hours)) => Some(hours),
                None => None,
            };

            EmployeeSummary {
                employee_id: employee.id.clone(),
                name: employee.name.clone(),
                total_hours: (total_hours * 100.0).round() / 100.0,
                night_count,
                weekend_count,
                shift_24h_count,
                target_hours,
                min_hours: employee.min_hours,
                max_hours: employee.max_hours,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Group, Modality, ShiftType};
    use chrono::NaiveTime;

    fn shift(code: &str, group: Group, start: u32, end: u32, hours: f64, is_24h: bool) -> ShiftType {
        ShiftType::new(
            code,
            group,
            Modality::Mr,
            NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
            hours,
            is_24h,
        )
    }

    #[test]
    fn totals_accumulate_only_assigned_shifts() {
        let shifts = ShiftCatalog::new(vec![shift("D", Group::Radiographer, 7, 15, 8.0, false)]).unwrap();
        let employee = Employee::new("1", "A", "", Group::Radiographer, ContractType::B2b)
            .with_skill(Modality::Mr);
        let assignments = vec![
            Assignment {
                date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
                shift_code: "D".to_string(),
                employee_id: "1".to_string(),
                name: "A".to_string(),
            },
            Assignment {
                date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
                shift_code: "D".to_string(),
                employee_id: "1".to_string(),
                name: "A".to_string(),
            },
        ];
        let days = crate::calendar::month_days("2026-02").unwrap();
        let summaries = summarize_employees(&[employee], &assignments, &shifts, &days, None);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_hours, 16.0);
    }

    #[test]
    fn auto_target_only_applies_to_employment() {
        let shifts = ShiftCatalog::new(vec![]).unwrap();
        let employment = Employee::new("1", "A", "", Group::Nurse, ContractType::Employment)
            .with_employment_fraction(0.5)
            .with_target_hours(TargetHours::Auto)
            .with_derived_skills(false, false);
        // A non-EMPLOYMENT record carrying AUTO (only reachable by bypassing
        // `validate`, as here) must not report a computed target.
        let b2b = Employee::new("2", "B", "", Group::Nurse, ContractType::B2b)
            .with_employment_fraction(0.5)
            .with_target_hours(TargetHours::Auto)
            .with_derived_skills(false, false);
        let days = crate::calendar::month_days("2026-02").unwrap();
        let summaries = summarize_employees(&[employment, b2b], &[], &shifts, &days, None);
        assert!(summaries[0].target_hours.is_some());
        assert!(summaries[1].target_hours.is_none());
    }
}
