//! Demand builder: turns a month + shift catalog into per-day staffing
//! lines. Grounded on `demand.py::build_demands` in the original source.

use crate::calendar;
use crate::domain::{Demand, Group, Modality, ShiftCatalog, ShiftType};
use crate::error::RosterError;

fn find_shifts<'a>(
    shifts: &'a ShiftCatalog,
    group: Group,
    modality: Option<Modality>,
    is_24h: Option<bool>,
) -> Vec<&'a ShiftType> {
    let mut result: Vec<&ShiftType> = shifts
        .iter()
        .filter(|s| s.group == group)
        .filter(|s| modality.map_or(true, |m| s.modality == m))
        .filter(|s| is_24h.map_or(true, |flag| s.is_24h == flag))
        .collect();
    result.sort_by_key(|s| s.start_time);
    result
}

/// Builds the demand lines for `month` from `shifts`, insertion order of
/// `shifts` preserved wherever it matters for determinism.
pub fn build_demands(month: &str, shifts: &ShiftCatalog) -> Result<Vec<Demand>, RosterError> {
    let days = calendar::month_days(month)?;

    let radiographer_24h = find_shifts(shifts, Group::Radiographer, None, Some(true));
    let Some(radiographer_24h) = radiographer_24h.first() else {
        return Err(RosterError::CatalogShape(
            "no 24h shift for RADIOGRAPHER".to_string(),
        ));
    };

    let mr_day = find_shifts(shifts, Group::Radiographer, Some(Modality::Mr), Some(false));
    let Some(mr_day) = mr_day.first() else {
        return Err(RosterError::CatalogShape(
            "no daytime MR shift for RADIOGRAPHER".to_string(),
        ));
    };

    let tk_shifts = find_shifts(shifts, Group::Radiographer, Some(Modality::Tk), Some(false));
    if tk_shifts.len() < 2 {
        return Err(RosterError::CatalogShape(
            "fewer than two TK shifts (day + night) for RADIOGRAPHER".to_string(),
        ));
    }

    let nurse_shifts = find_shifts(shifts, Group::Nurse, Some(Modality::Zdo), Some(false));
    if nurse_shifts.len() < 2 {
        return Err(RosterError::CatalogShape(
            "fewer than two ZDO shifts (day + night) for NURSE".to_string(),
        ));
    }

    let tk_day = tk_shifts[0];
    let tk_night = tk_shifts[tk_shifts.len() - 1];
    let nurse_day = nurse_shifts[0];
    let nurse_night = nurse_shifts[nurse_shifts.len() - 1];

    let mut demands = Vec::new();
    for day in &days {
        let weekend_or_holiday = calendar::is_weekend(*day) || calendar::is_holiday(*day);

        if weekend_or_holiday {
            demands.push(Demand {
                date: *day,
                shift_code: radiographer_24h.code.clone(),
                min_staff: 1,
                target_staff: 1,
                required_modality: radiographer_24h.modality,
                group: radiographer_24h.group,
            });
        } else {
            for (shift, min_staff, target_staff) in
                [(*mr_day, 1, 2), (tk_day, 1, 1), (tk_night, 1, 1)]
            {
                demands.push(Demand {
                    date: *day,
                    shift_code: shift.code.clone(),
                    min_staff,
                    target_staff,
                    required_modality: shift.modality,
                    group: shift.group,
                });
            }
        }

        for shift in [nurse_day, nurse_night] {
            demands.push(Demand {
                date: *day,
                shift_code: shift.code.clone(),
                min_staff: 1,
                target_staff: 1,
                required_modality: shift.modality,
                group: shift.group,
            });
        }
    }

    Ok(demands)
}
