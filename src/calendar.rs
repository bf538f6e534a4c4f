//! Polish calendar helpers: month expansion, weekends, and public holidays.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::RosterError;

/// Returns every date of `month` (format `"YYYY-MM"`), first to last inclusive.
pub fn month_days(month: &str) -> Result<Vec<NaiveDate>, RosterError> {
    let (year_str, month_str) = month
        .split_once('-')
        .ok_or_else(|| RosterError::InvalidMonth(month.to_string()))?;
    let year: i32 = year_str
        .parse()
        .map_err(|_| RosterError::InvalidMonth(month.to_string()))?;
    let month_num: u32 = month_str
        .parse()
        .map_err(|_| RosterError::InvalidMonth(month.to_string()))?;

    let first = NaiveDate::from_ymd_opt(year, month_num, 1)
        .ok_or_else(|| RosterError::InvalidMonth(month.to_string()))?;
    let next_month = if month_num == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month_num + 1, 1)
    }
    .ok_or_else(|| RosterError::InvalidMonth(month.to_string()))?;

    let mut days = Vec::new();
    let mut current = first;
    while current < next_month {
        days.push(current);
        current += Duration::days(1);
    }
    Ok(days)
}

/// True for Saturday or Sunday.
pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// True for a fixed or Easter-derived Polish public holiday.
pub fn is_holiday(day: NaiveDate) -> bool {
    polish_holidays(day.year()).contains(&day)
}

/// Easter Sunday via the Anonymous Gregorian (Butcher) algorithm.
fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .expect("Anonymous Gregorian algorithm always yields a valid date")
}

fn polish_holidays(year: i32) -> Vec<NaiveDate> {
    let ymd = |m: u32, d: u32| NaiveDate::from_ymd_opt(year, m, d).expect("fixed holiday date");
    let mut holidays = vec![
        ymd(1, 1),
        ymd(1, 6),
        ymd(5, 1),
        ymd(5, 3),
        ymd(8, 15),
        ymd(11, 1),
        ymd(11, 11),
        ymd(12, 25),
        ymd(12, 26),
    ];
    let easter = easter_sunday(year);
    holidays.push(easter);
    holidays.push(easter + Duration::days(1));
    holidays.push(easter + Duration::days(49));
    holidays.push(easter + Duration::days(60));
    holidays
}

/// Count of days in `days` that are neither weekend nor holiday.
pub fn workdays(days: &[NaiveDate]) -> usize {
    days.iter()
        .filter(|&&d| !is_weekend(d) && !is_holiday(d))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn february_2026_has_28_days() {
        let days = month_days("2026-02").unwrap();
        assert_eq!(days.len(), 28);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(days[27], NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    }

    #[test]
    fn december_rolls_into_next_year() {
        let days = month_days("2026-12").unwrap();
        assert_eq!(days.len(), 31);
        assert_eq!(days[30], NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }

    #[test]
    fn weekend_detection() {
        assert!(is_weekend(NaiveDate::from_ymd_opt(2026, 1, 3).unwrap())); // Saturday
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap())); // Monday
    }

    #[test]
    fn fixed_holiday_detection() {
        assert!(is_holiday(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(!is_holiday(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()));
    }

    #[test]
    fn easter_2026_matches_reference() {
        assert_eq!(easter_sunday(2026), NaiveDate::from_ymd_opt(2026, 4, 5).unwrap());
    }

    #[test]
    fn easter_derived_holidays_2026() {
        for (m, d) in [(4, 5), (4, 6), (5, 24), (6, 4)] {
            assert!(
                is_holiday(NaiveDate::from_ymd_opt(2026, m, d).unwrap()),
                "expected {m}-{d} to be a holiday"
            );
        }
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(month_days("2026-13").is_err());
        assert!(month_days("not-a-month").is_err());
    }
}
