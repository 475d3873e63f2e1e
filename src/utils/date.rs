use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn parse_date_arg(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// "YYYY-MM" → (year, month)
pub fn parse_month(s: &str) -> AppResult<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidMonth(s.to_string()))?;
    Ok((d.year(), d.month()))
}

/// "2025-2026" → (2025, 2026); the second year must follow the first.
pub fn parse_academic_year(s: &str) -> AppResult<(i32, i32)> {
    let err = || AppError::InvalidAcademicYear(s.to_string());

    let (a, b) = s.trim().split_once('-').ok_or_else(err)?;
    let start: i32 = a.parse().map_err(|_| err())?;
    let end: i32 = b.parse().map_err(|_| err())?;

    if end != start + 1 {
        return Err(err());
    }
    Ok((start, end))
}

pub fn month_last_day(year: i32, month: u32) -> Option<u32> {
    let first_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first_next - Duration::days(1)).day())
}

/// First and last calendar day of the month.
pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::InvalidMonth(format!("{year:04}-{month:02}"));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last_day = month_last_day(year, month).ok_or_else(invalid)?;
    let last = NaiveDate::from_ymd_opt(year, month, last_day).ok_or_else(invalid)?;
    Ok((first, last))
}

pub fn all_days_of_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let Some(mut d) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return out;
    };

    while d.month() == month {
        out.push(d);
        match d.succ_opt() {
            Some(next) => d = next,
            None => break,
        }
    }

    out
}

pub fn is_weekend(d: &NaiveDate) -> bool {
    matches!(d.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday-Friday days of the month that are not listed as holidays.
pub fn working_days(year: i32, month: u32, holidays: &[NaiveDate]) -> i64 {
    all_days_of_month(year, month)
        .iter()
        .filter(|d| !is_weekend(d) && !holidays.contains(d))
        .count() as i64
}

/// Parse a period expression into inclusive date bounds.
///
/// Supported:
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let (start_raw, end_raw) = p.split_once(':').unwrap_or((p, p));
    let start = start_raw.trim();
    let end = end_raw.trim();

    if start.len() != end.len() {
        return Err(AppError::InvalidDate(format!(
            "{p}: start and end must have the same format"
        )));
    }

    match start.len() {
        7 => {
            let (ys, ms) = parse_month(start)?;
            let (ye, me) = parse_month(end)?;
            let (from, _) = month_bounds(ys, ms)?;
            let (_, to) = month_bounds(ye, me)?;
            check_order(p, from, to)
        }
        10 => {
            let from = parse_date_arg(start)?;
            let to = parse_date_arg(end)?;
            check_order(p, from, to)
        }
        _ => Err(AppError::InvalidDate(p.to_string())),
    }
}

fn check_order(p: &str, from: NaiveDate, to: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    if from > to {
        return Err(AppError::InvalidDate(format!("{p}: start is after end")));
    }
    Ok((from, to))
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
