//! Business-date helpers
//!
//! Business dates are end-of-day accounting labels stored as `YYYYMMDD`
//! integers in the raw store. They are calendar dates, not instants, and
//! converting them must never involve a timezone offset.

use chrono::{Datelike, NaiveDate};

use crate::types::{ReconcileError, ReconcileResult};

/// Convert a calendar date to the raw store's `YYYYMMDD` integer form.
pub fn to_business_date_int(date: NaiveDate) -> i32 {
    date.year() * 10_000 + date.month() as i32 * 100 + date.day() as i32
}

/// Convert a `YYYYMMDD` integer back to a calendar date.
pub fn from_business_date_int(value: i32) -> ReconcileResult<NaiveDate> {
    let year = value / 10_000;
    let month = (value / 100 % 100) as u32;
    let day = (value % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ReconcileError::InvalidRange(format!("{value} is not a YYYYMMDD calendar date"))
    })
}

/// Every date in the inclusive `[start, end]` interval, in order.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> ReconcileResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ReconcileError::InvalidRange(format!("{year}-{month:02} is not a calendar month"))
    })?;
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let end = first_of_next.and_then(|d| d.pred_opt()).ok_or_else(|| {
        ReconcileError::InvalidRange(format!("{year}-{month:02} has no last day"))
    })?;
    Ok((start, end))
}
