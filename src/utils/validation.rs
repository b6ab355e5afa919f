//! Validation utilities

use chrono::NaiveDate;

use crate::types::{ReconcileError, ReconcileResult};
use crate::utils::dates;

/// Validate a closed date interval before any query is issued
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> ReconcileResult<()> {
    if start > end {
        return Err(ReconcileError::InvalidRange(format!(
            "start {start} is after end {end}"
        )));
    }
    Ok(())
}

/// Validate a raw-store `YYYYMMDD` business date integer
pub fn validate_business_date_int(value: i32) -> ReconcileResult<()> {
    dates::from_business_date_int(value).map(|_| ())
}
