//! Core types and data structures for the revenue reconciliation system

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A point-of-sale order as delivered by the upstream sync process.
///
/// Orders are read-only inputs: they are created exclusively by the ingestion
/// pipeline and never mutated by this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier assigned by the point-of-sale system
    pub guid: String,
    /// Business date in the raw store's `YYYYMMDD` integer convention.
    /// This is an end-of-day accounting label, not an instant, and may
    /// differ from the wall-clock date of `created_date` near midnight.
    pub business_date: i32,
    /// When the order was created (wall-clock instant)
    pub created_date: DateTime<Utc>,
}

/// A payable check within an order.
///
/// Check guids are unique system-wide, but the source feed can deliver
/// duplicate rows for the same guid (sync artifacts). All amounts are in
/// dollars; any feed that delivers minor units must be declared via
/// [`AmountUnit::Cents`](crate::engine::AmountUnit) so the conversion
/// happens exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// Unique identifier for the check
    pub guid: String,
    /// Guid of the owning order (reference, not ownership)
    pub order_guid: String,
    /// Total amount of the check in dollars
    pub total_amount: BigDecimal,
    /// Tax portion of the total, when the feed provides it
    pub tax_amount: Option<BigDecimal>,
    /// Tip portion of the total, when the feed provides it
    pub tip_amount: Option<BigDecimal>,
    /// Whether the check was voided after creation
    pub voided: bool,
    /// When the check was created (wall-clock instant)
    pub created_date: DateTime<Utc>,
    /// When the check was closed, if it has been
    pub closed_date: Option<DateTime<Utc>>,
}

/// A manually-reconciled or previously-verified daily revenue figure.
///
/// Where an override exists for a date it is authoritative: the engine
/// returns its values directly and does not recompute from raw records.
/// Overrides are produced by a separate correction workflow and are
/// read-only inputs here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueOverride {
    /// Calendar date the override applies to (unique key)
    pub date: NaiveDate,
    /// Verified revenue for the date in dollars
    pub actual_revenue: BigDecimal,
    /// Verified number of non-voided checks for the date
    pub check_count: u32,
    /// Free-text provenance note (who or what produced the figure)
    pub notes: Option<String>,
    /// When the override row was created
    pub created_at: DateTime<Utc>,
}

/// Which store a daily summary was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummarySource {
    /// Taken directly from the override ledger
    Override,
    /// Recomputed from raw order and check records
    Raw,
}

/// Revenue summary for a single business date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Business date the summary covers
    pub date: NaiveDate,
    /// Sum of non-voided check totals in dollars
    pub total_revenue: BigDecimal,
    /// Number of non-voided checks
    pub check_count: u32,
    /// Sum of voided check totals, tracked separately for audit visibility
    pub voided_revenue: BigDecimal,
    /// Number of voided checks
    pub voided_count: u32,
    /// Whether any order exists for the date at all. `false` signals a
    /// missing sync; `true` with zero revenue signals a legitimately
    /// quiet day (venue closed, no sales).
    pub has_data: bool,
    /// Which store served the figures
    pub source: SummarySource,
}

impl DailySummary {
    /// Summary for a date with no underlying orders (missing sync)
    pub fn missing(date: NaiveDate) -> Self {
        Self {
            date,
            total_revenue: BigDecimal::from(0),
            check_count: 0,
            voided_revenue: BigDecimal::from(0),
            voided_count: 0,
            has_data: false,
            source: SummarySource::Raw,
        }
    }

    /// Summary taken verbatim from an override row
    pub fn from_override(row: &RevenueOverride) -> Self {
        Self {
            date: row.date,
            total_revenue: row.actual_revenue.clone(),
            check_count: row.check_count,
            voided_revenue: BigDecimal::from(0),
            voided_count: 0,
            has_data: true,
            source: SummarySource::Override,
        }
    }
}

/// A date whose summary could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedDate {
    /// The date that failed
    pub date: NaiveDate,
    /// Human-readable failure reason
    pub reason: String,
}

/// Aggregate revenue summary for a closed date interval.
///
/// `daily` holds one entry per date that resolved, in date order. Dates
/// that failed (store unreachable, timeout, cancellation) are enumerated
/// in `failed` and excluded from every total, so a caller can retry
/// exactly the dates that need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    /// First date of the interval (inclusive)
    pub start: NaiveDate,
    /// Last date of the interval (inclusive)
    pub end: NaiveDate,
    /// Per-date summaries in date order, failed dates omitted
    pub daily: Vec<DailySummary>,
    /// Sum of daily non-voided revenue across the interval
    pub total_revenue: BigDecimal,
    /// Sum of daily non-voided check counts across the interval
    pub total_checks: u32,
    /// Number of dates with at least one order or an override
    pub days_with_data: u32,
    /// Number of dates with no underlying records at all
    pub days_missing: u32,
    /// Dates whose lookups failed, with reasons
    pub failed: Vec<FailedDate>,
}

impl RangeSummary {
    /// Average non-voided check amount across the interval, zero when
    /// there are no checks.
    pub fn average_check(&self) -> BigDecimal {
        if self.total_checks == 0 {
            BigDecimal::from(0)
        } else {
            &self.total_revenue / BigDecimal::from(self.total_checks)
        }
    }
}

/// Errors that can occur during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The override store or raw store could not be reached, or a
    /// per-date query exceeded its timeout budget. Transient and scoped
    /// to a single date where possible; callers may retry.
    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),
    /// Start after end, or input that does not name a calendar date.
    /// Rejected before any query is issued.
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    /// Reserved for detection of mixed cents/dollars input. The dollar
    /// convention is currently a documented assumption, not an enforced
    /// check; see [`AmountUnit`](crate::engine::AmountUnit).
    #[error("Ambiguous amount unit: {0}")]
    AmbiguousUnit(String),
    /// The caller cancelled the operation before this date's query was
    /// issued. Partial results collected before cancellation remain valid.
    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;
