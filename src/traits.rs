//! Traits for data-source abstraction

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::types::*;

/// Read-only access to the revenue data sources.
///
/// This trait is the engine's only view of the backing stores (PostgreSQL,
/// a hosted row store, an HTTP API, in-memory fixtures, etc.). All methods
/// are reads; connection lifecycle belongs to the implementor and is
/// acquired and released per call.
#[async_trait]
pub trait RevenueStore: Send + Sync {
    /// Fetch override rows whose date falls in `[start, end]` inclusive.
    async fn query_overrides(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ReconcileResult<Vec<RevenueOverride>>;

    /// Fetch orders whose business date falls in the inclusive
    /// `[business_date_start, business_date_end]` range, both in the raw
    /// store's `YYYYMMDD` integer convention. Business dates are labels,
    /// not instants; no timezone interpretation is applied.
    async fn query_orders(
        &self,
        business_date_start: i32,
        business_date_end: i32,
    ) -> ReconcileResult<Vec<Order>>;

    /// Fetch every check referencing any of the given order guids.
    ///
    /// The feed may contain duplicate rows per check guid; implementors
    /// should preserve feed order so the engine's first-seen-wins
    /// deduplication is deterministic.
    async fn query_checks_for_orders(
        &self,
        order_guids: &[String],
    ) -> ReconcileResult<Vec<Check>>;

    /// Fetch checks whose creation instant falls in `[start, end)`.
    ///
    /// This path is timezone-sensitive and can disagree with
    /// business-date queries near midnight. It exists for raw audit
    /// lookups only and must never feed official daily totals.
    async fn query_checks_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ReconcileResult<Vec<Check>>;
}
