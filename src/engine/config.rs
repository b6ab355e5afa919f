//! Engine configuration
//!
//! The variation points that used to be scattered across ad-hoc query
//! scripts (business-date vs. created-date semantics, dollars vs. cents,
//! fan-out width, timeout budget) live here as explicit configuration on
//! one engine.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Temporal semantics for raw record lookups.
///
/// Business dates are end-of-day accounting labels and the canonical basis
/// for every official daily and monthly total. Created-date lookups operate
/// on wall-clock instants, are timezone-sensitive, and can disagree with
/// business-date totals near midnight; they are permitted on the audit path
/// only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemporalBasis {
    /// Query by the point-of-sale business date label (canonical)
    BusinessDate,
    /// Query by the creation instant (audit lookups only)
    CreatedDate,
}

/// Unit convention of the amounts the backing feed delivers.
///
/// The engine computes in dollars. `Dollars` (the default) applies no
/// conversion; converting an already-converted feed is the classic
/// double-conversion bug, so the conversion happens exactly once, here or
/// at ingestion but never both. `Cents` declares a feed that skipped the
/// ingestion-side division; the engine then divides by 100 at the read
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountUnit {
    /// Amounts arrive in dollars; used as-is
    Dollars,
    /// Amounts arrive in minor units; divided by 100 once on read
    Cents,
}

/// Configuration for the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Temporal semantics for the audit lookup path. Official summaries
    /// always use business dates regardless of this setting.
    pub temporal_basis: TemporalBasis,
    /// Unit convention of the backing feed
    pub amount_unit: AmountUnit,
    /// Maximum simultaneous outstanding per-date queries
    pub max_concurrency: usize,
    /// Per-query timeout budget in milliseconds; exceeding it surfaces as
    /// a per-date `DataSourceUnavailable`, never a whole-range failure
    pub per_query_timeout_ms: u64,
    /// Largest raw-vs-override difference, in dollars, still treated as a
    /// match during verification
    pub drift_tolerance: BigDecimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            temporal_basis: TemporalBasis::BusinessDate,
            amount_unit: AmountUnit::Dollars,
            max_concurrency: 8,
            per_query_timeout_ms: 10_000,
            drift_tolerance: BigDecimal::from(1),
        }
    }
}
