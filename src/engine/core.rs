//! Reconciliation engine producing override-aware revenue summaries

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use futures::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::engine::config::{AmountUnit, EngineConfig, TemporalBasis};
use crate::traits::RevenueStore;
use crate::types::*;
use crate::utils::{dates, validation};

/// Revenue reconciliation engine.
///
/// Turns raw point-of-sale order and check records into trustworthy,
/// deduplicated, period-bounded revenue figures: override-ledger rows take
/// precedence where present, duplicate check rows count once, voided checks
/// are excluded from revenue and tracked separately, and a date with no
/// records is distinguishable from a date that legitimately took nothing.
///
/// All official totals use business-date semantics. The engine holds no
/// connections and mutates nothing; every lookup is an independent read
/// against the [`RevenueStore`] it was built with.
pub struct ReconciliationEngine<S: RevenueStore> {
    store: S,
    config: EngineConfig,
}

impl<S: RevenueStore> ReconciliationEngine<S> {
    /// Create an engine with the default configuration
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
        }
    }

    /// Create an engine with a custom configuration
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Current configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Summarize every date in the inclusive `[start, end]` interval.
    ///
    /// Per-date lookups fan out concurrently up to the configured width and
    /// reassemble in date order. A date whose lookup fails is enumerated in
    /// the result's `failed` list instead of aborting the range.
    pub async fn summarize_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ReconcileResult<RangeSummary> {
        self.summarize_range_with_cancellation(start, end, CancellationToken::new())
            .await
    }

    /// Summarize a range under a caller-owned cancellation token.
    ///
    /// Cancelling stops new per-date queries from being issued; dates not
    /// yet queried land in `failed`, and summaries already collected are
    /// returned intact.
    pub async fn summarize_range_with_cancellation(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        cancel: CancellationToken,
    ) -> ReconcileResult<RangeSummary> {
        validation::validate_range(start, end)?;

        let all_dates = dates::dates_between(start, end);
        debug!(%start, %end, days = all_dates.len(), "summarizing range");

        // Override rows win outright for the dates they cover; raw records
        // for those dates are never read.
        let overrides: BTreeMap<NaiveDate, RevenueOverride> =
            match self.store.query_overrides(start, end).await {
                Ok(rows) => rows
                    .into_iter()
                    .filter(|row| row.date >= start && row.date <= end)
                    .map(|row| (row.date, row))
                    .collect(),
                Err(err) => {
                    // Without the ledger we cannot tell which dates it governs,
                    // so no date in the range can produce an official figure.
                    warn!(error = %err, "override query failed for range");
                    let failed = all_dates
                        .iter()
                        .map(|&date| FailedDate {
                            date,
                            reason: err.to_string(),
                        })
                        .collect();
                    return Ok(RangeSummary {
                        start,
                        end,
                        daily: Vec::new(),
                        total_revenue: BigDecimal::from(0),
                        total_checks: 0,
                        days_with_data: 0,
                        days_missing: 0,
                        failed,
                    });
                }
            };

        let raw_dates: Vec<NaiveDate> = all_dates
            .iter()
            .copied()
            .filter(|date| !overrides.contains_key(date))
            .collect();

        let raw_outcomes: Vec<(NaiveDate, ReconcileResult<DailySummary>)> =
            stream::iter(raw_dates)
                .map(|date| {
                    let cancel = cancel.clone();
                    async move {
                        if cancel.is_cancelled() {
                            return (date, Err(ReconcileError::Cancelled));
                        }
                        (date, self.raw_day_summary_with_timeout(date).await)
                    }
                })
                .buffer_unordered(self.config.max_concurrency.max(1))
                .collect()
                .await;

        let mut by_date: BTreeMap<NaiveDate, DailySummary> = overrides
            .values()
            .map(|row| (row.date, DailySummary::from_override(row)))
            .collect();
        let mut failed = Vec::new();
        for (date, outcome) in raw_outcomes {
            match outcome {
                Ok(summary) => {
                    by_date.insert(date, summary);
                }
                Err(err) => {
                    warn!(%date, error = %err, "per-date summary failed");
                    failed.push(FailedDate {
                        date,
                        reason: err.to_string(),
                    });
                }
            }
        }
        failed.sort_by_key(|entry| entry.date);

        let mut daily = Vec::with_capacity(by_date.len());
        let mut total_revenue = BigDecimal::from(0);
        let mut total_checks = 0u32;
        let mut days_with_data = 0u32;
        let mut days_missing = 0u32;
        for summary in by_date.into_values() {
            total_revenue += &summary.total_revenue;
            total_checks += summary.check_count;
            if summary.has_data {
                days_with_data += 1;
            } else {
                days_missing += 1;
            }
            daily.push(summary);
        }

        Ok(RangeSummary {
            start,
            end,
            daily,
            total_revenue,
            total_checks,
            days_with_data,
            days_missing,
            failed,
        })
    }

    /// Summarize a single business date.
    ///
    /// Unlike the range operation, a failed lookup here propagates as an
    /// error since there is nothing partial to return.
    pub async fn summarize_day(&self, date: NaiveDate) -> ReconcileResult<DailySummary> {
        let overrides = self.store.query_overrides(date, date).await?;
        if let Some(row) = overrides.iter().find(|row| row.date == date) {
            return Ok(DailySummary::from_override(row));
        }
        self.raw_day_summary_with_timeout(date).await
    }

    /// Summarize a calendar month.
    pub async fn summarize_month(&self, year: i32, month: u32) -> ReconcileResult<RangeSummary> {
        let (start, end) = dates::month_bounds(year, month)?;
        self.summarize_range(start, end).await
    }

    /// Recompute raw totals for every date in the range and compare them
    /// against the override ledger.
    ///
    /// This is the read-only half of the nightly verification workflow:
    /// drift beyond the configured tolerance is reported, never corrected.
    /// Writing overrides belongs to the correction workflow, not here.
    pub async fn verify_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ReconcileResult<Vec<DayVerification>> {
        validation::validate_range(start, end)?;

        let overrides: BTreeMap<NaiveDate, RevenueOverride> = self
            .store
            .query_overrides(start, end)
            .await?
            .into_iter()
            .map(|row| (row.date, row))
            .collect();

        let all_dates = dates::dates_between(start, end);
        debug!(%start, %end, overrides = overrides.len(), "verifying range against override ledger");

        let mut outcomes: Vec<(NaiveDate, ReconcileResult<DailySummary>)> =
            stream::iter(all_dates)
                .map(|date| async move { (date, self.raw_day_summary_with_timeout(date).await) })
                .buffer_unordered(self.config.max_concurrency.max(1))
                .collect()
                .await;
        outcomes.sort_by_key(|(date, _)| *date);

        let mut report = Vec::with_capacity(outcomes.len());
        for (date, outcome) in outcomes {
            let expected = overrides.get(&date).cloned();
            let verification = match outcome {
                Err(err) => DayVerification {
                    date,
                    recomputed: None,
                    expected,
                    status: VerificationStatus::Failed {
                        reason: err.to_string(),
                    },
                },
                Ok(summary) => {
                    let status = match &expected {
                        None => VerificationStatus::Unverified,
                        Some(row) => {
                            let difference =
                                (&summary.total_revenue - &row.actual_revenue).abs();
                            if difference > self.config.drift_tolerance {
                                warn!(%date, %difference, "raw total drifted from override ledger");
                                VerificationStatus::Drifted { difference }
                            } else {
                                VerificationStatus::Matched
                            }
                        }
                    };
                    DayVerification {
                        date,
                        recomputed: Some(summary),
                        expected,
                        status,
                    }
                }
            };
            report.push(verification);
        }
        Ok(report)
    }

    /// Raw, deduplicated checks for one date, for audit inspection.
    ///
    /// Honors the configured temporal basis: business-date lookups follow
    /// the canonical label; created-date lookups use a UTC calendar-day
    /// window over creation instants and can disagree with business-date
    /// results near midnight. Audit output never feeds official totals,
    /// and amounts are returned exactly as stored.
    pub async fn audit_day_checks(&self, date: NaiveDate) -> ReconcileResult<Vec<Check>> {
        match self.config.temporal_basis {
            TemporalBasis::BusinessDate => {
                let business_date = dates::to_business_date_int(date);
                let orders = self.store.query_orders(business_date, business_date).await?;
                if orders.is_empty() {
                    return Ok(Vec::new());
                }
                let order_guids: Vec<String> =
                    orders.iter().map(|order| order.guid.clone()).collect();
                let checks = self.store.query_checks_for_orders(&order_guids).await?;
                Ok(dedup_checks(checks))
            }
            TemporalBasis::CreatedDate => {
                let next = date.succ_opt().ok_or_else(|| {
                    ReconcileError::InvalidRange(format!("no calendar day after {date}"))
                })?;
                let window_start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
                let window_end = Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN));
                let checks = self
                    .store
                    .query_checks_created_between(window_start, window_end)
                    .await?;
                Ok(dedup_checks(checks))
            }
        }
    }

    async fn raw_day_summary_with_timeout(
        &self,
        date: NaiveDate,
    ) -> ReconcileResult<DailySummary> {
        let budget = Duration::from_millis(self.config.per_query_timeout_ms);
        match tokio::time::timeout(budget, self.raw_day_summary(date)).await {
            Ok(result) => result,
            Err(_) => Err(ReconcileError::DataSourceUnavailable(format!(
                "lookup for {date} exceeded {}ms budget",
                self.config.per_query_timeout_ms
            ))),
        }
    }

    async fn raw_day_summary(&self, date: NaiveDate) -> ReconcileResult<DailySummary> {
        let business_date = dates::to_business_date_int(date);
        let orders = self.store.query_orders(business_date, business_date).await?;
        if orders.is_empty() {
            // No orders at all: missing sync, not a zero-revenue day.
            return Ok(DailySummary::missing(date));
        }
        let order_guids: Vec<String> = orders.iter().map(|order| order.guid.clone()).collect();
        let checks = self.store.query_checks_for_orders(&order_guids).await?;
        Ok(self.aggregate_day(date, checks))
    }

    fn aggregate_day(&self, date: NaiveDate, checks: Vec<Check>) -> DailySummary {
        let mut seen = HashSet::new();
        let mut total_revenue = BigDecimal::from(0);
        let mut voided_revenue = BigDecimal::from(0);
        let mut check_count = 0u32;
        let mut voided_count = 0u32;

        for check in checks {
            // First-seen-wins: a guid the feed delivered twice counts once.
            if !seen.insert(check.guid.clone()) {
                continue;
            }
            let amount = self.normalize_amount(&check.total_amount);
            if check.voided {
                voided_revenue += amount;
                voided_count += 1;
            } else {
                total_revenue += amount;
                check_count += 1;
            }
        }

        DailySummary {
            date,
            total_revenue,
            check_count,
            voided_revenue,
            voided_count,
            has_data: true,
            source: SummarySource::Raw,
        }
    }

    fn normalize_amount(&self, amount: &BigDecimal) -> BigDecimal {
        match self.config.amount_unit {
            AmountUnit::Dollars => amount.clone(),
            AmountUnit::Cents => amount / BigDecimal::from(100),
        }
    }
}

fn dedup_checks(checks: Vec<Check>) -> Vec<Check> {
    let mut seen = HashSet::new();
    checks
        .into_iter()
        .filter(|check| seen.insert(check.guid.clone()))
        .collect()
}

/// Outcome of comparing one date's recomputed raw total against the
/// override ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayVerification {
    /// The date that was verified
    pub date: NaiveDate,
    /// Raw recomputation, when it succeeded
    pub recomputed: Option<DailySummary>,
    /// Override row for the date, when one exists
    pub expected: Option<RevenueOverride>,
    /// Comparison outcome
    pub status: VerificationStatus,
}

/// Per-date verification status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// Raw total agrees with the override within the drift tolerance
    Matched,
    /// Raw total disagrees with the override beyond the drift tolerance
    Drifted {
        /// Absolute dollar difference between raw and override totals
        difference: BigDecimal,
    },
    /// No override row exists for the date, so there is nothing to
    /// compare against
    Unverified,
    /// The raw recomputation failed
    Failed {
        /// Human-readable failure reason
        reason: String,
    },
}
