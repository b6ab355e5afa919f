//! In-memory store implementation for testing

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use uuid::Uuid;

use crate::traits::RevenueStore;
use crate::types::*;
use crate::utils::dates;

/// In-memory store implementation for testing and development.
///
/// Rows are kept in insertion order so the engine's first-seen-wins
/// deduplication is observable. Queries can be made to fail per business
/// date or delayed by an artificial latency for timeout tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    orders: Arc<RwLock<Vec<Order>>>,
    checks: Arc<RwLock<Vec<Check>>>,
    overrides: Arc<RwLock<Vec<RevenueOverride>>>,
    failing_dates: Arc<RwLock<HashSet<i32>>>,
    fail_overrides: Arc<RwLock<bool>>,
    latency: Arc<RwLock<Option<Duration>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw order row
    pub fn insert_order(&self, order: Order) {
        self.orders.write().unwrap().push(order);
    }

    /// Insert a raw check row. Duplicate guids are allowed, as in the
    /// real feed.
    pub fn insert_check(&self, check: Check) {
        self.checks.write().unwrap().push(check);
    }

    /// Insert an override row
    pub fn insert_override(&self, row: RevenueOverride) {
        self.overrides.write().unwrap().push(row);
    }

    /// Insert an order for the given business date with a freshly minted
    /// guid, returning the guid.
    pub fn seed_order(&self, date: NaiveDate) -> String {
        let guid = Uuid::new_v4().to_string();
        self.insert_order(Order {
            guid: guid.clone(),
            business_date: dates::to_business_date_int(date),
            created_date: noon(date),
        });
        guid
    }

    /// Insert a check under the given order with a freshly minted guid,
    /// returning the guid.
    pub fn seed_check(
        &self,
        order_guid: &str,
        date: NaiveDate,
        total: BigDecimal,
        voided: bool,
    ) -> String {
        let guid = Uuid::new_v4().to_string();
        self.insert_check(Check {
            guid: guid.clone(),
            order_guid: order_guid.to_string(),
            total_amount: total,
            tax_amount: None,
            tip_amount: None,
            voided,
            created_date: noon(date),
            closed_date: Some(noon(date) + ChronoDuration::hours(2)),
        });
        guid
    }

    /// Make order queries touching this business date fail
    pub fn fail_business_date(&self, business_date: i32) {
        self.failing_dates.write().unwrap().insert(business_date);
    }

    /// Make override queries fail
    pub fn fail_overrides(&self) {
        *self.fail_overrides.write().unwrap() = true;
    }

    /// Delay every query by the given duration
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write().unwrap() = Some(latency);
    }

    /// Clear all data and injected behavior (useful for testing)
    pub fn clear(&self) {
        self.orders.write().unwrap().clear();
        self.checks.write().unwrap().clear();
        self.overrides.write().unwrap().clear();
        self.failing_dates.write().unwrap().clear();
        *self.fail_overrides.write().unwrap() = false;
        *self.latency.write().unwrap() = None;
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.read().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn noon(date: NaiveDate) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(time))
}

#[async_trait]
impl RevenueStore for MemoryStore {
    async fn query_overrides(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ReconcileResult<Vec<RevenueOverride>> {
        self.simulate_latency().await;
        if *self.fail_overrides.read().unwrap() {
            return Err(ReconcileError::DataSourceUnavailable(
                "override store unreachable (injected)".to_string(),
            ));
        }
        let rows = self.overrides.read().unwrap();
        Ok(rows
            .iter()
            .filter(|row| row.date >= start && row.date <= end)
            .cloned()
            .collect())
    }

    async fn query_orders(
        &self,
        business_date_start: i32,
        business_date_end: i32,
    ) -> ReconcileResult<Vec<Order>> {
        self.simulate_latency().await;
        {
            let failing = self.failing_dates.read().unwrap();
            if failing
                .iter()
                .any(|bd| *bd >= business_date_start && *bd <= business_date_end)
            {
                return Err(ReconcileError::DataSourceUnavailable(format!(
                    "order store unreachable for {business_date_start}..={business_date_end} (injected)"
                )));
            }
        }
        let orders = self.orders.read().unwrap();
        Ok(orders
            .iter()
            .filter(|order| {
                order.business_date >= business_date_start
                    && order.business_date <= business_date_end
            })
            .cloned()
            .collect())
    }

    async fn query_checks_for_orders(
        &self,
        order_guids: &[String],
    ) -> ReconcileResult<Vec<Check>> {
        self.simulate_latency().await;
        let wanted: HashSet<&str> = order_guids.iter().map(String::as_str).collect();
        let checks = self.checks.read().unwrap();
        Ok(checks
            .iter()
            .filter(|check| wanted.contains(check.order_guid.as_str()))
            .cloned()
            .collect())
    }

    async fn query_checks_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ReconcileResult<Vec<Check>> {
        self.simulate_latency().await;
        let checks = self.checks.read().unwrap();
        Ok(checks
            .iter()
            .filter(|check| check.created_date >= start && check.created_date < end)
            .cloned()
            .collect())
    }
}
