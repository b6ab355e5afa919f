//! Integration tests for venue-revenue-core

use std::time::Duration;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use venue_revenue_core::{
    utils::MemoryStore, AmountUnit, Check, EngineConfig, ReconcileError, ReconciliationEngine,
    RevenueOverride, SummarySource, TemporalBasis, VerificationStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dollars(s: &str) -> BigDecimal {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_complete_reconciliation_workflow() {
    let store = MemoryStore::new();

    // Monday: two clean checks.
    let monday = date(2025, 8, 4);
    let order = store.seed_order(monday);
    store.seed_check(&order, monday, dollars("120.50"), false);
    store.seed_check(&order, monday, dollars("79.50"), false);

    // Tuesday: a voided check alongside a real one, plus a duplicate row
    // for the real one (sync artifact).
    let tuesday = date(2025, 8, 5);
    let order = store.seed_order(tuesday);
    let kept = store.seed_check(&order, tuesday, dollars("60.00"), false);
    store.seed_check(&order, tuesday, dollars("45.00"), true);
    {
        // Re-deliver the kept check verbatim.
        let noon = Utc.from_utc_datetime(
            &tuesday.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()),
        );
        store.insert_check(Check {
            guid: kept.clone(),
            order_guid: order.clone(),
            total_amount: dollars("60.00"),
            tax_amount: None,
            tip_amount: None,
            voided: false,
            created_date: noon,
            closed_date: None,
        });
    }

    // Wednesday: nothing synced at all.
    let wednesday = date(2025, 8, 6);

    // Thursday: covered by a manually-verified override; raw rows for the
    // date would disagree and must not be read.
    let thursday = date(2025, 8, 7);
    let order = store.seed_order(thursday);
    store.seed_check(&order, thursday, dollars("1.00"), false);
    store.insert_override(RevenueOverride {
        date: thursday,
        actual_revenue: dollars("4337.24"),
        check_count: 37,
        notes: Some("nightly verification".to_string()),
        created_at: Utc::now(),
    });

    let engine = ReconciliationEngine::new(store);
    let summary = engine.summarize_range(monday, thursday).await.unwrap();

    assert_eq!(summary.daily.len(), 4);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.days_with_data, 3);
    assert_eq!(summary.days_missing, 1);

    // Monday
    assert_eq!(summary.daily[0].total_revenue, dollars("200.00"));
    assert_eq!(summary.daily[0].check_count, 2);
    // Tuesday: duplicate counted once, void excluded but tracked
    assert_eq!(summary.daily[1].total_revenue, dollars("60.00"));
    assert_eq!(summary.daily[1].check_count, 1);
    assert_eq!(summary.daily[1].voided_revenue, dollars("45.00"));
    assert_eq!(summary.daily[1].voided_count, 1);
    // Wednesday: missing, not zero
    assert_eq!(summary.daily[2].date, wednesday);
    assert!(!summary.daily[2].has_data);
    // Thursday: override verbatim
    assert_eq!(summary.daily[3].total_revenue, dollars("4337.24"));
    assert_eq!(summary.daily[3].check_count, 37);
    assert_eq!(summary.daily[3].source, SummarySource::Override);

    // Range total is the exact sum of daily totals.
    let daily_sum: BigDecimal = summary
        .daily
        .iter()
        .map(|day| &day.total_revenue)
        .sum();
    assert_eq!(summary.total_revenue, daily_sum);
    assert_eq!(summary.total_checks, 40);

    // Average check across the range.
    assert_eq!(
        summary.average_check(),
        &summary.total_revenue / BigDecimal::from(40u32)
    );
}

#[tokio::test]
async fn test_partial_failure_reports_failed_dates() {
    let store = MemoryStore::new();
    let good = date(2025, 8, 10);
    let bad = date(2025, 8, 11);
    let order = store.seed_order(good);
    store.seed_check(&order, good, dollars("50.00"), false);
    store.seed_order(bad);
    store.fail_business_date(20250811);

    let engine = ReconciliationEngine::new(store);
    let summary = engine.summarize_range(good, bad).await.unwrap();

    assert_eq!(summary.daily.len(), 1);
    assert_eq!(summary.daily[0].date, good);
    assert_eq!(summary.total_revenue, dollars("50.00"));
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].date, bad);
    assert!(summary.failed[0].reason.contains("unreachable"));
}

#[tokio::test]
async fn test_slow_store_surfaces_per_date_timeout() {
    let store = MemoryStore::new();
    let day = date(2025, 8, 10);
    let order = store.seed_order(day);
    store.seed_check(&order, day, dollars("50.00"), false);
    store.set_latency(Duration::from_millis(100));

    let config = EngineConfig {
        per_query_timeout_ms: 10,
        ..EngineConfig::default()
    };
    let engine = ReconciliationEngine::with_config(store, config);
    let summary = engine.summarize_range(day, day).await.unwrap();

    assert!(summary.daily.is_empty());
    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].reason.contains("10ms"));

    // The single-day operation propagates the same condition as an error.
    let err = engine.summarize_day(day).await.unwrap_err();
    assert!(matches!(err, ReconcileError::DataSourceUnavailable(_)));
}

#[tokio::test]
async fn test_month_summary_over_override_ledger() {
    let store = MemoryStore::new();
    store.insert_override(RevenueOverride {
        date: date(2025, 2, 14),
        actual_revenue: dollars("4337.24"),
        check_count: 37,
        notes: None,
        created_at: Utc::now(),
    });

    let engine = ReconciliationEngine::new(store);
    let summary = engine.summarize_month(2025, 2).await.unwrap();

    assert_eq!(summary.start, date(2025, 2, 1));
    assert_eq!(summary.end, date(2025, 2, 28));
    assert_eq!(summary.daily.len(), 28);
    assert_eq!(summary.days_with_data, 1);
    assert_eq!(summary.days_missing, 27);
    assert_eq!(summary.total_revenue, dollars("4337.24"));
    assert_eq!(summary.total_checks, 37);
}

#[tokio::test]
async fn test_verification_detects_drift_against_overrides() {
    let store = MemoryStore::new();

    // Matched: raw agrees with the ledger within the dollar tolerance.
    let matched_day = date(2025, 8, 4);
    let order = store.seed_order(matched_day);
    store.seed_check(&order, matched_day, dollars("200.00"), false);
    store.insert_override(RevenueOverride {
        date: matched_day,
        actual_revenue: dollars("200.50"),
        check_count: 1,
        notes: None,
        created_at: Utc::now(),
    });

    // Drifted: raw disagrees well beyond tolerance.
    let drifted_day = date(2025, 8, 5);
    let order = store.seed_order(drifted_day);
    store.seed_check(&order, drifted_day, dollars("100.00"), false);
    store.insert_override(RevenueOverride {
        date: drifted_day,
        actual_revenue: dollars("250.00"),
        check_count: 3,
        notes: None,
        created_at: Utc::now(),
    });

    // Unverified: raw data but no override row.
    let unverified_day = date(2025, 8, 6);
    let order = store.seed_order(unverified_day);
    store.seed_check(&order, unverified_day, dollars("75.00"), false);

    // Failed: the raw store is unreachable for this date.
    let failed_day = date(2025, 8, 7);
    store.fail_business_date(20250807);

    let engine = ReconciliationEngine::new(store);
    let report = engine
        .verify_range(matched_day, failed_day)
        .await
        .unwrap();

    assert_eq!(report.len(), 4);
    assert_eq!(report[0].status, VerificationStatus::Matched);
    assert_eq!(
        report[1].status,
        VerificationStatus::Drifted {
            difference: dollars("150.00")
        }
    );
    assert_eq!(report[2].status, VerificationStatus::Unverified);
    assert!(matches!(
        report[3].status,
        VerificationStatus::Failed { .. }
    ));
}

#[tokio::test]
async fn test_audit_path_follows_temporal_basis() {
    let store = MemoryStore::new();

    // A late-night order: business date Aug 10, created shortly after
    // midnight on Aug 11. The two temporal semantics disagree on it.
    let business_day = date(2025, 8, 10);
    let order = store.seed_order(business_day);
    let after_midnight = Utc.from_utc_datetime(
        &date(2025, 8, 11).and_time(NaiveTime::from_hms_opt(0, 30, 0).unwrap()),
    );
    store.insert_check(Check {
        guid: "late-check".to_string(),
        order_guid: order.clone(),
        total_amount: dollars("42.00"),
        tax_amount: None,
        tip_amount: None,
        voided: false,
        created_date: after_midnight,
        closed_date: None,
    });

    let by_business = ReconciliationEngine::new(store.clone());
    let checks = by_business.audit_day_checks(business_day).await.unwrap();
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].guid, "late-check");

    let config = EngineConfig {
        temporal_basis: TemporalBasis::CreatedDate,
        ..EngineConfig::default()
    };
    let by_created = ReconciliationEngine::with_config(store, config);
    // Under created-date semantics the check belongs to Aug 11, not Aug 10.
    assert!(by_created.audit_day_checks(business_day).await.unwrap().is_empty());
    let checks = by_created.audit_day_checks(date(2025, 8, 11)).await.unwrap();
    assert_eq!(checks.len(), 1);
}

#[tokio::test]
async fn test_cents_feed_configuration() {
    let store = MemoryStore::new();
    let day = date(2025, 8, 10);
    let order = store.seed_order(day);
    // A feed that skipped the ingestion-side division: 12345 cents.
    store.seed_check(&order, day, BigDecimal::from(12345), false);

    let config = EngineConfig {
        amount_unit: AmountUnit::Cents,
        ..EngineConfig::default()
    };
    let engine = ReconciliationEngine::with_config(store, config);
    let summary = engine.summarize_day(day).await.unwrap();

    assert_eq!(summary.total_revenue, dollars("123.45"));
}

#[tokio::test]
async fn test_range_summary_serializes_for_dashboard_handoff() {
    let store = MemoryStore::new();
    let day = date(2025, 8, 10);
    let order = store.seed_order(day);
    store.seed_check(&order, day, dollars("50.00"), false);

    let engine = ReconciliationEngine::new(store);
    let summary = engine.summarize_range(day, day).await.unwrap();

    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["daily"].as_array().unwrap().len(), 1);
    assert_eq!(value["total_checks"], 1);
    assert_eq!(value["days_with_data"], 1);
    assert!(value["failed"].as_array().unwrap().is_empty());
}
