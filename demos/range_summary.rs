//! Range summary usage example

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use venue_revenue_core::utils::MemoryStore;
use venue_revenue_core::{ReconciliationEngine, RevenueOverride, SummarySource, VerificationStatus};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Venue Revenue Core - Range Summary Example\n");

    // Create an engine over an in-memory store
    let store = MemoryStore::new();

    // 1. Seed a week of point-of-sale data
    println!("📊 Seeding a week of orders and checks...");

    let monday = NaiveDate::from_ymd_opt(2025, 8, 4).unwrap();
    let order = store.seed_order(monday);
    store.seed_check(&order, monday, "845.60".parse::<BigDecimal>()?, false);
    store.seed_check(&order, monday, "312.40".parse::<BigDecimal>()?, false);
    println!("  ✓ Monday: two checks");

    let tuesday = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
    let order = store.seed_order(tuesday);
    store.seed_check(&order, tuesday, "501.75".parse::<BigDecimal>()?, false);
    store.seed_check(&order, tuesday, "88.00".parse::<BigDecimal>()?, true);
    println!("  ✓ Tuesday: one check plus a voided one");

    // Wednesday intentionally has no data: the sync never ran.
    println!("  ✓ Wednesday: nothing synced");

    let thursday = NaiveDate::from_ymd_opt(2025, 8, 7).unwrap();
    store.insert_override(RevenueOverride {
        date: thursday,
        actual_revenue: "4337.24".parse::<BigDecimal>()?,
        check_count: 37,
        notes: Some("manually verified against the POS".to_string()),
        created_at: Utc::now(),
    });
    println!("  ✓ Thursday: covered by a verified override\n");

    let engine = ReconciliationEngine::new(store.clone());

    // 2. Summarize the range
    println!("💰 Summarizing Monday through Thursday...\n");
    let summary = engine.summarize_range(monday, thursday).await?;

    for day in &summary.daily {
        let source = match day.source {
            SummarySource::Override => "override",
            SummarySource::Raw => "raw",
        };
        if day.has_data {
            println!(
                "  {}: ${} across {} checks ({}), ${} voided",
                day.date, day.total_revenue, day.check_count, source, day.voided_revenue
            );
        } else {
            println!("  {}: no data synced", day.date);
        }
    }

    println!("\n📈 Range totals:");
    println!("  Revenue:        ${}", summary.total_revenue);
    println!("  Checks:         {}", summary.total_checks);
    println!("  Average check:  ${}", summary.average_check());
    println!("  Days with data: {}", summary.days_with_data);
    println!("  Days missing:   {}", summary.days_missing);
    println!("  Failed dates:   {}", summary.failed.len());

    // 3. Verify raw totals against the override ledger
    println!("\n🔍 Verifying raw totals against the override ledger...");
    let report = engine.verify_range(monday, thursday).await?;
    for entry in &report {
        match &entry.status {
            VerificationStatus::Matched => println!("  {}: ✅ matched", entry.date),
            VerificationStatus::Drifted { difference } => {
                println!("  {}: ⚠️  drifted by ${}", entry.date, difference)
            }
            VerificationStatus::Unverified => println!("  {}: no override to compare", entry.date),
            VerificationStatus::Failed { reason } => {
                println!("  {}: ❌ lookup failed ({})", entry.date, reason)
            }
        }
    }

    println!("\n🎉 Example completed successfully!");
    Ok(())
}
