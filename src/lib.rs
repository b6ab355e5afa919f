//! # Venue Revenue Core
//!
//! A revenue reconciliation library that turns raw point-of-sale order and
//! check records into trustworthy, deduplicated, period-bounded revenue
//! summaries.
//!
//! ## Features
//!
//! - **Override precedence**: manually-verified daily figures take priority
//!   over recomputed raw aggregates, as a read-time override
//! - **Deduplication**: duplicate check rows from sync artifacts count once,
//!   first-seen-wins
//! - **Void exclusion**: voided checks never contribute to revenue; their
//!   amounts are tracked separately for audit visibility
//! - **Missing vs. zero**: a date with no records is distinguishable from a
//!   date that legitimately took nothing
//! - **Partial-failure tolerance**: one unreachable date never aborts a
//!   range; failed dates are enumerated so callers can retry exactly those
//! - **Bounded fan-out**: per-date lookups run concurrently up to a
//!   configured width, with per-query timeouts and cooperative cancellation
//! - **Storage abstraction**: database-agnostic design with a trait-based
//!   read-only store seam
//!
//! ## Quick Start
//!
//! ```rust
//! use venue_revenue_core::{EngineConfig, ReconciliationEngine};
//! use chrono::NaiveDate;
//!
//! // The engine is generic over a RevenueStore implementation
//! // let store = YourStoreImplementation::new();
//! // let engine = ReconciliationEngine::new(store);
//! // let summary = engine.summarize_range(start, end).await?;
//! ```

pub mod engine;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use engine::*;
pub use traits::*;
pub use types::*;
