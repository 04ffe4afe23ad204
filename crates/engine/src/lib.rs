//! `demandcast-engine`
//!
//! **Responsibility:** the aggregation engine — per-material procurement
//! summaries and bulk-order pairings, computed from forecast snapshots.
//!
//! This crate is intentionally pure:
//! - No IO, no clock reads, no storage: inputs (including the `as_of` date)
//!   are provided by callers.
//! - Deterministic: the same snapshot and configuration always produce the
//!   same plan.
//! - Data-quality issues never fail a run; only invalid configuration or a
//!   project-scope violation does.

pub mod bulk_orders;
pub mod demand_summary;
pub mod job;
pub mod result;
pub mod scheduler;

pub use demand_summary::{DemandSummaryJob, SummaryConfig, summarize};
pub use job::InsightJob;
pub use result::{DemandPlan, EngineError};
pub use scheduler::{InsightScheduler, LocalScheduler, ProjectScope, UsageSnapshot};
