//! `demandcast-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the canonical input records the engine consumes and the summary types the
//! display layer depends on.

pub mod error;
pub mod id;
pub mod record;
pub mod summary;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::ProjectId;
pub use record::{BulkOrderHint, MaterialUsageRecord};
pub use summary::{BulkGroup, MaterialSummary, Urgency};
pub use value_object::ValueObject;
