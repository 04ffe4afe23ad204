//! Canonical forecast input records.
//!
//! These are the normalized shapes the engine consumes. The backend's
//! duck-typed payloads (alias field names, numeric strings) are resolved
//! into these types by `demandcast-ingest` before any computation runs.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Material name substituted when the raw payload carries none.
pub const UNKNOWN_MATERIAL: &str = "Unknown";

/// Supplier reliability assumed when the raw payload carries none.
pub const DEFAULT_RELIABILITY: f64 = 100.0;

/// One material usage observation for one reporting period.
///
/// All numeric fields are non-negative; `supplier_reliability` lives in
/// `[0, 100]`. The ingest layer guarantees both before records reach the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialUsageRecord {
    /// Material identifier (non-empty; `"Unknown"` when the source omitted it).
    pub material: String,
    /// Next-period predicted usage.
    pub forecasted_demand: f64,
    /// Cumulative past usage.
    pub historical_total: f64,
    /// On-hand stock.
    pub current_inventory: f64,
    /// Supplier display name, if known.
    pub supplier: Option<String>,
    /// Delivery consistency score in `[0, 100]`.
    pub supplier_reliability: f64,
    /// Days between placing an order and receiving the material.
    pub lead_time_days: u32,
}

impl MaterialUsageRecord {
    /// A record with defaults for everything but the material name.
    ///
    /// Mostly useful as a starting point in tests and callers that fill
    /// fields incrementally.
    pub fn named(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            forecasted_demand: 0.0,
            historical_total: 0.0,
            current_inventory: 0.0,
            supplier: None,
            supplier_reliability: DEFAULT_RELIABILITY,
            lead_time_days: 0,
        }
    }
}

impl Default for MaterialUsageRecord {
    fn default() -> Self {
        Self::named(UNKNOWN_MATERIAL)
    }
}

impl ValueObject for MaterialUsageRecord {}

/// Backend-suggested order quantity for one material.
///
/// When at least one hint exists for a material, the engine sums the hint
/// quantities and skips its own reorder formula for that material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkOrderHint {
    pub material: String,
    pub recommended_order_quantity: f64,
}

impl ValueObject for BulkOrderHint {}
