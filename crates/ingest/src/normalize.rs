//! Coerce-and-default normalization of raw rows into canonical records.
//!
//! Policy: absence of a field never halts ingestion. Missing numerics take
//! their documented defaults, negatives clamp to 0, reliability clamps to
//! `[0, 100]`, and a blank material becomes `"Unknown"`. The only hard
//! failure is a payload that is not JSON at all.

use demandcast_core::{
    BulkOrderHint, DomainError, DomainResult, MaterialUsageRecord,
    record::{DEFAULT_RELIABILITY, UNKNOWN_MATERIAL},
};

use crate::raw::{RawBulkOrderHint, RawForecastPayload, RawUsageRecord};

/// Upper bound for lead time (ten years, in days). Anything larger is a
/// data error, and unbounded values would push order dates past the
/// calendar's range.
pub const MAX_LEAD_TIME_DAYS: u32 = 3_650;

/// Normalize one raw row into a canonical record.
pub fn canonical_record(raw: RawUsageRecord) -> MaterialUsageRecord {
    MaterialUsageRecord {
        material: non_blank(raw.material).unwrap_or_else(|| UNKNOWN_MATERIAL.to_string()),
        forecasted_demand: non_negative(raw.forecasted_demand.unwrap_or(0.0)),
        historical_total: non_negative(raw.historical_total.unwrap_or(0.0)),
        current_inventory: non_negative(raw.current_inventory.unwrap_or(0.0)),
        supplier: non_blank(raw.supplier),
        supplier_reliability: raw
            .supplier_reliability
            .unwrap_or(DEFAULT_RELIABILITY)
            .clamp(0.0, 100.0),
        lead_time_days: raw
            .lead_time_days
            .map(|days| {
                non_negative(days)
                    .round()
                    .min(f64::from(MAX_LEAD_TIME_DAYS)) as u32
            })
            .unwrap_or(0),
    }
}

/// Normalize one raw hint.
///
/// A hint without a material name cannot match any record and is dropped.
pub fn canonical_hint(raw: RawBulkOrderHint) -> Option<BulkOrderHint> {
    let material = non_blank(raw.material)?;
    Some(BulkOrderHint {
        material,
        recommended_order_quantity: non_negative(raw.recommended_order_quantity.unwrap_or(0.0)),
    })
}

/// Parse the backend's response envelope into canonical records and hints.
pub fn parse_usage_payload(
    payload: &str,
) -> DomainResult<(Vec<MaterialUsageRecord>, Vec<BulkOrderHint>)> {
    let raw: RawForecastPayload = serde_json::from_str(payload)
        .map_err(|e| DomainError::validation(format!("malformed forecast payload: {e}")))?;

    let records = raw.records.into_iter().map(canonical_record).collect();
    let hints = raw.bulk_orders.into_iter().filter_map(canonical_hint).collect();
    Ok((records, hints))
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
