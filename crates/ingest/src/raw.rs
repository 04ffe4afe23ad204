//! Raw payload shapes, exactly as the backend sends them.
//!
//! Alias table (canonical field → accepted historical names):
//!
//! | canonical                      | aliases                                            |
//! |--------------------------------|----------------------------------------------------|
//! | `material`                     | `Material`, `material_name`                        |
//! | `forecasted_demand`            | `forecast`, `yhat`, `prediction`                   |
//! | `historical_total`             | `historicalTotal`, `historical_used`               |
//! | `current_inventory`            | `currentInventory`, `inventory`                    |
//! | `supplier`                     | `supplier_name`, `Supplier`                        |
//! | `supplier_reliability`         | `supplierReliability`, `Supplier_Reliability_Score`|
//! | `lead_time_days`               | `leadTime`, `lead_time`, `deliveryTimeDays`        |
//! | `recommended_order_quantity`   | `bulk_order_quantity`, `quantity`                  |
//!
//! Every field is optional and leniently typed here; defaults and clamps are
//! applied in [`crate::normalize`].

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One raw per-material row from the forecast/recommendation service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawUsageRecord {
    #[serde(alias = "Material", alias = "material_name", deserialize_with = "lenient_string")]
    pub material: Option<String>,

    #[serde(
        alias = "forecast",
        alias = "yhat",
        alias = "prediction",
        deserialize_with = "lenient_number"
    )]
    pub forecasted_demand: Option<f64>,

    #[serde(
        alias = "historicalTotal",
        alias = "historical_used",
        deserialize_with = "lenient_number"
    )]
    pub historical_total: Option<f64>,

    #[serde(
        alias = "currentInventory",
        alias = "inventory",
        deserialize_with = "lenient_number"
    )]
    pub current_inventory: Option<f64>,

    #[serde(alias = "supplier_name", alias = "Supplier", deserialize_with = "lenient_string")]
    pub supplier: Option<String>,

    #[serde(
        alias = "supplierReliability",
        alias = "Supplier_Reliability_Score",
        deserialize_with = "lenient_number"
    )]
    pub supplier_reliability: Option<f64>,

    #[serde(
        alias = "leadTime",
        alias = "lead_time",
        alias = "deliveryTimeDays",
        deserialize_with = "lenient_number"
    )]
    pub lead_time_days: Option<f64>,
}

/// One raw bulk-order hint row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawBulkOrderHint {
    #[serde(alias = "Material", alias = "material_name", deserialize_with = "lenient_string")]
    pub material: Option<String>,

    #[serde(
        alias = "bulk_order_quantity",
        alias = "quantity",
        deserialize_with = "lenient_number"
    )]
    pub recommended_order_quantity: Option<f64>,
}

/// The backend's response envelope. Both keys are optional; an empty object
/// is a valid (empty) payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawForecastPayload {
    #[serde(alias = "forecast", alias = "materials")]
    pub records: Vec<RawUsageRecord>,

    #[serde(alias = "recommendations", alias = "bulk_hints")]
    pub bulk_orders: Vec<RawBulkOrderHint>,
}

/// Numbers pass through; numeric strings parse; any other present value
/// coerces to 0 rather than failing the record. Null/absent stays `None` so
/// the normalize step can tell "missing" from "malformed".
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(coerce_number))
}

fn coerce_number(value: Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => Some(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => Some(s.trim().parse::<f64>().unwrap_or(0.0)),
        _ => Some(0.0),
    }
}

/// Strings pass through; scalars stringify; structured values are treated
/// as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Array(_)) | Some(Value::Object(_)) => None,
    })
}
