//! Output contract types.
//!
//! The display layer renders these as tables/cards; serialized field names
//! are a published contract and must stay stable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Procurement urgency class for a material.
///
/// Ordered by severity so callers can compare (`Critical > Urgent > Ok`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Ok,
    Urgent,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Ok => "ok",
            Urgency::Urgent => "urgent",
            Urgency::Critical => "critical",
        }
    }
}

impl core::fmt::Display for Urgency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One aggregated row per distinct material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSummary {
    pub material: String,
    /// Sum of all forecast entries seen for this material.
    pub forecasted_demand: f64,
    /// Sum of all historical-usage entries seen for this material.
    pub historical_total: f64,
    /// From the most recently seen record for this material.
    pub current_inventory: f64,
    pub supplier: Option<String>,
    pub supplier_reliability: f64,
    pub lead_time_days: u32,
    /// Rounded order quantity; never negative.
    pub recommended_order: u64,
    /// Snapshot date plus lead time, in calendar days.
    pub recommended_order_date: NaiveDate,
    pub urgency: Urgency,
    /// Display name of the bulk group this material was paired into, if any.
    pub bulk_group: Option<String>,
}

impl ValueObject for MaterialSummary {}

/// A pair of materials whose procurement could plausibly be combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkGroup {
    /// `"{first} + {second}"`, from the member material names.
    pub group_name: String,
    /// Sum of the members' `recommended_order`.
    pub total_quantity: u64,
    /// Mean of the members' reliability, rounded to nearest integer.
    pub avg_reliability: u32,
    /// Mean of the members' lead time, rounded to nearest integer.
    pub avg_lead_time_days: u32,
    /// Fixed 5% heuristic over `total_quantity`.
    pub estimated_savings: f64,
}

impl ValueObject for BulkGroup {}
