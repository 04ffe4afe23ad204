//! `demandcast-ingest`
//!
//! **Responsibility:** normalization boundary between the forecasting
//! backend's duck-typed JSON and the canonical record types.
//!
//! The backend grew several generations of field names (`forecasted_demand`
//! vs `forecast` vs `yhat` vs `prediction`) and emits numbers as strings in
//! older payloads. All of that is resolved here, once, through a documented
//! alias table and coerce-and-default rules — the engine only ever sees
//! canonical records.

pub mod normalize;
pub mod raw;

pub use normalize::{MAX_LEAD_TIME_DAYS, canonical_hint, canonical_record, parse_usage_payload};
pub use raw::{RawBulkOrderHint, RawForecastPayload, RawUsageRecord};
