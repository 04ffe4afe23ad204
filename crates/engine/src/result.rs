use serde::{Deserialize, Serialize};
use thiserror::Error;

use demandcast_core::{BulkGroup, MaterialSummary};

/// Result of one demand-summary run.
///
/// This is an insight for the display layer, not domain state: every run
/// recomputes it in full from the snapshot it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPlan {
    /// One row per distinct material, in first-seen input order.
    pub materials: Vec<MaterialSummary>,
    /// Candidate pairings, in pair-iteration order.
    pub bulk_groups: Vec<BulkGroup>,
}

impl DemandPlan {
    pub fn empty() -> Self {
        Self {
            materials: Vec::new(),
            bulk_groups: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty() && self.bulk_groups.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid job input: bad configuration or a project-scope violation.
    ///
    /// Malformed *data* is never an error; the ingest layer coerces it
    /// before records reach the engine.
    #[error("invalid job input: {0}")]
    InvalidInput(String),
}
