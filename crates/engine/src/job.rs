use demandcast_core::ProjectId;

use crate::result::EngineError;

/// A project-scoped, deterministic insight computation unit.
///
/// Jobs consume **snapshots** assembled by callers; this crate stays
/// storage-agnostic and never reaches out for data itself.
pub trait InsightJob: Send + Sync + 'static {
    type Input: Send + Sync + 'static;
    type Output;

    /// The project this job belongs to (project-safe execution model).
    fn project_id(&self) -> ProjectId;

    /// The input snapshot the job will run on.
    fn input(&self) -> &Self::Input;

    /// Execute the computation.
    ///
    /// Must be pure: no IO, no mutation outside the job's own working data.
    fn run(&self) -> Result<Self::Output, EngineError>;
}
