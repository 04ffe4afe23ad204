use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use demandcast_core::{BulkOrderHint, MaterialUsageRecord, ProjectId};

use crate::job::InsightJob;
use crate::result::EngineError;

/// Project scope for execution.
///
/// - `Any`: run jobs for any project (shared worker).
/// - `Project`: only accept jobs for the specified project (single-project
///   worker, safe default for per-request execution).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProjectScope {
    Any,
    Project(ProjectId),
}

impl ProjectScope {
    pub fn allows(&self, project_id: ProjectId) -> bool {
        match self {
            ProjectScope::Any => true,
            ProjectScope::Project(p) => *p == project_id,
        }
    }
}

/// Scheduler/executor for insight jobs.
///
/// Intentionally minimal and runtime agnostic; the engine may be invoked on
/// every refresh, so execution stays synchronous and allocation-light.
pub trait InsightScheduler: Send + Sync + 'static {
    fn scope(&self) -> ProjectScope;

    fn run<J: InsightJob>(&self, job: J) -> Result<J::Output, EngineError> {
        if !self.scope().allows(job.project_id()) {
            return Err(EngineError::InvalidInput(
                "project scope violation (job project not allowed by scheduler)".to_string(),
            ));
        }
        job.run()
    }
}

/// Simple synchronous scheduler that runs jobs immediately in-process.
#[derive(Debug, Copy, Clone)]
pub struct LocalScheduler {
    scope: ProjectScope,
}

impl LocalScheduler {
    pub fn new(scope: ProjectScope) -> Self {
        Self { scope }
    }

    pub fn for_project(project_id: ProjectId) -> Self {
        Self::new(ProjectScope::Project(project_id))
    }
}

impl InsightScheduler for LocalScheduler {
    fn scope(&self) -> ProjectScope {
        self.scope
    }
}

/// Input snapshot for a demand-summary run: one project's normalized
/// forecast records and the backend's bulk-order hints, frozen at `as_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub project_id: ProjectId,
    /// Date the snapshot was taken; order dates are computed relative to it.
    pub as_of: NaiveDate,
    pub records: Vec<MaterialUsageRecord>,
    pub bulk_hints: Vec<BulkOrderHint>,
}

impl UsageSnapshot {
    pub fn new(project_id: ProjectId, as_of: NaiveDate) -> Self {
        Self {
            project_id,
            as_of,
            records: Vec::new(),
            bulk_hints: Vec::new(),
        }
    }

    pub fn with_records(mut self, records: Vec<MaterialUsageRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn with_bulk_hints(mut self, bulk_hints: Vec<BulkOrderHint>) -> Self {
        self.bulk_hints = bulk_hints;
        self
    }
}
