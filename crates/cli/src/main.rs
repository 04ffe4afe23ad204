//! Offline runner for the demand engine.
//!
//! Reads a forecast payload (the backend's JSON envelope) on stdin and
//! prints the computed demand plan as JSON on stdout:
//!
//! ```text
//! demandcast < forecast_payload.json
//! ```
//!
//! The project id defaults to a fresh one per run; set `DEMANDCAST_PROJECT`
//! to a UUID to pin it.

use std::io::Read;

use anyhow::Context;
use chrono::Utc;

use demandcast_core::ProjectId;
use demandcast_engine::{DemandSummaryJob, InsightScheduler, LocalScheduler, UsageSnapshot};
use demandcast_ingest::parse_usage_payload;

fn main() -> anyhow::Result<()> {
    demandcast_observability::init();

    let project_id = match std::env::var("DEMANDCAST_PROJECT") {
        Ok(value) => value
            .parse::<ProjectId>()
            .context("DEMANDCAST_PROJECT is not a valid UUID")?,
        Err(_) => ProjectId::new(),
    };

    let mut payload = String::new();
    std::io::stdin()
        .read_to_string(&mut payload)
        .context("failed to read payload from stdin")?;

    let (records, bulk_hints) =
        parse_usage_payload(&payload).context("failed to parse forecast payload")?;

    tracing::info!(
        %project_id,
        records = records.len(),
        bulk_hints = bulk_hints.len(),
        "computing demand plan"
    );

    let snapshot = UsageSnapshot::new(project_id, Utc::now().date_naive())
        .with_records(records)
        .with_bulk_hints(bulk_hints);

    let scheduler = LocalScheduler::for_project(project_id);
    let plan = scheduler
        .run(DemandSummaryJob::new(project_id, snapshot))
        .context("demand summary failed")?;

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
