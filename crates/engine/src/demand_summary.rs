use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use demandcast_core::{BulkOrderHint, MaterialSummary, MaterialUsageRecord, ProjectId, Urgency};

use crate::bulk_orders::discover_bulk_groups;
use crate::job::InsightJob;
use crate::result::{DemandPlan, EngineError};
use crate::scheduler::UsageSnapshot;

/// Tunable constants of the summary computation.
///
/// Defaults are the product's published heuristics; overrides exist for
/// calibration experiments, not per-request use.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SummaryConfig {
    /// Base safety-stock fraction added on top of forecasted demand.
    pub buffer_factor: f64,
    /// Lower bound for the reliability factor (guards divide-by-zero when a
    /// supplier scores 0).
    pub reliability_floor: f64,
    /// `inventory < demand * critical_ratio` classifies as critical.
    pub critical_ratio: f64,
    /// `inventory < demand * urgent_ratio` classifies as urgent.
    pub urgent_ratio: f64,
    /// Max lead-time difference (days) for two materials to pair up.
    pub max_lead_gap_days: u32,
    /// Max reliability difference for two materials to pair up.
    pub max_reliability_gap: f64,
    /// Estimated savings as a fraction of a group's total quantity.
    pub savings_rate: f64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            buffer_factor: 0.25,
            reliability_floor: 0.01,
            critical_ratio: 0.5,
            urgent_ratio: 0.9,
            max_lead_gap_days: 3,
            max_reliability_gap: 10.0,
            savings_rate: 0.05,
        }
    }
}

impl SummaryConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.buffer_factor.is_finite() && self.buffer_factor > 0.0) {
            return Err(EngineError::InvalidInput(
                "buffer_factor must be a finite positive number".to_string(),
            ));
        }
        if !(self.reliability_floor.is_finite()
            && self.reliability_floor > 0.0
            && self.reliability_floor <= 1.0)
        {
            return Err(EngineError::InvalidInput(
                "reliability_floor must be in (0, 1]".to_string(),
            ));
        }
        if !(self.critical_ratio.is_finite() && self.critical_ratio >= 0.0) {
            return Err(EngineError::InvalidInput(
                "critical_ratio must be a finite non-negative number".to_string(),
            ));
        }
        if !(self.urgent_ratio.is_finite() && self.urgent_ratio >= self.critical_ratio) {
            return Err(EngineError::InvalidInput(
                "urgent_ratio must be finite and >= critical_ratio".to_string(),
            ));
        }
        if !(self.max_reliability_gap.is_finite() && self.max_reliability_gap >= 0.0) {
            return Err(EngineError::InvalidInput(
                "max_reliability_gap must be a finite non-negative number".to_string(),
            ));
        }
        if !(self.savings_rate.is_finite() && self.savings_rate >= 0.0) {
            return Err(EngineError::InvalidInput(
                "savings_rate must be a finite non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Deterministic demand-summary job for one project's forecast snapshot.
///
/// Pipeline:
/// - Merge records per material (sum demand/historical, last-write-wins for
///   the scalar fields).
/// - Take the order quantity from bulk-order hints where present, otherwise
///   from the reliability-adjusted buffer formula.
/// - Classify urgency and compute order dates.
/// - Pair materials with similar lead time and reliability into bulk groups.
#[derive(Debug, Clone)]
pub struct DemandSummaryJob {
    project_id: ProjectId,
    input: UsageSnapshot,
    config: SummaryConfig,
}

impl DemandSummaryJob {
    pub fn new(project_id: ProjectId, input: UsageSnapshot) -> Self {
        Self {
            project_id,
            input,
            config: SummaryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SummaryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_buffer_factor(mut self, buffer_factor: f64) -> Self {
        self.config.buffer_factor = buffer_factor;
        self
    }
}

impl InsightJob for DemandSummaryJob {
    type Input = UsageSnapshot;
    type Output = DemandPlan;

    fn project_id(&self) -> ProjectId {
        self.project_id
    }

    fn input(&self) -> &Self::Input {
        &self.input
    }

    fn run(&self) -> Result<DemandPlan, EngineError> {
        if self.input.project_id != self.project_id {
            return Err(EngineError::InvalidInput(
                "project_id mismatch between job and snapshot".to_string(),
            ));
        }
        self.config.validate()?;

        tracing::debug!(
            project_id = %self.project_id,
            records = self.input.records.len(),
            bulk_hints = self.input.bulk_hints.len(),
            "running demand summary"
        );

        Ok(summarize(
            &self.input.records,
            &self.input.bulk_hints,
            self.input.as_of,
            &self.config,
        ))
    }
}

/// Compute the full demand plan for a set of records and hints.
///
/// Pure given its inputs; `as_of` stands in for "today" so callers own the
/// clock. Empty inputs produce an empty plan, never an error.
pub fn summarize(
    records: &[MaterialUsageRecord],
    bulk_hints: &[BulkOrderHint],
    as_of: NaiveDate,
    config: &SummaryConfig,
) -> DemandPlan {
    if records.is_empty() {
        return DemandPlan::empty();
    }

    let merged = accumulate_records(records);
    let hint_totals = hint_totals(bulk_hints);

    let mut materials: Vec<MaterialSummary> = merged
        .into_iter()
        .map(|record| {
            let recommended_order = match hint_totals.get(record.material.as_str()) {
                Some(total) => total.max(0.0).round() as u64,
                None => recommended_order(&record, config),
            };
            let urgency =
                classify_urgency(record.current_inventory, record.forecasted_demand, config);
            // Saturate rather than panic on absurd lead times; the engine
            // stays total even for callers that bypass ingest clamping.
            let recommended_order_date = as_of
                .checked_add_signed(Duration::days(i64::from(record.lead_time_days)))
                .unwrap_or(NaiveDate::MAX);

            MaterialSummary {
                material: record.material,
                forecasted_demand: record.forecasted_demand,
                historical_total: record.historical_total,
                current_inventory: record.current_inventory,
                supplier: record.supplier,
                supplier_reliability: record.supplier_reliability,
                lead_time_days: record.lead_time_days,
                recommended_order,
                recommended_order_date,
                urgency,
                bulk_group: None,
            }
        })
        .collect();

    let bulk_groups = discover_bulk_groups(&mut materials, config);

    tracing::debug!(
        materials = materials.len(),
        bulk_groups = bulk_groups.len(),
        "demand summary complete"
    );

    DemandPlan {
        materials,
        bulk_groups,
    }
}

/// Merge records into one accumulator per material, preserving first-seen
/// order.
///
/// `forecasted_demand` and `historical_total` sum across duplicates; the
/// scalar fields (`current_inventory`, `supplier`, `supplier_reliability`,
/// `lead_time_days`) take the most recently seen value. Last-write-wins is
/// the published behavior the display layer depends on.
fn accumulate_records(records: &[MaterialUsageRecord]) -> Vec<MaterialUsageRecord> {
    let mut merged: Vec<MaterialUsageRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        match index.get(record.material.as_str()) {
            Some(&i) => {
                let entry = &mut merged[i];
                entry.forecasted_demand += record.forecasted_demand;
                entry.historical_total += record.historical_total;
                entry.current_inventory = record.current_inventory;
                entry.supplier = record.supplier.clone();
                entry.supplier_reliability = record.supplier_reliability;
                entry.lead_time_days = record.lead_time_days;
            }
            None => {
                index.insert(record.material.clone(), merged.len());
                merged.push(record.clone());
            }
        }
    }

    merged
}

/// Per-material sum of hint quantities.
fn hint_totals(bulk_hints: &[BulkOrderHint]) -> HashMap<&str, f64> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for hint in bulk_hints {
        *totals.entry(hint.material.as_str()).or_insert(0.0) += hint.recommended_order_quantity;
    }
    totals
}

/// Reliability-adjusted reorder quantity.
///
/// Lower reliability inflates the buffer non-linearly: at 50% reliability
/// the base buffer doubles, at 25% it quadruples. The reliability factor is
/// floored so a 0-score supplier yields a large but finite buffer.
fn recommended_order(record: &MaterialUsageRecord, config: &SummaryConfig) -> u64 {
    let reliability_factor =
        (record.supplier_reliability / 100.0).max(config.reliability_floor);
    let adjusted_buffer = config.buffer_factor / reliability_factor;
    let quantity = record.forecasted_demand * (1.0 + adjusted_buffer) - record.current_inventory;
    quantity.max(0.0).round() as u64
}

/// Threshold classification, first match wins.
///
/// Both comparisons are strict, so inventory exactly at half of demand is
/// `Urgent` and exactly at 90% of demand is `Ok`.
fn classify_urgency(current_inventory: f64, forecasted_demand: f64, config: &SummaryConfig) -> Urgency {
    if current_inventory < forecasted_demand * config.critical_ratio {
        Urgency::Critical
    } else if current_inventory < forecasted_demand * config.urgent_ratio {
        Urgency::Urgent
    } else {
        Urgency::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Snapshot date used throughout: 2026-03-01.
    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn record(
        material: &str,
        forecasted_demand: f64,
        current_inventory: f64,
        supplier_reliability: f64,
        lead_time_days: u32,
    ) -> MaterialUsageRecord {
        MaterialUsageRecord {
            material: material.to_string(),
            forecasted_demand,
            historical_total: 0.0,
            current_inventory,
            supplier: None,
            supplier_reliability,
            lead_time_days,
        }
    }

    fn run(records: Vec<MaterialUsageRecord>, hints: Vec<BulkOrderHint>) -> DemandPlan {
        summarize(&records, &hints, as_of(), &SummaryConfig::default())
    }

    // ---- end-to-end ----

    #[test]
    fn empty_records_produce_an_empty_plan() {
        let plan = run(vec![], vec![]);
        assert!(plan.is_empty());
    }

    #[test]
    fn cement_and_steel_end_to_end() {
        // Cement: buffer 0.25, 100 * 1.25 - 40 = 85; 40 < 50 -> critical.
        // Steel: factor 0.9, buffer ~0.278, round(50 * 1.278 - 48) = 16;
        // 48 >= 45 -> ok. Lead gap 2 <= 3, reliability gap 10 <= 10 -> paired.
        let plan = run(
            vec![
                record("Cement", 100.0, 40.0, 100.0, 5),
                record("Steel", 50.0, 48.0, 90.0, 7),
            ],
            vec![],
        );

        assert_eq!(plan.materials.len(), 2);

        let cement = &plan.materials[0];
        assert_eq!(cement.material, "Cement");
        assert_eq!(cement.recommended_order, 85);
        assert_eq!(cement.urgency, Urgency::Critical);
        assert_eq!(
            cement.recommended_order_date,
            NaiveDate::from_ymd_opt(2026, 3, 6).unwrap()
        );

        let steel = &plan.materials[1];
        assert_eq!(steel.material, "Steel");
        assert_eq!(steel.recommended_order, 16);
        assert_eq!(steel.urgency, Urgency::Ok);

        assert_eq!(plan.bulk_groups.len(), 1);
        let group = &plan.bulk_groups[0];
        assert_eq!(group.group_name, "Cement + Steel");
        assert_eq!(group.total_quantity, 101);
        assert_eq!(group.avg_reliability, 95);
        assert_eq!(group.avg_lead_time_days, 6);
        assert!((group.estimated_savings - 5.05).abs() < 1e-9);

        assert_eq!(cement.bulk_group.as_deref(), Some("Cement + Steel"));
        assert_eq!(steel.bulk_group.as_deref(), Some("Cement + Steel"));
    }

    // ---- grouping ----

    #[test]
    fn duplicate_materials_merge_into_one_row() {
        let mut second = record("Cement", 30.0, 70.0, 80.0, 9);
        second.historical_total = 120.0;
        second.supplier = Some("Beta Supply".to_string());

        let mut first = record("Cement", 100.0, 40.0, 100.0, 5);
        first.historical_total = 300.0;
        first.supplier = Some("Acme".to_string());

        let plan = run(vec![first, second], vec![]);

        assert_eq!(plan.materials.len(), 1);
        let cement = &plan.materials[0];
        // Demand and historical totals accumulate.
        assert_eq!(cement.forecasted_demand, 130.0);
        assert_eq!(cement.historical_total, 420.0);
        // Scalars come from the most recently seen record.
        assert_eq!(cement.current_inventory, 70.0);
        assert_eq!(cement.supplier.as_deref(), Some("Beta Supply"));
        assert_eq!(cement.supplier_reliability, 80.0);
        assert_eq!(cement.lead_time_days, 9);
    }

    #[test]
    fn materials_keep_first_seen_order() {
        let plan = run(
            vec![
                record("Steel", 10.0, 10.0, 100.0, 0),
                record("Cement", 10.0, 10.0, 50.0, 20),
                record("Steel", 5.0, 10.0, 100.0, 0),
            ],
            vec![],
        );

        let names: Vec<&str> = plan.materials.iter().map(|m| m.material.as_str()).collect();
        assert_eq!(names, vec!["Steel", "Cement"]);
    }

    // ---- bulk hints ----

    #[test]
    fn hints_replace_the_computed_formula() {
        let plan = run(
            vec![record("Cement", 100.0, 40.0, 100.0, 5)],
            vec![
                BulkOrderHint {
                    material: "Cement".to_string(),
                    recommended_order_quantity: 12.0,
                },
                BulkOrderHint {
                    material: "Cement".to_string(),
                    recommended_order_quantity: 8.5,
                },
            ],
        );

        // 12 + 8.5 = 20.5, rounded — not the formula's 85.
        assert_eq!(plan.materials[0].recommended_order, 21);
    }

    #[test]
    fn hints_for_unknown_materials_are_ignored() {
        let plan = run(
            vec![record("Cement", 100.0, 40.0, 100.0, 5)],
            vec![BulkOrderHint {
                material: "Gravel".to_string(),
                recommended_order_quantity: 500.0,
            }],
        );

        assert_eq!(plan.materials.len(), 1);
        assert_eq!(plan.materials[0].material, "Cement");
        assert_eq!(plan.materials[0].recommended_order, 85);
    }

    // ---- reorder formula ----

    #[test]
    fn half_reliability_doubles_the_buffer() {
        // factor 0.5 -> buffer 0.5 -> 100 * 1.5 - 0 = 150.
        let plan = run(vec![record("Cement", 100.0, 0.0, 50.0, 0)], vec![]);
        assert_eq!(plan.materials[0].recommended_order, 150);
    }

    #[test]
    fn zero_reliability_is_floored_not_divided_by_zero() {
        // factor floors at 0.01 -> buffer 25 -> 100 * 26 = 2600.
        let plan = run(vec![record("Cement", 100.0, 0.0, 0.0, 0)], vec![]);
        assert_eq!(plan.materials[0].recommended_order, 2600);
    }

    #[test]
    fn overstock_clamps_recommendation_to_zero() {
        let plan = run(vec![record("Cement", 10.0, 5000.0, 100.0, 0)], vec![]);
        assert_eq!(plan.materials[0].recommended_order, 0);
    }

    // ---- urgency boundaries ----

    #[test]
    fn inventory_below_half_demand_is_critical() {
        let plan = run(vec![record("Cement", 100.0, 49.9, 100.0, 0)], vec![]);
        assert_eq!(plan.materials[0].urgency, Urgency::Critical);
    }

    #[test]
    fn inventory_exactly_half_demand_is_urgent_not_critical() {
        let plan = run(vec![record("Cement", 100.0, 50.0, 100.0, 0)], vec![]);
        assert_eq!(plan.materials[0].urgency, Urgency::Urgent);
    }

    #[test]
    fn inventory_exactly_ninety_percent_demand_is_ok() {
        let plan = run(vec![record("Cement", 100.0, 90.0, 100.0, 0)], vec![]);
        assert_eq!(plan.materials[0].urgency, Urgency::Ok);
    }

    #[test]
    fn zero_demand_is_ok() {
        let plan = run(vec![record("Cement", 0.0, 0.0, 100.0, 0)], vec![]);
        assert_eq!(plan.materials[0].urgency, Urgency::Ok);
    }

    // ---- order dates ----

    #[test]
    fn order_date_is_snapshot_date_plus_lead_time() {
        let plan = run(vec![record("Cement", 10.0, 10.0, 100.0, 45)], vec![]);
        assert_eq!(
            plan.materials[0].recommended_order_date,
            NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
        );
    }

    #[test]
    fn zero_lead_time_means_order_today() {
        let plan = run(vec![record("Cement", 10.0, 10.0, 100.0, 0)], vec![]);
        assert_eq!(plan.materials[0].recommended_order_date, as_of());
    }

    #[test]
    fn absurd_lead_time_saturates_the_order_date() {
        // Lead times past the calendar's range saturate instead of
        // panicking; the engine stays total even without ingest clamping.
        let plan = run(vec![record("Cement", 10.0, 10.0, 100.0, u32::MAX)], vec![]);
        assert_eq!(plan.materials[0].recommended_order_date, NaiveDate::MAX);
    }

    #[test]
    fn extreme_backend_lead_times_survive_the_full_pipeline() {
        let (records, hints) = demandcast_ingest::parse_usage_payload(
            r#"{"records":[{"material":"Cement","yhat":100,"leadTime":99999999999}]}"#,
        )
        .unwrap();

        let plan = summarize(&records, &hints, as_of(), &SummaryConfig::default());

        assert_eq!(plan.materials.len(), 1);
        assert_eq!(
            plan.materials[0].lead_time_days,
            demandcast_ingest::MAX_LEAD_TIME_DAYS
        );
        assert_eq!(
            plan.materials[0].recommended_order_date,
            as_of() + Duration::days(i64::from(demandcast_ingest::MAX_LEAD_TIME_DAYS))
        );
    }

    // ---- job / config ----

    #[test]
    fn job_rejects_snapshot_for_another_project() {
        let ours = ProjectId::new();
        let theirs = ProjectId::new();

        let snapshot = UsageSnapshot::new(theirs, as_of());
        let err = DemandSummaryJob::new(ours, snapshot).run().unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn job_rejects_non_positive_buffer_factor() {
        let project_id = ProjectId::new();
        let snapshot = UsageSnapshot::new(project_id, as_of())
            .with_records(vec![record("Cement", 100.0, 40.0, 100.0, 5)]);

        let err = DemandSummaryJob::new(project_id, snapshot)
            .with_buffer_factor(0.0)
            .run()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn job_rejects_urgent_ratio_below_critical_ratio() {
        let project_id = ProjectId::new();
        let snapshot = UsageSnapshot::new(project_id, as_of());

        let config = SummaryConfig {
            critical_ratio: 0.9,
            urgent_ratio: 0.5,
            ..SummaryConfig::default()
        };
        let err = DemandSummaryJob::new(project_id, snapshot)
            .with_config(config)
            .run()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn job_runs_the_full_pipeline() {
        let project_id = ProjectId::new();
        let snapshot = UsageSnapshot::new(project_id, as_of()).with_records(vec![
            record("Cement", 100.0, 40.0, 100.0, 5),
            record("Steel", 50.0, 48.0, 90.0, 7),
        ]);

        let plan = DemandSummaryJob::new(project_id, snapshot).run().unwrap();
        assert_eq!(plan.materials.len(), 2);
        assert_eq!(plan.bulk_groups.len(), 1);
    }

    // ---- properties ----

    fn arb_record() -> impl Strategy<Value = MaterialUsageRecord> {
        (
            prop::sample::select(vec!["Cement", "Steel", "Sand", "Gravel", "Rebar"]),
            0.0f64..10_000.0,
            0.0f64..10_000.0,
            0.0f64..10_000.0,
            0.0f64..100.0,
            0u32..60,
        )
            .prop_map(
                |(material, demand, historical, inventory, reliability, lead)| {
                    MaterialUsageRecord {
                        material: material.to_string(),
                        forecasted_demand: demand,
                        historical_total: historical,
                        current_inventory: inventory,
                        supplier: None,
                        supplier_reliability: reliability,
                        lead_time_days: lead,
                    }
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: one summary row per distinct material name.
        #[test]
        fn one_row_per_distinct_material(
            records in prop::collection::vec(arb_record(), 1..40)
        ) {
            let plan = summarize(&records, &[], as_of(), &SummaryConfig::default());

            let mut names: Vec<&str> =
                records.iter().map(|r| r.material.as_str()).collect();
            names.sort_unstable();
            names.dedup();

            prop_assert_eq!(plan.materials.len(), names.len());
        }

        /// Property: output demand per material equals the sum of its input
        /// rows' demand.
        #[test]
        fn demand_accumulates_across_duplicate_rows(
            records in prop::collection::vec(arb_record(), 1..40)
        ) {
            let plan = summarize(&records, &[], as_of(), &SummaryConfig::default());

            for summary in &plan.materials {
                let expected: f64 = records
                    .iter()
                    .filter(|r| r.material == summary.material)
                    .map(|r| r.forecasted_demand)
                    .sum();
                prop_assert!((summary.forecasted_demand - expected).abs() < 1e-6);
            }
        }

        /// Property: recommended order quantities are never negative, even
        /// with heavy overstock. (They are unsigned, so the real assertion
        /// is that the clamp keeps the float path from going negative before
        /// conversion.)
        #[test]
        fn recommendation_formula_never_goes_negative(
            demand in 0.0f64..10_000.0,
            inventory in 0.0f64..100_000.0,
            reliability in 0.0f64..100.0,
        ) {
            let r = MaterialUsageRecord {
                forecasted_demand: demand,
                current_inventory: inventory,
                supplier_reliability: reliability,
                ..MaterialUsageRecord::named("Cement")
            };
            let plan = summarize(&[r], &[], as_of(), &SummaryConfig::default());
            // u64 output; reaching here without wrap-around panics is the point.
            prop_assert!(plan.materials[0].recommended_order < u64::MAX);
        }

        /// Property: the engine is total — any lead time and any magnitude
        /// of demand/inventory yields a plan, never a panic.
        #[test]
        fn numeric_extremes_still_yield_a_plan(
            demand in 0.0f64..1e12,
            inventory in 0.0f64..1e12,
            reliability in 0.0f64..100.0,
            lead in proptest::num::u32::ANY,
        ) {
            let r = MaterialUsageRecord {
                forecasted_demand: demand,
                current_inventory: inventory,
                supplier_reliability: reliability,
                lead_time_days: lead,
                ..MaterialUsageRecord::named("Cement")
            };
            let plan = summarize(&[r], &[], as_of(), &SummaryConfig::default());
            prop_assert_eq!(plan.materials.len(), 1);
        }

        /// Property: holding all else fixed, a less reliable supplier never
        /// gets a smaller recommendation.
        #[test]
        fn lower_reliability_never_shrinks_the_order(
            demand in 0.0f64..10_000.0,
            inventory in 0.0f64..10_000.0,
            hi in 0.0f64..100.0,
            lo in 0.0f64..100.0,
        ) {
            let (hi, lo) = if hi >= lo { (hi, lo) } else { (lo, hi) };

            let base = MaterialUsageRecord {
                forecasted_demand: demand,
                current_inventory: inventory,
                ..MaterialUsageRecord::named("Cement")
            };
            let more_reliable = MaterialUsageRecord {
                supplier_reliability: hi,
                ..base.clone()
            };
            let less_reliable = MaterialUsageRecord {
                supplier_reliability: lo,
                ..base
            };

            let config = SummaryConfig::default();
            let high = summarize(&[more_reliable], &[], as_of(), &config);
            let low = summarize(&[less_reliable], &[], as_of(), &config);

            prop_assert!(
                low.materials[0].recommended_order >= high.materials[0].recommended_order
            );
        }
    }
}
