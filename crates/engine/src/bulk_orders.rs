//! Bulk-purchase pairing.
//!
//! O(n²) over distinct materials; acceptable because a project's material
//! list is tens of rows, not thousands. A clustering pass (bucketing by
//! rounded lead time/reliability) would replace this if that ever changes.

use demandcast_core::{BulkGroup, MaterialSummary};

use crate::demand_summary::SummaryConfig;

/// Pair materials with similar lead time and reliability into bulk groups.
///
/// Every unordered pair (i, j) is checked in insertion order (i ascending,
/// j ascending within i). A qualifying pair emits a group and stamps both
/// members' `bulk_group` label, overwriting any label from an earlier pair.
/// Overlapping membership with last-match-wins labeling is the published
/// behavior; groups are not mutually exclusive.
pub fn discover_bulk_groups(
    materials: &mut [MaterialSummary],
    config: &SummaryConfig,
) -> Vec<BulkGroup> {
    let mut groups: Vec<BulkGroup> = Vec::new();

    for i in 0..materials.len() {
        for j in (i + 1)..materials.len() {
            let lead_gap = materials[i]
                .lead_time_days
                .abs_diff(materials[j].lead_time_days);
            let reliability_gap =
                (materials[i].supplier_reliability - materials[j].supplier_reliability).abs();

            if lead_gap > config.max_lead_gap_days || reliability_gap > config.max_reliability_gap
            {
                continue;
            }

            let group_name = format!("{} + {}", materials[i].material, materials[j].material);
            let total_quantity = materials[i].recommended_order + materials[j].recommended_order;
            let avg_reliability = ((materials[i].supplier_reliability
                + materials[j].supplier_reliability)
                / 2.0)
                .round() as u32;
            let avg_lead_time_days = ((f64::from(materials[i].lead_time_days)
                + f64::from(materials[j].lead_time_days))
                / 2.0)
                .round() as u32;

            materials[i].bulk_group = Some(group_name.clone());
            materials[j].bulk_group = Some(group_name.clone());

            groups.push(BulkGroup {
                group_name,
                total_quantity,
                avg_reliability,
                avg_lead_time_days,
                estimated_savings: total_quantity as f64 * config.savings_rate,
            });
        }
    }

    groups
}
