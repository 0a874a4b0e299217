//! Phase 5: Per-entity frequency aggregation.
//!
//! Single pass over records grouped by entity id. The first record of
//! each entity contributes the representative metadata; every record
//! whose metric strictly exceeds the threshold increments the count.

use std::collections::HashMap;

use fraudscope_core::errors::{AnomalyError, AnomalyResult};
use fraudscope_core::record::Record;
use fraudscope_core::report::EntitySummary;

/// Aggregate per-record metrics into per-entity summaries.
///
/// `metrics` must be parallel to `records`; the pipeline guarantees
/// this once scoring has run. Output is sorted descending by
/// `outlier_count`, ties broken by `entity_id` ascending.
pub fn aggregate(
    records: &[Record],
    metrics: &[f64],
    threshold: f64,
) -> AnomalyResult<Vec<EntitySummary>> {
    if metrics.len() != records.len() {
        return Err(AnomalyError::precondition("aggregation", "scoring"));
    }

    let mut by_entity: HashMap<&str, EntitySummary> = HashMap::new();
    for (record, &metric) in records.iter().zip(metrics.iter()) {
        let summary = by_entity
            .entry(record.entity_id.as_str())
            .or_insert_with(|| EntitySummary {
                entity_id: record.entity_id.clone(),
                metadata: record.metadata.clone(),
                outlier_count: 0,
                total_records: 0,
            });
        summary.total_records += 1;
        if metric > threshold {
            summary.outlier_count += 1;
        }
    }

    let mut summaries: Vec<EntitySummary> = by_entity.into_values().collect();
    summaries.sort_by(|a, b| {
        b.outlier_count
            .cmp(&a.outlier_count)
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });
    Ok(summaries)
}
