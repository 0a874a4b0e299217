//! Report rows handed back to the presentation layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-entity aggregation result.
///
/// Created on the first record seen for an entity, count-incremented
/// for each later record whose metric exceeds the threshold, and
/// immutable once the aggregation pass completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub entity_id: String,
    /// Representative metadata, captured from the entity's first record.
    pub metadata: BTreeMap<String, String>,
    /// Records whose outlier metric exceeded the threshold.
    pub outlier_count: usize,
    /// Total records seen for this entity.
    pub total_records: usize,
}

impl EntitySummary {
    /// Fraction of this entity's records flagged as outliers.
    pub fn outlier_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            self.outlier_count as f64 / self.total_records as f64
        }
    }
}

/// The final ranked table: worst entities first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedReport {
    /// Entities sorted descending by `outlier_count`, ties broken by
    /// `entity_id` ascending, truncated to the configured top-N.
    pub entities: Vec<EntitySummary>,
    /// The decision threshold the counts were computed against.
    pub threshold: f64,
    /// Total records scored in this run.
    pub total_records: usize,
}
