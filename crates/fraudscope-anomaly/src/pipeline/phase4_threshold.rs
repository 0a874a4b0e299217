//! Phase 4: Threshold selection.
//!
//! An explicit cutoff is used as-is; otherwise the threshold is the
//! `(100 − percent)`-th percentile of the metric distribution, so that
//! roughly `percent`% of records end up flagged. The indirection lets
//! callers say "flag the worst X%" without knowing the metric's scale.

use fraudscope_core::errors::{AnomalyError, AnomalyResult};

use crate::algorithms::percentile::percentile;

/// Derive the decision threshold for a metric distribution.
pub fn select_threshold(
    metrics: &[f64],
    explicit: Option<f64>,
    percent: f64,
) -> AnomalyResult<f64> {
    if let Some(threshold) = explicit {
        return Ok(threshold);
    }
    if !(percent > 0.0 && percent <= 100.0) {
        return Err(AnomalyError::invalid_parameter(
            "percent",
            format!("{percent} is outside (0, 100]"),
        ));
    }
    Ok(percentile(metrics, 100.0 - percent))
}
