//! Phase 1: Feature matrix construction.
//!
//! Projects configured record fields into a row-major numeric matrix.
//! Row order preserves input order so scores can be re-attached to
//! records later; column order is config-derived, never incidental.

use fraudscope_core::errors::{AnomalyError, AnomalyResult};
use fraudscope_core::record::NumericFieldSource;

/// Numeric matrix with its ordered column names.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    /// Regression fields in configured order, then the response field
    /// if it was requested.
    pub columns: Vec<String>,
    /// One row per input record, in input order.
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }
}

/// Build a [`FeatureMatrix`] from records.
///
/// Field lookup is exact-name; the first missing field on any record
/// aborts the build with an error naming the field and the record.
pub fn build_matrix<S: NumericFieldSource>(
    records: &[S],
    regression_vars: &[String],
    response_var: &str,
    use_response_var: bool,
) -> AnomalyResult<FeatureMatrix> {
    let mut columns: Vec<String> = regression_vars.to_vec();
    if use_response_var {
        columns.push(response_var.to_string());
    }

    let mut rows = Vec::with_capacity(records.len());
    for (row_idx, record) in records.iter().enumerate() {
        let mut row = Vec::with_capacity(columns.len());
        for column in &columns {
            let value = record
                .numeric(column)
                .ok_or_else(|| AnomalyError::MissingField {
                    field: column.clone(),
                    entity_id: record.entity_id().to_string(),
                    row: row_idx,
                })?;
            row.push(value);
        }
        rows.push(row);
    }

    Ok(FeatureMatrix { columns, rows })
}
