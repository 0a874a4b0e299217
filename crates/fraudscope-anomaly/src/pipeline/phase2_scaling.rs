//! Phase 2: Column scaling.
//!
//! Standardizes each matrix column independently with statistics fit
//! on that matrix alone. The fitted (center, spread) pairs are kept on
//! the output so the same scaling could be replayed on new data.

use super::phase1_matrix::FeatureMatrix;
use crate::algorithms::percentile::percentile;

/// Spread below this is treated as degenerate (zero-variance column).
const SPREAD_EPSILON: f64 = 1e-12;

/// Fitted per-column scaling statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    /// Value subtracted from the column (mean or median).
    pub center: f64,
    /// Divisor applied after centering (std or IQR); 1.0 for a
    /// degenerate column.
    pub spread: f64,
}

/// A scaled matrix plus the statistics that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledMatrix {
    pub rows: Vec<Vec<f64>>,
    pub stats: Vec<ColumnStats>,
}

impl ScaledMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

/// A swappable column-scaling strategy.
pub trait ScalingStrategy {
    /// Fit (center, spread) for one column of values.
    fn fit_column(&self, values: &[f64]) -> ColumnStats;

    /// Strategy name, for logging.
    fn name(&self) -> &'static str;
}

/// Z-score scaling: subtract the column mean, divide by the column
/// standard deviation (population).
///
/// A zero-variance column is centered but not divided: its spread is
/// recorded as 1.0 so no division by zero occurs and the matrix shape
/// stays config-derived.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScaler;

impl ScalingStrategy for StandardScaler {
    fn fit_column(&self, values: &[f64]) -> ColumnStats {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let std = variance.sqrt();
        ColumnStats {
            center: mean,
            spread: if std < SPREAD_EPSILON { 1.0 } else { std },
        }
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

/// Robust scaling: subtract the column median, divide by the
/// interquartile range. Less sensitive to the very outliers the
/// pipeline is hunting for.
#[derive(Debug, Clone, Copy, Default)]
pub struct RobustScaler;

impl ScalingStrategy for RobustScaler {
    fn fit_column(&self, values: &[f64]) -> ColumnStats {
        let median = percentile(values, 50.0);
        let iqr = percentile(values, 75.0) - percentile(values, 25.0);
        ColumnStats {
            center: median,
            spread: if iqr < SPREAD_EPSILON { 1.0 } else { iqr },
        }
    }

    fn name(&self) -> &'static str {
        "robust"
    }
}

/// Scale a matrix column-by-column with the given strategy.
pub fn scale(matrix: &FeatureMatrix, strategy: &dyn ScalingStrategy) -> ScaledMatrix {
    let n_cols = matrix.n_cols();
    let stats: Vec<ColumnStats> = (0..n_cols)
        .map(|col| {
            let values: Vec<f64> = matrix.rows.iter().map(|row| row[col]).collect();
            strategy.fit_column(&values)
        })
        .collect();

    let rows = matrix
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(stats.iter())
                .map(|(value, s)| (value - s.center) / s.spread)
                .collect()
        })
        .collect();

    ScaledMatrix { rows, stats }
}
