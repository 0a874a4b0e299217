//! Phase 3: Outlier scoring.
//!
//! Two interchangeable strategies behind one trait: k-means centroid
//! distance and HDBSCAN density. Both attach one scalar per row,
//! higher = more anomalous, in input row order.

use fraudscope_core::config::{DetectorConfig, InitMethod, ScorerKind};
use fraudscope_core::errors::{AnomalyError, AnomalyResult};
use hdbscan::{Hdbscan, HdbscanHyperParams};
use tracing::debug;

use super::phase2_scaling::ScaledMatrix;
use crate::algorithms::distance::euclidean;
use crate::algorithms::kmeans;

/// Noise label used when a row belongs to no cluster.
pub const NOISE_LABEL: i64 = -1;

/// Per-row cluster labels and outlier metrics, parallel to the
/// scaled matrix rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAssignments {
    /// Assigned cluster label per row; [`NOISE_LABEL`] for noise.
    pub labels: Vec<i64>,
    /// One outlier metric per row, higher = more anomalous.
    pub metrics: Vec<f64>,
}

/// An outlier scoring strategy over a scaled matrix.
pub trait OutlierScorer {
    fn score(&self, scaled: &ScaledMatrix) -> AnomalyResult<ScoredAssignments>;

    /// Strategy name, for logging.
    fn name(&self) -> &'static str;
}

/// Build the configured scorer.
pub fn scorer_for(config: &DetectorConfig) -> Box<dyn OutlierScorer> {
    match config.scorer {
        ScorerKind::CentroidDistance => Box::new(CentroidDistanceScorer {
            num_clusters: config.num_clusters,
            init_method: config.init_method,
            seed: config.seed,
        }),
        ScorerKind::Density => Box::new(DensityOutlierScorer {
            min_cluster_size: config.min_cluster_size,
        }),
    }
}

/// K-means scorer: each row's metric is its Euclidean distance to the
/// centroid of its *own assigned* cluster, not to the nearest
/// arbitrary centroid.
#[derive(Debug, Clone)]
pub struct CentroidDistanceScorer {
    pub num_clusters: usize,
    pub init_method: InitMethod,
    pub seed: u64,
}

impl OutlierScorer for CentroidDistanceScorer {
    fn score(&self, scaled: &ScaledMatrix) -> AnomalyResult<ScoredAssignments> {
        let n_rows = scaled.n_rows();
        if self.num_clusters == 0 {
            return Err(AnomalyError::invalid_parameter(
                "num_clusters",
                "must be a positive integer",
            ));
        }
        if self.num_clusters > n_rows {
            return Err(AnomalyError::invalid_parameter(
                "num_clusters",
                format!("{} exceeds row count {n_rows}", self.num_clusters),
            ));
        }

        let fit = kmeans::fit(&scaled.rows, self.num_clusters, self.init_method, self.seed);
        debug!(
            k = self.num_clusters,
            inertia = fit.inertia,
            "k-means fit complete"
        );

        let metrics = scaled
            .rows
            .iter()
            .zip(fit.labels.iter())
            .map(|(row, &label)| euclidean(row, &fit.centroids[label]))
            .collect();
        let labels = fit.labels.iter().map(|&l| l as i64).collect();

        Ok(ScoredAssignments { labels, metrics })
    }

    fn name(&self) -> &'static str {
        "centroid-distance"
    }
}

/// HDBSCAN scorer: cluster labels come from the `hdbscan` crate; the
/// metric is a GLOSH-style score in [0, 1] derived from core
/// distances (`1 − eps_ref / core_distance`, where `eps_ref` is the
/// smallest core distance in the row's cluster, or globally for
/// noise). A row at its cluster's density peak scores 0; an isolated
/// row scores near 1.
#[derive(Debug, Clone)]
pub struct DensityOutlierScorer {
    pub min_cluster_size: usize,
}

impl OutlierScorer for DensityOutlierScorer {
    fn score(&self, scaled: &ScaledMatrix) -> AnomalyResult<ScoredAssignments> {
        if self.min_cluster_size <= 1 {
            return Err(AnomalyError::invalid_parameter(
                "min_cluster_size",
                "must be greater than 1",
            ));
        }

        let n_rows = scaled.n_rows();
        let labels = if n_rows < self.min_cluster_size {
            // Too few rows to form any cluster: everything is noise.
            vec![NOISE_LABEL; n_rows]
        } else {
            let features: Vec<Vec<f32>> = scaled
                .rows
                .iter()
                .map(|row| row.iter().map(|&v| v as f32).collect())
                .collect();

            let hyper_params = HdbscanHyperParams::builder()
                .min_cluster_size(self.min_cluster_size)
                .min_samples(1)
                .build();
            let clusterer = Hdbscan::new(&features, hyper_params);
            match clusterer.cluster() {
                Ok(labels) => labels.into_iter().map(|l| l as i64).collect(),
                // Degenerate geometry: treat everything as noise.
                Err(_) => vec![NOISE_LABEL; n_rows],
            }
        };

        let metrics = density_scores(&scaled.rows, &labels, self.min_cluster_size);
        Ok(ScoredAssignments { labels, metrics })
    }

    fn name(&self) -> &'static str {
        "density"
    }
}

/// Normalized density outlier scores from k-nearest core distances.
fn density_scores(rows: &[Vec<f64>], labels: &[i64], min_cluster_size: usize) -> Vec<f64> {
    let n = rows.len();
    if n == 1 {
        return vec![0.0];
    }
    let k = min_cluster_size.min(n - 1).max(1);

    // Core distance: distance to the k-th nearest neighbor.
    let core: Vec<f64> = (0..n)
        .map(|i| {
            let mut dists: Vec<f64> = (0..n)
                .filter(|&j| j != i)
                .map(|j| euclidean(&rows[i], &rows[j]))
                .collect();
            dists.sort_by(|a, b| a.partial_cmp(b).expect("NaN distance"));
            dists[k - 1]
        })
        .collect();

    // Density reference per cluster: the smallest core distance among
    // members (the cluster's density peak). Noise rows reference the
    // global density peak.
    let global_ref = core.iter().copied().fold(f64::INFINITY, f64::min);
    let cluster_ref = |label: i64| -> f64 {
        if label == NOISE_LABEL {
            return global_ref;
        }
        core.iter()
            .zip(labels.iter())
            .filter(|(_, &l)| l == label)
            .map(|(&c, _)| c)
            .fold(f64::INFINITY, f64::min)
    };

    labels
        .iter()
        .zip(core.iter())
        .map(|(&label, &c)| {
            let reference = cluster_ref(label).max(f64::EPSILON);
            let c = c.max(f64::EPSILON);
            (1.0 - reference / c).clamp(0.0, 1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::phase2_scaling::ColumnStats;

    fn scaled(rows: Vec<Vec<f64>>) -> ScaledMatrix {
        let n_cols = rows.first().map_or(0, Vec::len);
        ScaledMatrix {
            rows,
            stats: vec![
                ColumnStats {
                    center: 0.0,
                    spread: 1.0
                };
                n_cols
            ],
        }
    }

    fn two_blobs_with_outlier() -> ScaledMatrix {
        let mut rows = Vec::new();
        for i in 0..6 {
            rows.push(vec![0.0 + 0.01 * i as f64, 0.0]);
        }
        for i in 0..6 {
            rows.push(vec![5.0 + 0.01 * i as f64, 5.0]);
        }
        rows.push(vec![50.0, -50.0]); // isolated
        scaled(rows)
    }

    #[test]
    fn centroid_scorer_metric_per_row_and_nonnegative() {
        let matrix = two_blobs_with_outlier();
        for k in 1..=matrix.n_rows() {
            let scorer = CentroidDistanceScorer {
                num_clusters: k,
                init_method: InitMethod::KMeansPlusPlus,
                seed: 11,
            };
            let scored = scorer.score(&matrix).unwrap();
            assert_eq!(scored.metrics.len(), matrix.n_rows());
            assert!(scored.metrics.iter().all(|&m| m >= 0.0));
        }
    }

    #[test]
    fn centroid_scorer_rejects_zero_clusters() {
        let scorer = CentroidDistanceScorer {
            num_clusters: 0,
            init_method: InitMethod::KMeansPlusPlus,
            seed: 0,
        };
        let err = scorer.score(&scaled(vec![vec![1.0]])).unwrap_err();
        assert!(matches!(err, AnomalyError::InvalidParameter { .. }));
    }

    #[test]
    fn centroid_scorer_rejects_more_clusters_than_rows() {
        let scorer = CentroidDistanceScorer {
            num_clusters: 5,
            init_method: InitMethod::KMeansPlusPlus,
            seed: 0,
        };
        let err = scorer
            .score(&scaled(vec![vec![1.0], vec![2.0]]))
            .unwrap_err();
        assert!(matches!(err, AnomalyError::InvalidParameter { .. }));
    }

    #[test]
    fn centroid_distance_is_to_own_centroid() {
        // Two perfect clusters: every point equidistant from its own
        // centroid, and that distance is far below the distance to the
        // other centroid.
        let matrix = scaled(vec![
            vec![0.0],
            vec![0.2],
            vec![10.0],
            vec![10.2],
        ]);
        let scorer = CentroidDistanceScorer {
            num_clusters: 2,
            init_method: InitMethod::KMeansPlusPlus,
            seed: 5,
        };
        let scored = scorer.score(&matrix).unwrap();
        for &metric in &scored.metrics {
            assert!((metric - 0.1).abs() < 1e-9, "metric was {metric}");
        }
    }

    #[test]
    fn density_scorer_rejects_min_cluster_size_of_one() {
        let scorer = DensityOutlierScorer {
            min_cluster_size: 1,
        };
        let err = scorer.score(&scaled(vec![vec![1.0]])).unwrap_err();
        assert!(matches!(err, AnomalyError::InvalidParameter { .. }));
    }

    #[test]
    fn density_scores_are_bounded_and_rank_the_isolated_row_highest() {
        let matrix = two_blobs_with_outlier();
        let scorer = DensityOutlierScorer {
            min_cluster_size: 3,
        };
        let scored = scorer.score(&matrix).unwrap();
        assert_eq!(scored.metrics.len(), matrix.n_rows());
        assert!(scored.metrics.iter().all(|&m| (0.0..=1.0).contains(&m)));

        let outlier_score = *scored.metrics.last().unwrap();
        let max_blob_score = scored.metrics[..scored.metrics.len() - 1]
            .iter()
            .copied()
            .fold(0.0, f64::max);
        assert!(
            outlier_score > max_blob_score,
            "isolated row should score highest: {outlier_score} vs {max_blob_score}"
        );
    }

    #[test]
    fn density_scorer_handles_fewer_rows_than_min_cluster_size() {
        let matrix = scaled(vec![vec![0.0], vec![1.0]]);
        let scorer = DensityOutlierScorer {
            min_cluster_size: 5,
        };
        let scored = scorer.score(&matrix).unwrap();
        assert_eq!(scored.labels, vec![NOISE_LABEL, NOISE_LABEL]);
        assert_eq!(scored.metrics.len(), 2);
    }

    #[test]
    fn scorer_selection_follows_configuration() {
        let mut config = DetectorConfig::default();
        config.scorer = ScorerKind::Density;
        assert_eq!(scorer_for(&config).name(), "density");
        config.scorer = ScorerKind::CentroidDistance;
        assert_eq!(scorer_for(&config).name(), "centroid-distance");
    }
}
