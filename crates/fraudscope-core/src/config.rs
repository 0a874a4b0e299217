//! Detector configuration.
//!
//! Field names, scorer selection, and cutoff parameters are supplied
//! by the caller; nothing in the pipeline hard-codes a column name.

use serde::{Deserialize, Serialize};

/// Default values for [`DetectorConfig`].
pub mod defaults {
    /// CMS claim columns used for regression by default.
    pub const REGRESSION_VARS: &[&str] = &[
        "line_srvc_cnt",
        "bene_unique_cnt",
        "bene_day_srvc_cnt",
        "average_medicare_allowed_amt",
        "average_submitted_chrg_amt",
    ];
    pub const RESPONSE_VAR: &str = "average_medicare_payment_amt";
    pub const USE_RESPONSE_VAR: bool = true;
    pub const NUM_CLUSTERS: usize = 8;
    pub const MIN_CLUSTER_SIZE: usize = 15;
    pub const PERCENT: f64 = 1.0;
    pub const TOP_N: usize = 10;
    pub const SEED: u64 = 0x5eed_cafe;
}

/// Which outlier scorer runs in the scoring phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScorerKind {
    /// K-means distance to own-cluster centroid.
    CentroidDistance,
    /// HDBSCAN density-based normalized score.
    Density,
}

/// Centroid seeding method for the k-means scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitMethod {
    #[serde(rename = "k-means++")]
    KMeansPlusPlus,
    #[serde(rename = "random")]
    Random,
}

/// Anomaly detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Regression field names, in matrix column order.
    pub regression_vars: Vec<String>,
    /// Response field name.
    pub response_var: String,
    /// Include the response field as a matrix column?
    pub use_response_var: bool,
    /// Which scoring strategy to use.
    pub scorer: ScorerKind,
    /// Cluster count for the centroid-distance scorer.
    pub num_clusters: usize,
    /// Centroid seeding method for the centroid-distance scorer.
    pub init_method: InitMethod,
    /// Minimum cluster size for the density scorer.
    pub min_cluster_size: usize,
    /// Explicit metric cutoff; overrides `percent` when present.
    pub threshold: Option<f64>,
    /// Flag the worst `percent`% of records; must be in (0, 100].
    pub percent: f64,
    /// Rows returned in the ranked report.
    pub top_n: usize,
    /// Seed for stochastic centroid seeding; fixed for reproducibility.
    pub seed: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            regression_vars: defaults::REGRESSION_VARS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            response_var: defaults::RESPONSE_VAR.to_string(),
            use_response_var: defaults::USE_RESPONSE_VAR,
            scorer: ScorerKind::CentroidDistance,
            num_clusters: defaults::NUM_CLUSTERS,
            init_method: InitMethod::KMeansPlusPlus,
            min_cluster_size: defaults::MIN_CLUSTER_SIZE,
            threshold: None,
            percent: defaults::PERCENT,
            top_n: defaults::TOP_N,
            seed: defaults::SEED,
        }
    }
}
