//! AnomalyEngine: validated configuration plus a per-invocation
//! pipeline run. Holds no mutable state across invocations, so one
//! engine can serve concurrent callers that clone it.

use fraudscope_core::config::{DetectorConfig, ScorerKind};
use fraudscope_core::errors::{AnomalyError, AnomalyResult};
use fraudscope_core::record::Record;
use fraudscope_core::report::RankedReport;
use tracing::info;

use crate::pipeline;

/// The anomaly scoring engine.
#[derive(Debug, Clone)]
pub struct AnomalyEngine {
    config: DetectorConfig,
}

impl AnomalyEngine {
    /// Create an engine, rejecting out-of-range parameters up front so
    /// a bad configuration never reaches the middle of a run.
    pub fn new(config: DetectorConfig) -> AnomalyResult<Self> {
        validate(&config)?;
        Ok(Self { config })
    }

    /// Engine with default CMS claim configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: DetectorConfig::default(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Score one batch of records and return the ranked report.
    ///
    /// Each call constructs its own matrices and summaries; results
    /// are deterministic for identical records and configuration.
    pub fn run(&self, records: &[Record]) -> AnomalyResult<RankedReport> {
        info!(
            records = records.len(),
            scorer = ?self.config.scorer,
            "starting anomaly scoring run"
        );
        let report = pipeline::run_pipeline(records, &self.config)?;
        info!(
            entities = report.entities.len(),
            threshold = report.threshold,
            "anomaly scoring run complete"
        );
        Ok(report)
    }
}

fn validate(config: &DetectorConfig) -> AnomalyResult<()> {
    if config.regression_vars.is_empty() && !config.use_response_var {
        return Err(AnomalyError::invalid_parameter(
            "regression_vars",
            "at least one matrix column is required",
        ));
    }
    match config.scorer {
        ScorerKind::CentroidDistance if config.num_clusters == 0 => {
            return Err(AnomalyError::invalid_parameter(
                "num_clusters",
                "must be a positive integer",
            ));
        }
        ScorerKind::Density if config.min_cluster_size <= 1 => {
            return Err(AnomalyError::invalid_parameter(
                "min_cluster_size",
                "must be greater than 1",
            ));
        }
        _ => {}
    }
    if config.threshold.is_none() && !(config.percent > 0.0 && config.percent <= 100.0) {
        return Err(AnomalyError::invalid_parameter(
            "percent",
            format!("{} is outside (0, 100]", config.percent),
        ));
    }
    if config.top_n == 0 {
        return Err(AnomalyError::invalid_parameter(
            "top_n",
            "must be a positive integer",
        ));
    }
    Ok(())
}
