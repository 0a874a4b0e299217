//! 6-phase scoring pipeline orchestrator.
//!
//! Phase 1: Matrix → Phase 2: Scaling → Phase 3: Scoring →
//! Phase 4: Threshold → Phase 5: Aggregation → Phase 6: Ranking.
//!
//! Stages run strictly forward. [`PipelineRun`] holds the state of
//! one invocation; calling a stage before its prerequisite fails with
//! a precondition error rather than being silently tolerated.

pub mod phase1_matrix;
pub mod phase2_scaling;
pub mod phase3_scoring;
pub mod phase4_threshold;
pub mod phase5_aggregation;
pub mod phase6_ranking;

use fraudscope_core::config::DetectorConfig;
use fraudscope_core::errors::{AnomalyError, AnomalyResult};
use fraudscope_core::record::Record;
use fraudscope_core::report::{EntitySummary, RankedReport};
use tracing::info;

use phase1_matrix::FeatureMatrix;
use phase2_scaling::{ScaledMatrix, ScalingStrategy, StandardScaler};
use phase3_scoring::{OutlierScorer, ScoredAssignments};

/// State of one pipeline invocation over one set of records.
///
/// Built → Scaled → Scored → Thresholded → Aggregated → Ranked.
/// Each invocation owns its matrices and summaries; nothing is shared
/// across runs.
#[derive(Debug)]
pub struct PipelineRun<'a> {
    records: &'a [Record],
    matrix: Option<FeatureMatrix>,
    scaled: Option<ScaledMatrix>,
    scored: Option<ScoredAssignments>,
    threshold: Option<f64>,
    summaries: Option<Vec<EntitySummary>>,
}

impl<'a> PipelineRun<'a> {
    /// Start a run. Rejects an empty dataset up front, since every
    /// downstream statistic is undefined on zero rows.
    pub fn new(records: &'a [Record]) -> AnomalyResult<Self> {
        if records.is_empty() {
            return Err(AnomalyError::EmptyDataset);
        }
        Ok(Self {
            records,
            matrix: None,
            scaled: None,
            scored: None,
            threshold: None,
            summaries: None,
        })
    }

    /// Phase 1: project configured fields into a numeric matrix.
    pub fn build_matrix(
        &mut self,
        regression_vars: &[String],
        response_var: &str,
        use_response_var: bool,
    ) -> AnomalyResult<&FeatureMatrix> {
        let matrix = phase1_matrix::build_matrix(
            self.records,
            regression_vars,
            response_var,
            use_response_var,
        )?;
        info!(
            rows = matrix.n_rows(),
            cols = matrix.n_cols(),
            "Phase 1: feature matrix built"
        );
        Ok(self.matrix.insert(matrix))
    }

    /// Phase 2: standardize matrix columns with the given strategy.
    pub fn scale_with(&mut self, strategy: &dyn ScalingStrategy) -> AnomalyResult<&ScaledMatrix> {
        let matrix = self
            .matrix
            .as_ref()
            .ok_or_else(|| AnomalyError::precondition("scaling", "matrix construction"))?;
        let scaled = phase2_scaling::scale(matrix, strategy);
        info!(strategy = strategy.name(), "Phase 2: scaling complete");
        Ok(self.scaled.insert(scaled))
    }

    /// Phase 3: attach one outlier metric per record.
    pub fn score_with(&mut self, scorer: &dyn OutlierScorer) -> AnomalyResult<&ScoredAssignments> {
        let scaled = self
            .scaled
            .as_ref()
            .ok_or_else(|| AnomalyError::precondition("scoring", "scaling"))?;
        let scored = scorer.score(scaled)?;
        info!(scorer = scorer.name(), "Phase 3: scoring complete");
        Ok(self.scored.insert(scored))
    }

    /// Phase 4: derive the decision threshold over the metrics.
    pub fn select_threshold(
        &mut self,
        explicit: Option<f64>,
        percent: f64,
    ) -> AnomalyResult<f64> {
        let scored = self
            .scored
            .as_ref()
            .ok_or_else(|| AnomalyError::precondition("threshold selection", "scoring"))?;
        let threshold = phase4_threshold::select_threshold(&scored.metrics, explicit, percent)?;
        info!(threshold, "Phase 4: threshold selected");
        self.threshold = Some(threshold);
        Ok(threshold)
    }

    /// Phase 5: aggregate outlier frequency per entity.
    pub fn aggregate(&mut self) -> AnomalyResult<&[EntitySummary]> {
        let scored = self
            .scored
            .as_ref()
            .ok_or_else(|| AnomalyError::precondition("aggregation", "scoring"))?;
        let threshold = self
            .threshold
            .ok_or_else(|| AnomalyError::precondition("aggregation", "threshold selection"))?;
        let summaries = phase5_aggregation::aggregate(self.records, &scored.metrics, threshold)?;
        info!(entities = summaries.len(), "Phase 5: aggregation complete");
        Ok(self.summaries.insert(summaries))
    }

    /// Phase 6: truncate to the worst `top_n` entities and finish the
    /// run, handing ownership of the report to the caller.
    pub fn rank(self, top_n: usize) -> AnomalyResult<RankedReport> {
        let summaries = self
            .summaries
            .ok_or_else(|| AnomalyError::precondition("ranking", "aggregation"))?;
        let threshold = self
            .threshold
            .ok_or_else(|| AnomalyError::precondition("ranking", "threshold selection"))?;
        let entities = phase6_ranking::select_top(summaries, top_n);
        info!(rows = entities.len(), "Phase 6: ranking complete");
        Ok(RankedReport {
            entities,
            threshold,
            total_records: self.records.len(),
        })
    }
}

/// Run all six phases in order with the configured scorer and the
/// default standard scaler.
pub fn run_pipeline(records: &[Record], config: &DetectorConfig) -> AnomalyResult<RankedReport> {
    let mut run = PipelineRun::new(records)?;
    run.build_matrix(
        &config.regression_vars,
        &config.response_var,
        config.use_response_var,
    )?;
    run.scale_with(&StandardScaler)?;
    let scorer = phase3_scoring::scorer_for(config);
    run.score_with(scorer.as_ref())?;
    run.select_threshold(config.threshold, config.percent)?;
    run.aggregate()?;
    run.rank(config.top_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_records() -> Vec<Record> {
        ["a", "a", "b", "c", "c", "c"]
            .iter()
            .zip([0.0, 0.1, 0.2, 10.0, 9.9, 10.1])
            .map(|(entity, value)| Record::new(*entity).with_field("v", value))
            .collect()
    }

    fn simple_config() -> DetectorConfig {
        DetectorConfig {
            regression_vars: vec!["v".to_string()],
            use_response_var: false,
            num_clusters: 2,
            percent: 50.0,
            ..DetectorConfig::default()
        }
    }

    #[test]
    fn empty_dataset_is_rejected_before_any_phase() {
        let err = PipelineRun::new(&[]).unwrap_err();
        assert!(matches!(err, AnomalyError::EmptyDataset));
    }

    #[test]
    fn aggregation_before_scoring_is_a_precondition_error() {
        let records = simple_records();
        let mut run = PipelineRun::new(&records).unwrap();
        let err = run.aggregate().unwrap_err();
        match err {
            AnomalyError::PreconditionViolation { stage, .. } => {
                assert_eq!(stage, "aggregation");
            }
            other => panic!("expected PreconditionViolation, got {other:?}"),
        }
    }

    #[test]
    fn scoring_before_scaling_is_a_precondition_error() {
        let records = simple_records();
        let mut run = PipelineRun::new(&records).unwrap();
        let config = simple_config();
        let scorer = phase3_scoring::scorer_for(&config);
        let err = run.score_with(scorer.as_ref()).unwrap_err();
        assert!(matches!(err, AnomalyError::PreconditionViolation { .. }));
    }

    #[test]
    fn ranking_before_aggregation_is_a_precondition_error() {
        let records = simple_records();
        let run = PipelineRun::new(&records).unwrap();
        let err = run.rank(10).unwrap_err();
        assert!(matches!(err, AnomalyError::PreconditionViolation { .. }));
    }

    #[test]
    fn full_run_in_order_succeeds() {
        let records = simple_records();
        let report = run_pipeline(&records, &simple_config()).unwrap();
        assert_eq!(report.total_records, 6);
        assert_eq!(report.entities.len(), 3);
    }
}
