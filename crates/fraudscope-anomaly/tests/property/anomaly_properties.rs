//! Property tests for the scoring pipeline.

use proptest::collection::vec;
use proptest::prelude::*;

use fraudscope_core::config::InitMethod;
use fraudscope_core::record::Record;

use fraudscope_anomaly::algorithms::percentile::percentile;
use fraudscope_anomaly::pipeline::phase1_matrix::FeatureMatrix;
use fraudscope_anomaly::pipeline::phase2_scaling::{scale, StandardScaler};
use fraudscope_anomaly::pipeline::phase3_scoring::{CentroidDistanceScorer, OutlierScorer};
use fraudscope_anomaly::pipeline::phase5_aggregation::aggregate;

fn metric_values() -> impl Strategy<Value = Vec<f64>> {
    vec(-1e3..1e3f64, 1..50)
}

proptest! {
    #[test]
    fn percentile_stays_within_sample_bounds(values in metric_values(), p in 0.0..=100.0f64) {
        let result = percentile(&values, p);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(result >= min - 1e-9);
        prop_assert!(result <= max + 1e-9);
    }

    #[test]
    fn percentile_is_monotone_in_p(values in metric_values(), p1 in 0.0..=100.0f64, p2 in 0.0..=100.0f64) {
        let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
        prop_assert!(percentile(&values, lo) <= percentile(&values, hi) + 1e-9);
    }

    #[test]
    fn standard_scaling_normalizes_non_degenerate_columns(values in vec(-1e3..1e3f64, 3..40)) {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt();
        prop_assume!(std > 1e-6);

        let matrix = FeatureMatrix {
            columns: vec!["v".to_string()],
            rows: values.iter().map(|&v| vec![v]).collect(),
        };
        let scaled = scale(&matrix, &StandardScaler);
        let column: Vec<f64> = scaled.rows.iter().map(|r| r[0]).collect();
        let scaled_mean = column.iter().sum::<f64>() / n;
        let scaled_std =
            (column.iter().map(|v| (v - scaled_mean) * (v - scaled_mean)).sum::<f64>() / n).sqrt();
        prop_assert!(scaled_mean.abs() < 1e-7, "mean {scaled_mean}");
        prop_assert!((scaled_std - 1.0).abs() < 1e-6, "std {scaled_std}");
    }

    #[test]
    fn centroid_metrics_cover_every_row_and_are_nonnegative(
        rows in vec(vec(-50.0..50.0f64, 2..=2), 2..12),
        k_fraction in 0.0..1.0f64,
        seed in 0u64..1000,
    ) {
        let n = rows.len();
        let k = 1 + (k_fraction * (n - 1) as f64) as usize;
        let matrix = FeatureMatrix {
            columns: vec!["a".to_string(), "b".to_string()],
            rows,
        };
        let scaled = scale(&matrix, &StandardScaler);
        let scorer = CentroidDistanceScorer {
            num_clusters: k,
            init_method: InitMethod::KMeansPlusPlus,
            seed,
        };
        let scored = scorer.score(&scaled).unwrap();
        prop_assert_eq!(scored.metrics.len(), n);
        prop_assert!(scored.metrics.iter().all(|&m| m >= 0.0 && m.is_finite()));
    }

    #[test]
    fn aggregation_counts_match_brute_force(
        entities in vec(0usize..5, 1..60),
        threshold in -1.0..1.0f64,
        seed_metrics in vec(-1.0..1.0f64, 60),
    ) {
        let records: Vec<Record> = entities
            .iter()
            .map(|&e| Record::new(format!("entity-{e}")))
            .collect();
        let metrics = &seed_metrics[..records.len()];

        let summaries = aggregate(&records, metrics, threshold).unwrap();
        for summary in &summaries {
            let expected = records
                .iter()
                .zip(metrics.iter())
                .filter(|(r, &m)| r.entity_id == summary.entity_id && m > threshold)
                .count();
            prop_assert_eq!(summary.outlier_count, expected);
        }
        let total: usize = summaries.iter().map(|s| s.total_records).sum();
        prop_assert_eq!(total, records.len());
    }
}
