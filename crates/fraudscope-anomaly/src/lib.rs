//! # fraudscope-anomaly
//!
//! 6-phase outlier scoring pipeline: matrix → scaling → scoring
//! (k-means centroid distance or HDBSCAN density) → threshold →
//! per-entity aggregation → ranking. Strictly forward; each phase
//! checks that its prerequisite has run.

pub mod algorithms;
pub mod engine;
pub mod pipeline;

pub use engine::AnomalyEngine;
pub use pipeline::PipelineRun;
