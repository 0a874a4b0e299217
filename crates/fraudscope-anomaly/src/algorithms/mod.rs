//! Reusable numeric kernels shared by the pipeline phases.

pub mod distance;
pub mod kmeans;
pub mod percentile;
