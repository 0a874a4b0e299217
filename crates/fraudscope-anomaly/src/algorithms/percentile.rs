//! Percentile over a sample, with linear interpolation between order
//! statistics (the NumPy `percentile` default). Interpolation choice
//! matters at tie boundaries, so it is fixed here rather than left to
//! the caller.

/// The `p`-th percentile of `values`, `p` in [0, 100].
///
/// Values need not be sorted. Returns the single element for a
/// one-element sample.
///
/// Panics on an empty slice; callers reject empty datasets before
/// any statistics run.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    assert!(!values.is_empty(), "percentile of empty sample");

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("NaN in metric values"));

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
