//! Lloyd-style k-means with k-means++ or uniform random seeding.
//!
//! The assignment step is rayon-parallel; it is a pure per-row argmin,
//! so output is bit-stable for a given seed.

use fraudscope_core::config::InitMethod;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::distance::squared_euclidean;

/// Maximum Lloyd iterations before giving up on convergence.
pub const MAX_ITER: usize = 100;

/// A fitted k-means model.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// One centroid per cluster, in scaled feature space.
    pub centroids: Vec<Vec<f64>>,
    /// Per-row assigned cluster label, parallel to the input rows.
    pub labels: Vec<usize>,
    /// Within-cluster sum of squared distances.
    pub inertia: f64,
}

/// Fit k-means on `data` (row-major, all rows equal length).
///
/// Caller guarantees `1 <= k <= data.len()` and a non-empty matrix.
pub fn fit(data: &[Vec<f64>], k: usize, init: InitMethod, seed: u64) -> KMeansFit {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = match init {
        InitMethod::KMeansPlusPlus => plus_plus_seeds(data, k, &mut rng),
        InitMethod::Random => random_seeds(data, k, &mut rng),
    };

    let mut labels = assign(data, &centroids);
    for _ in 0..MAX_ITER {
        centroids = update_centroids(data, &labels, &centroids);
        let next = assign(data, &centroids);
        if next == labels {
            break;
        }
        labels = next;
    }

    let inertia = data
        .iter()
        .zip(labels.iter())
        .map(|(row, &label)| squared_euclidean(row, &centroids[label]))
        .sum();

    KMeansFit {
        centroids,
        labels,
        inertia,
    }
}

/// Assign every row to its nearest centroid.
fn assign(data: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    data.par_iter()
        .map(|row| {
            let mut best = 0usize;
            let mut best_dist = f64::INFINITY;
            for (label, centroid) in centroids.iter().enumerate() {
                let dist = squared_euclidean(row, centroid);
                if dist < best_dist {
                    best_dist = dist;
                    best = label;
                }
            }
            best
        })
        .collect()
}

/// Recompute centroids as cluster means. An emptied cluster keeps its
/// previous centroid so k never shrinks mid-fit.
fn update_centroids(data: &[Vec<f64>], labels: &[usize], previous: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let k = previous.len();
    let dims = data[0].len();
    let mut sums = vec![vec![0.0f64; dims]; k];
    let mut counts = vec![0usize; k];

    for (row, &label) in data.iter().zip(labels.iter()) {
        counts[label] += 1;
        for (acc, value) in sums[label].iter_mut().zip(row.iter()) {
            *acc += value;
        }
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(label, (sum, count))| {
            if count == 0 {
                previous[label].clone()
            } else {
                sum.into_iter().map(|v| v / count as f64).collect()
            }
        })
        .collect()
}

/// k-means++ seeding: first centroid uniform, then proportional to
/// squared distance from the nearest already-chosen centroid.
fn plus_plus_seeds(data: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[rng.gen_range(0..data.len())].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = data
            .iter()
            .map(|row| {
                centroids
                    .iter()
                    .map(|c| squared_euclidean(row, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();

        let chosen = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            let mut index = data.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                if target < *w {
                    index = i;
                    break;
                }
                target -= w;
            }
            index
        } else {
            // All remaining points coincide with existing centroids.
            rng.gen_range(0..data.len())
        };
        centroids.push(data[chosen].clone());
    }
    centroids
}

/// Uniform random seeding over distinct row indices.
fn random_seeds(data: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    rand::seq::index::sample(rng, data.len(), k)
        .into_iter()
        .map(|i| data[i].clone())
        .collect()
}
