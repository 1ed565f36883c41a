//! Deterministic 1-D k-means (Lloyd iterations) over scalar features.
//!
//! Centers are seeded by farthest-point selection over the sorted data, so
//! repeated runs on the same input give the same labels. This is the
//! default [`ClusteringProvider`] for the cluster-count sweep.

use crate::ClusteringProvider;
use log::trace;
use serde::{Deserialize, Serialize};

/// Parameters for [`KMeans`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansParams {
    /// Max assignment/update rounds.
    pub max_iters: usize,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self { max_iters: 100 }
    }
}

/// Result of one k-means run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KMeansResult {
    /// Final centers, index = cluster id.
    pub centers: Vec<f64>,
    /// Cluster id per input feature.
    pub labels: Vec<usize>,
    /// Rounds actually run.
    pub iterations: usize,
}

#[derive(Clone, Debug, Default)]
pub struct KMeans {
    pub params: KMeansParams,
}

impl KMeans {
    pub fn new(params: KMeansParams) -> Self {
        Self { params }
    }

    /// Partition `features` into at most `k` clusters.
    ///
    /// `k == 0` or empty input yields no centers and no labels.
    pub fn fit(&self, features: &[f64], k: usize) -> KMeansResult {
        let n = features.len();
        if n == 0 || k == 0 {
            return KMeansResult {
                centers: Vec::new(),
                labels: Vec::new(),
                iterations: 0,
            };
        }

        let mut centers = seed_centers(features, k);
        let mut labels = vec![0usize; n];
        let mut iterations = 0;

        for iter in 0..self.params.max_iters.max(1) {
            iterations = iter + 1;

            // Assignment step.
            let mut changed = false;
            for (label, &x) in labels.iter_mut().zip(features) {
                let best = nearest_center(&centers, x);
                if *label != best {
                    *label = best;
                    changed = true;
                }
            }

            // Update step: mean of members; empty clusters keep their center.
            let mut sums = vec![0f64; k];
            let mut counts = vec![0usize; k];
            for (&x, &l) in features.iter().zip(labels.iter()) {
                sums[l] += x;
                counts[l] += 1;
            }
            for c in 0..k {
                if counts[c] > 0 {
                    centers[c] = sums[c] / counts[c] as f64;
                }
            }

            if !changed && iter > 0 {
                break;
            }
        }

        trace!("k-means k={k} converged after {iterations} rounds");

        KMeansResult {
            centers,
            labels,
            iterations,
        }
    }
}

impl ClusteringProvider for KMeans {
    fn assign(&mut self, features: &[f64], k: usize) -> Vec<usize> {
        self.fit(features, k).labels
    }
}

/// Farthest-point seeding: start from the smallest value, then repeatedly
/// add the value farthest from every chosen center (first in sorted order on
/// ties). Centers are returned ascending so labels follow intensity order.
fn seed_centers(features: &[f64], k: usize) -> Vec<f64> {
    let mut sorted = features.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut centers = Vec::with_capacity(k);
    centers.push(sorted[0]);
    let mut nearest: Vec<f64> = sorted.iter().map(|&x| (x - sorted[0]).abs()).collect();

    while centers.len() < k {
        let mut pick = 0usize;
        for (i, &d) in nearest.iter().enumerate() {
            if d > nearest[pick] {
                pick = i;
            }
        }
        let c = sorted[pick];
        centers.push(c);
        for (d, &x) in nearest.iter_mut().zip(&sorted) {
            *d = d.min((x - c).abs());
        }
    }

    centers.sort_by(|a, b| a.total_cmp(b));
    centers
}

/// Index of the closest center, lowest index on ties.
fn nearest_center(centers: &[f64], x: f64) -> usize {
    let mut best = 0usize;
    let mut best_dist = f64::INFINITY;
    for (c, &center) in centers.iter().enumerate() {
        let d = (x - center).abs();
        if d < best_dist {
            best = c;
            best_dist = d;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_three_separated_groups() {
        let features = [1.0, 2.0, 3.0, 50.0, 51.0, 52.0, 100.0, 101.0, 102.0];
        let res = KMeans::default().fit(&features, 3);
        assert_eq!(res.labels, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]);
        assert_eq!(res.centers, vec![2.0, 51.0, 101.0]);
    }

    #[test]
    fn labels_stay_in_range_when_k_exceeds_distinct_values() {
        let features = [4.0, 4.0, 4.0, 9.0];
        let res = KMeans::default().fit(&features, 3);
        assert_eq!(res.labels.len(), features.len());
        assert!(res.labels.iter().all(|&l| l < 3));
    }

    #[test]
    fn dominant_value_does_not_swallow_small_groups() {
        let mut features = vec![20.0; 70];
        features.extend(vec![130.0; 20]);
        features.extend(vec![230.0; 10]);
        let res = KMeans::default().fit(&features, 3);
        assert_eq!(res.centers, vec![20.0, 130.0, 230.0]);
    }

    #[test]
    fn seeds_spread_from_the_minimum() {
        assert_eq!(seed_centers(&[5.0, 1.0, 9.0, 4.0], 3), vec![1.0, 5.0, 9.0]);
    }

    #[test]
    fn is_deterministic() {
        let features: Vec<f64> = (0..40).map(|i| ((i * 37) % 23) as f64).collect();
        let km = KMeans::new(KMeansParams { max_iters: 20 });
        assert_eq!(km.fit(&features, 4), km.fit(&features, 4));
    }

    #[test]
    fn provider_returns_fit_labels() {
        let features = [0.0, 0.5, 9.0, 9.5];
        let mut km = KMeans::default();
        assert_eq!(km.assign(&features, 2), vec![0, 0, 1, 1]);
    }

    #[test]
    fn params_fill_missing_fields_from_default() {
        let params: KMeansParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, KMeansParams::default());
        let params: KMeansParams = serde_json::from_str(r#"{"max_iters": 7}"#).unwrap();
        assert_eq!(params.max_iters, 7);
    }

    #[test]
    fn empty_input_has_no_labels() {
        let res = KMeans::default().fit(&[], 3);
        assert!(res.labels.is_empty());
        assert!(res.centers.is_empty());
    }
}
