//! Cluster-count selection by silhouette sweep.

use crate::{silhouette_score, ClusterError};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Anything that can partition scalar features into `k` labeled groups.
///
/// Labels must lie in `0..k` and there must be one per feature.
pub trait ClusteringProvider {
    fn assign(&mut self, features: &[f64], k: usize) -> Vec<usize>;
}

impl<F> ClusteringProvider for F
where
    F: FnMut(&[f64], usize) -> Vec<usize>,
{
    fn assign(&mut self, features: &[f64], k: usize) -> Vec<usize> {
        self(features, k)
    }
}

/// Silhouette score obtained for one candidate `k`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KScore {
    pub k: usize,
    pub score: f64,
}

/// Outcome of [`optimize_cluster_count`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterCountSelection {
    pub best_k: usize,
    pub best_score: f64,
    /// Every evaluated candidate, ascending in `k`.
    pub scores: Vec<KScore>,
}

/// Candidate cluster counts for `n` features: `2..=n-2`.
pub fn candidate_range(n: usize) -> std::ops::RangeInclusive<usize> {
    2..=n.saturating_sub(2)
}

/// Pick the cluster count in `2..=n-2` with the highest mean silhouette.
///
/// The provider is called once per candidate. Ties keep the smallest `k`.
/// Fewer than 4 features leave no candidate and yield
/// [`ClusterError::EmptySweep`].
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(features, provider), fields(n = features.len()))
)]
pub fn optimize_cluster_count<P>(
    features: &[f64],
    provider: &mut P,
) -> Result<ClusterCountSelection, ClusterError>
where
    P: ClusteringProvider + ?Sized,
{
    let n = features.len();
    if n == 0 {
        return Err(ClusterError::EmptyFeatures);
    }
    if n < 4 {
        return Err(ClusterError::EmptySweep { points: n });
    }

    let mut scores = Vec::with_capacity(n - 3);
    let mut best: Option<KScore> = None;

    for k in candidate_range(n) {
        let labels = provider.assign(features, k);
        let score = silhouette_score(features, &labels, k)?;
        debug!("k={k} silhouette={score:.4}");

        let cand = KScore { k, score };
        scores.push(cand);
        if best.is_none_or(|b| score > b.score) {
            best = Some(cand);
        }
    }

    let best = best.ok_or(ClusterError::EmptySweep { points: n })?;
    info!(
        "selected k={} (silhouette {:.4}) out of {} candidates",
        best.k,
        best.score,
        scores.len()
    );

    Ok(ClusterCountSelection {
        best_k: best.k,
        best_score: best.score,
        scores,
    })
}
