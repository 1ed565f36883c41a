//! Silhouette coefficients for a labeled point set.
//!
//! For point `i` with label `c`:
//! - `a` is the mean distance to the other points labeled `c`,
//! - `b` is the smallest mean distance to the points of any other non-empty
//!   cluster,
//! - `s = (b - a) / max(a, b)`.
//!
//! A singleton cluster has no `a`; with no other non-empty cluster there is
//! no `b`. Such points, like any other non-finite coefficient, contribute 0.

use crate::ClusterError;

/// Distance between two scalar features.
#[inline]
pub fn absolute_distance(a: &f64, b: &f64) -> f64 {
    (a - b).abs()
}

fn validate(points: usize, labels: &[usize], k: usize) -> Result<(), ClusterError> {
    if points == 0 {
        return Err(ClusterError::EmptyFeatures);
    }
    if labels.len() != points {
        return Err(ClusterError::LengthMismatch {
            points,
            labels: labels.len(),
        });
    }
    if k < 2 {
        return Err(ClusterError::TooFewClusters { k });
    }
    if let Some((index, &label)) = labels.iter().enumerate().find(|&(_, &l)| l >= k) {
        return Err(ClusterError::InvalidLabel { index, label, k });
    }
    Ok(())
}

/// Per-point silhouette coefficients under an arbitrary metric.
pub fn silhouette_samples_with<P, D>(
    points: &[P],
    labels: &[usize],
    k: usize,
    metric: D,
) -> Result<Vec<f64>, ClusterError>
where
    D: Fn(&P, &P) -> f64,
{
    validate(points.len(), labels, k)?;

    let mut sums = vec![0f64; k];
    let mut counts = vec![0usize; k];
    let mut out = Vec::with_capacity(points.len());

    for (i, p) in points.iter().enumerate() {
        sums.iter_mut().for_each(|s| *s = 0.0);
        counts.iter_mut().for_each(|c| *c = 0);

        for (j, q) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            sums[labels[j]] += metric(p, q);
            counts[labels[j]] += 1;
        }

        let own = labels[i];
        let a = if counts[own] > 0 {
            sums[own] / counts[own] as f64
        } else {
            f64::NAN
        };
        let b = (0..k)
            .filter(|&c| c != own && counts[c] > 0)
            .map(|c| sums[c] / counts[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let s = (b - a) / a.max(b);
        out.push(if s.is_finite() { s } else { 0.0 });
    }

    Ok(out)
}

/// Per-point silhouette coefficients of scalar features.
pub fn silhouette_samples(
    features: &[f64],
    labels: &[usize],
    k: usize,
) -> Result<Vec<f64>, ClusterError> {
    silhouette_samples_with(features, labels, k, absolute_distance)
}

/// Mean silhouette coefficient under an arbitrary metric.
pub fn silhouette_score_with<P, D>(
    points: &[P],
    labels: &[usize],
    k: usize,
    metric: D,
) -> Result<f64, ClusterError>
where
    D: Fn(&P, &P) -> f64,
{
    let samples = silhouette_samples_with(points, labels, k, metric)?;
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Mean silhouette coefficient of scalar features (absolute difference metric).
pub fn silhouette_score(features: &[f64], labels: &[usize], k: usize) -> Result<f64, ClusterError> {
    silhouette_score_with(features, labels, k, absolute_distance)
}
