//! Two-class threshold selection by minimizing the summed within-class
//! sum of squares over a normalized histogram (Otsu's method).
//!
//! For a candidate `t` the levels split into `low = [0, t)` and
//! `high = [t, 256)`. Each side's mean is the probability-weighted mean
//! `Σ i·p(i) / max(Σ p(i), MEAN_EPSILON)`; the candidate's objective is
//! `Σ_low (i - mean_low)² + Σ_high (i - mean_high)²`, summed over levels.
//! The smallest objective wins, first candidate on ties.

use crate::histogram::{normalized_histogram, GrayHistogram, LEVELS};
use crate::ThresholdError;
use imseg_core::GrayImageView;
use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Floor for a side's probability mass when computing its mean.
///
/// An empty side gets mean 0 instead of a division by zero.
pub const MEAN_EPSILON: f64 = 1e-5;

/// Smallest candidate threshold.
pub const MIN_THRESHOLD: u8 = 1;
/// Largest candidate threshold.
pub const MAX_THRESHOLD: u8 = 255;

/// Winning candidate of the threshold scan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OtsuSelection {
    pub threshold: u8,
    /// Summed within-class sum of squares at `threshold`.
    pub objective: f64,
}

/// Objective of a single candidate, computed directly over the levels.
pub fn otsu_objective(hist: &GrayHistogram, threshold: u8) -> f64 {
    let p = hist.bins();
    let t = threshold as usize;
    side_sum_of_squares(p, 0, t) + side_sum_of_squares(p, t, LEVELS)
}

fn side_sum_of_squares(p: &[f64], start: usize, end: usize) -> f64 {
    let mass: f64 = p[start..end].iter().sum();
    let weighted: f64 = (start..end).map(|i| i as f64 * p[i]).sum();
    let mean = weighted / mass.max(MEAN_EPSILON);
    (start..end).map(|i| (i as f64 - mean).powi(2)).sum()
}

/// Scan every candidate threshold and return the best one with its objective.
///
/// Each candidate goes through [`otsu_objective`], so exact ties between
/// neighbouring thresholds resolve to the lower one.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(hist)))]
pub fn otsu_select(hist: &GrayHistogram) -> OtsuSelection {
    let mut best = OtsuSelection {
        threshold: MIN_THRESHOLD,
        objective: f64::INFINITY,
    };

    for t in MIN_THRESHOLD..=MAX_THRESHOLD {
        let objective = otsu_objective(hist, t);
        if objective < best.objective {
            best = OtsuSelection {
                threshold: t,
                objective,
            };
        }
    }

    debug!(
        "otsu threshold {} (objective {:.3})",
        best.threshold, best.objective
    );
    best
}

/// Threshold minimizing the summed within-class sum of squares.
///
/// The result lies in `MIN_THRESHOLD..=MAX_THRESHOLD`.
pub fn otsu_threshold(hist: &GrayHistogram) -> u8 {
    otsu_select(hist).threshold
}

/// Histogram + Otsu in one call.
pub fn threshold_image(img: &GrayImageView<'_>) -> Result<u8, ThresholdError> {
    let hist = normalized_histogram(img)?;
    Ok(otsu_threshold(&hist))
}
