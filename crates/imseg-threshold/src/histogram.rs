//! Normalized 256-bin intensity histograms.

use crate::ThresholdError;
use imseg_core::GrayImageView;
use serde::{Deserialize, Serialize};

/// Number of intensity levels in an 8-bit image.
pub const LEVELS: usize = 256;

/// Probability mass function over the 256 intensity levels.
///
/// Bins are non-negative and sum to 1 (within floating tolerance).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrayHistogram {
    values: Vec<f64>,
}

impl GrayHistogram {
    /// Normalize raw per-level counts. Fails when every count is zero.
    pub fn from_counts(counts: &[u64; LEVELS]) -> Result<Self, ThresholdError> {
        let total: u64 = counts.iter().sum();
        if total == 0 {
            return Err(ThresholdError::EmptyImage);
        }
        let total = total as f64;
        let values = counts.iter().map(|&c| c as f64 / total).collect();
        Ok(Self { values })
    }

    /// Wrap an existing PMF. Negative entries are clamped to zero and the
    /// result is renormalized; an all-zero input is rejected.
    pub fn from_pmf(pmf: &[f64; LEVELS]) -> Result<Self, ThresholdError> {
        let clamped: Vec<f64> = pmf.iter().map(|&p| p.max(0.0)).collect();
        let total: f64 = clamped.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(ThresholdError::EmptyImage);
        }
        let values = clamped.into_iter().map(|p| p / total).collect();
        Ok(Self { values })
    }

    /// Probability of each level, indexed by intensity.
    #[inline]
    pub fn bins(&self) -> &[f64] {
        &self.values
    }

    /// Sum of all bins (1.0 up to rounding).
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Expected intensity `Σ i·p(i)`.
    pub fn mean(&self) -> f64 {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &p)| i as f64 * p)
            .sum()
    }

    /// Most probable level (lowest index on ties).
    pub fn mode(&self) -> u8 {
        let mut best = 0usize;
        for (i, &p) in self.values.iter().enumerate() {
            if p > self.values[best] {
                best = i;
            }
        }
        best as u8
    }
}

/// Count every intensity of `img` into 256 bins.
pub fn intensity_counts(img: &GrayImageView<'_>) -> [u64; LEVELS] {
    let mut counts = [0u64; LEVELS];
    for &v in img.data {
        counts[v as usize] += 1;
    }
    counts
}

/// Normalized intensity histogram of a grayscale image.
///
/// A zero-pixel image has no distribution and yields
/// [`ThresholdError::EmptyImage`].
pub fn normalized_histogram(img: &GrayImageView<'_>) -> Result<GrayHistogram, ThresholdError> {
    if img.is_empty() {
        return Err(ThresholdError::EmptyImage);
    }
    GrayHistogram::from_counts(&intensity_counts(img))
}
