/// Errors returned by histogram, threshold and mask operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("empty image: no pixels to build a histogram from")]
    EmptyImage,

    #[error("mask shape {got:?} does not match image shape {expected:?} (rows, cols)")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("region fraction must lie in (0, 1], got {0}")]
    InvalidFraction(f32),
}
