//! 8-neighbour local binary pattern codes.
//!
//! Each neighbour contributes one bit, set when the ratio
//! `min(n, c) / max(n, c, 1e-5)` between neighbour `n` and center `c` rounds
//! to 1. Rounding is half-to-even, so a ratio of exactly 0.5 gives 0.
//! Neighbours outside the image read as 0. The first neighbour in
//! [`NEIGHBORS`] is the most significant bit.

use imseg_core::{GrayImage, GrayImageView};
use imseg_threshold::{normalized_histogram, GrayHistogram, ThresholdError};
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Neighbour offsets as `(drow, dcol)`, clockwise from the upper-left.
pub const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

/// Floor for the ratio denominator.
pub const RATIO_EPSILON: f64 = 1e-5;

#[inline]
fn similarity_bit(neighbor: u8, center: u8) -> u8 {
    let n = neighbor as f64;
    let c = center as f64;
    let ratio = n.min(c) / n.max(c).max(RATIO_EPSILON);
    ratio.round_ties_even() as u8
}

/// LBP code of a single pixel.
///
/// # Panics
/// If `(row, col)` is outside the image.
pub fn lbp_code_at(img: &GrayImageView<'_>, row: usize, col: usize) -> u8 {
    let center = img.get(row, col);
    NEIGHBORS.iter().fold(0u8, |code, &(dr, dc)| {
        let n = img
            .get_checked(row as isize + dr, col as isize + dc)
            .unwrap_or(0);
        (code << 1) | similarity_bit(n, center)
    })
}

/// Code image with the same shape as `img`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img), fields(width = img.width, height = img.height))
)]
pub fn local_binary_pattern(img: &GrayImageView<'_>) -> GrayImage {
    let out = GrayImage::from_fn(img.width, img.height, |row, col| lbp_code_at(img, row, col));
    debug!("lbp codes computed for {}x{} image", img.width, img.height);
    out
}

/// Normalized 256-bin histogram of the LBP codes of `img`.
pub fn lbp_histogram(img: &GrayImageView<'_>) -> Result<GrayHistogram, ThresholdError> {
    let codes = local_binary_pattern(img);
    normalized_histogram(&codes.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn uniform_image_interior_is_all_ones() {
        let img = GrayImage::filled(5, 4, 90);
        let codes = local_binary_pattern(&img.view());
        for row in 1..3 {
            for col in 1..4 {
                assert_eq!(codes.get(row, col), 255, "({row}, {col})");
            }
        }
    }

    #[test]
    fn border_pixels_lose_out_of_bounds_bits() {
        let img = GrayImage::filled(5, 4, 90);
        let codes = local_binary_pattern(&img.view());
        // upper-left corner: only right, lower-right and below are inside
        assert_eq!(codes.get(0, 0), 0b0001_1100);
        // top edge: (-1, *) missing
        assert_eq!(codes.get(0, 2), 0b0001_1111);
        // lower-right corner: only up-left, up and left are inside
        assert_eq!(codes.get(3, 4), 0b1100_0001);
    }

    #[test]
    fn zero_image_gives_zero_codes() {
        let img = GrayImage::filled(3, 3, 0);
        let codes = local_binary_pattern(&img.view());
        assert!(codes.data.iter().all(|&c| c == 0));
    }

    #[test]
    fn half_ratio_rounds_to_even() {
        assert_eq!(similarity_bit(50, 100), 0);
        assert_eq!(similarity_bit(100, 50), 0);
        assert_eq!(similarity_bit(51, 100), 1);
        assert_eq!(similarity_bit(0, 0), 0);
        assert_eq!(similarity_bit(7, 7), 1);
    }

    #[test]
    fn first_neighbor_is_most_significant() {
        // 3x3 of zeros with only the upper-left neighbour matching the center
        let mut img = GrayImage::filled(3, 3, 0);
        img.set(1, 1, 80);
        img.set(0, 0, 80);
        assert_eq!(lbp_code_at(&img.view(), 1, 1), 0b1000_0000);

        let mut img = GrayImage::filled(3, 3, 0);
        img.set(1, 1, 80);
        img.set(1, 0, 80);
        assert_eq!(lbp_code_at(&img.view(), 1, 1), 0b0000_0001);
    }

    #[test]
    fn histogram_of_uniform_image() {
        let img = GrayImage::filled(4, 4, 10);
        let hist = lbp_histogram(&img.view()).unwrap();
        assert_relative_eq!(hist.total(), 1.0, epsilon = 1e-12);
        // 2x2 interior out of 16 pixels
        assert_relative_eq!(hist.bins()[255], 4.0 / 16.0, epsilon = 1e-12);
        assert_relative_eq!(hist.bins()[0b0001_1100], 1.0 / 16.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_image_has_no_histogram() {
        let img = GrayImage::filled(0, 0, 0);
        assert_eq!(lbp_histogram(&img.view()), Err(ThresholdError::EmptyImage));
    }
}
