//! Scalar feature extraction for the cluster-count sweep.

use crate::core::GrayImageView;

/// Default cap on the number of sampled intensities.
///
/// The silhouette is quadratic in the number of points.
pub const DEFAULT_MAX_POINTS: usize = 200;

/// Pixel intensities sampled with a uniform stride, at most `max_points`.
///
/// `max_points == 0` keeps every pixel.
pub fn sample_intensities(img: &GrayImageView<'_>, max_points: usize) -> Vec<f64> {
    let n = img.data.len();
    let step = if max_points == 0 || n <= max_points {
        1
    } else {
        n.div_ceil(max_points)
    };
    img.data.iter().step_by(step).map(|&v| v as f64).collect()
}

/// Parse a comma separated list of numbers, ignoring blanks.
pub fn parse_values(raw: &str) -> Result<Vec<f64>, std::num::ParseFloatError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GrayImage;

    #[test]
    fn caps_sample_count() {
        let img = GrayImage::from_fn(30, 30, |r, c| ((r + c) % 256) as u8);
        let sampled = sample_intensities(&img.view(), 200);
        assert!(sampled.len() <= 200);
        assert!(sampled.len() >= 150);
        assert_eq!(sampled[0], 0.0);
    }

    #[test]
    fn small_images_are_kept_whole() {
        let img = GrayImage::filled(4, 4, 9);
        assert_eq!(sample_intensities(&img.view(), 200).len(), 16);
        assert_eq!(sample_intensities(&img.view(), 0).len(), 16);
    }

    #[test]
    fn parses_value_lists() {
        assert_eq!(parse_values("1, 2.5,,3").unwrap(), vec![1.0, 2.5, 3.0]);
        assert!(parse_values("1,x").is_err());
    }
}
