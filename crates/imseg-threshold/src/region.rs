//! Foreground masks, bounding boxes and masked companion images.

use crate::ThresholdError;
use imseg_core::{ColorImage, GrayImage, GrayImageView};
use log::warn;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Binary mask congruent to a source image, values in `{0, 1}`.
///
/// `1` marks foreground, `0` background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl BinaryMask {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn is_foreground(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == 1
    }

    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    /// Share of foreground pixels, `0.0` for an empty mask.
    pub fn foreground_ratio(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.count_foreground() as f64 / self.data.len() as f64
    }

    /// Mask as a displayable image: foreground 255, background 0.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| v * 255).collect(),
        }
    }
}

/// Inclusive `(row, col)` extent of the foreground.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_row: usize,
    pub min_col: usize,
    pub max_row: usize,
    pub max_col: usize,
}

impl BoundingBox {
    fn at(row: usize, col: usize) -> Self {
        Self {
            min_row: row,
            min_col: col,
            max_row: row,
            max_col: col,
        }
    }

    fn include(&mut self, row: usize, col: usize) {
        self.min_row = self.min_row.min(row);
        self.min_col = self.min_col.min(col);
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
    }

    /// Number of columns covered.
    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.min_row..=self.max_row).contains(&row) && (self.min_col..=self.max_col).contains(&col)
    }
}

fn accumulate(bbox: &mut Option<BoundingBox>, row: usize, col: usize) {
    match bbox {
        Some(b) => b.include(row, col),
        None => *bbox = Some(BoundingBox::at(row, col)),
    }
}

/// Label pixels as foreground/background around `threshold`.
///
/// When `reference < threshold` the low class `[0, threshold)` is background
/// (0) and the high class is foreground (1); otherwise the labels swap.
pub fn classify(img: &GrayImageView<'_>, threshold: u8, reference: f64) -> BinaryMask {
    let low_is_background = reference < threshold as f64;
    let data = img
        .data
        .iter()
        .map(|&v| {
            let high = v >= threshold;
            u8::from(high == low_is_background)
        })
        .collect();
    BinaryMask {
        width: img.width,
        height: img.height,
        data,
    }
}

/// Tight box around all foreground pixels, `None` when there are none.
pub fn bounding_box(mask: &BinaryMask) -> Option<BoundingBox> {
    let mut bbox = None;
    for row in 0..mask.height {
        for col in 0..mask.width {
            if mask.is_foreground(row, col) {
                accumulate(&mut bbox, row, col);
            }
        }
    }
    bbox
}

/// Companion image with background zeroed, plus the foreground box.
#[derive(Clone, Debug)]
pub struct MaskedImage {
    pub image: ColorImage,
    pub bounding_box: Option<BoundingBox>,
}

/// Zero every background pixel of `image` and collect the foreground box.
///
/// The companion image is consumed and returned masked; clone it first to
/// keep an unmasked copy.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(image, mask), fields(width = mask.width, height = mask.height))
)]
pub fn apply_mask(mut image: ColorImage, mask: &BinaryMask) -> Result<MaskedImage, ThresholdError> {
    if image.width != mask.width || image.height != mask.height {
        return Err(ThresholdError::ShapeMismatch {
            expected: (image.height, image.width),
            got: (mask.height, mask.width),
        });
    }

    let mut bbox = None;
    for row in 0..mask.height {
        for col in 0..mask.width {
            if mask.is_foreground(row, col) {
                accumulate(&mut bbox, row, col);
            } else {
                image.pixel_mut(row, col).fill(0);
            }
        }
    }

    if bbox.is_none() {
        warn!(
            "mask has no foreground pixels ({}x{})",
            mask.width, mask.height
        );
    }

    Ok(MaskedImage {
        image,
        bounding_box: bbox,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> GrayImage {
        // values 0, 10, ..., 150 over a 4x4 grid
        GrayImage::from_fn(4, 4, |r, c| ((r * 4 + c) * 10) as u8)
    }

    #[test]
    fn low_reference_marks_high_class_foreground() {
        let img = ramp();
        let mask = classify(&img.view(), 80, 0.0);
        for (i, &v) in img.data.iter().enumerate() {
            assert_eq!(mask.data[i], u8::from(v >= 80), "pixel {i}");
        }
    }

    #[test]
    fn high_reference_inverts_classes() {
        let img = ramp();
        let mask = classify(&img.view(), 80, 200.0);
        for (i, &v) in img.data.iter().enumerate() {
            assert_eq!(mask.data[i], u8::from(v < 80), "pixel {i}");
        }
    }

    #[test]
    fn reference_equal_to_threshold_counts_as_high_side() {
        let img = ramp();
        let mask = classify(&img.view(), 80, 80.0);
        assert_eq!(mask.get(0, 0), 1);
        assert_eq!(mask.get(3, 3), 0);
    }

    #[test]
    fn bounding_box_is_tight() {
        let mut data = vec![0u8; 6 * 5];
        for (r, c) in [(1, 2), (3, 4), (2, 1)] {
            data[r * 6 + c] = 1;
        }
        let mask = BinaryMask {
            width: 6,
            height: 5,
            data,
        };
        let bbox = bounding_box(&mask).expect("foreground present");
        assert_eq!(
            bbox,
            BoundingBox {
                min_row: 1,
                min_col: 1,
                max_row: 3,
                max_col: 4,
            }
        );
        assert_eq!(bbox.width(), 4);
        assert_eq!(bbox.height(), 3);
    }

    #[test]
    fn apply_mask_zeroes_background_channels() {
        let img = ColorImage::from_raw(2, 1, 3, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let mask = BinaryMask {
            width: 2,
            height: 1,
            data: vec![0, 1],
        };
        let masked = apply_mask(img, &mask).unwrap();
        assert_eq!(masked.image.data, vec![0, 0, 0, 40, 50, 60]);
        assert_eq!(masked.bounding_box, Some(BoundingBox::at(0, 1)));
    }

    #[test]
    fn empty_foreground_has_no_box() {
        let img = ColorImage::from_raw(2, 2, 1, vec![5; 4]).unwrap();
        let mask = BinaryMask {
            width: 2,
            height: 2,
            data: vec![0; 4],
        };
        let masked = apply_mask(img, &mask).unwrap();
        assert!(masked.bounding_box.is_none());
        assert!(masked.image.data.iter().all(|&v| v == 0));
        assert_eq!(mask.foreground_ratio(), 0.0);
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let img = ColorImage::from_raw(3, 2, 1, vec![0; 6]).unwrap();
        let mask = BinaryMask {
            width: 2,
            height: 3,
            data: vec![0; 6],
        };
        let err = apply_mask(img, &mask).unwrap_err();
        assert_eq!(
            err,
            ThresholdError::ShapeMismatch {
                expected: (2, 3),
                got: (3, 2),
            }
        );
    }
}
