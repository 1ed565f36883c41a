//! Histogram-based foreground/background segmentation.
//!
//! Pipeline pieces, leaf first:
//! 1. [`normalized_histogram`]: 256-bin PMF of a grayscale image.
//! 2. [`otsu_threshold`]: threshold minimizing the summed within-class
//!    sum of squares.
//! 3. [`background_reference`]: border or center intensity that tells which
//!    class is background.
//! 4. [`classify`] + [`apply_mask`]: binary mask, masked companion image and
//!    foreground [`BoundingBox`].
//!
//! ```
//! use imseg_core::{ColorImage, GrayImage};
//! use imseg_threshold::{
//!     apply_mask, background_reference, classify, normalized_histogram, otsu_threshold,
//!     RegionParams,
//! };
//!
//! # fn main() -> Result<(), imseg_threshold::ThresholdError> {
//! let gray = GrayImage::from_fn(32, 32, |r, c| {
//!     if (8..24).contains(&r) && (8..24).contains(&c) { 220 } else { 30 }
//! });
//! let view = gray.view();
//! let threshold = otsu_threshold(&normalized_histogram(&view)?);
//! let reference = background_reference(&view, threshold, &RegionParams::default())?;
//! let mask = classify(&view, threshold, reference);
//! let masked = apply_mask(ColorImage::from_gray(&view), &mask)?;
//! assert_eq!(masked.bounding_box.map(|b| (b.min_row, b.max_row)), Some((8, 23)));
//! # Ok(())
//! # }
//! ```

mod error;
pub mod histogram;
pub mod otsu;
mod params;
pub mod reference;
pub mod region;

pub use error::ThresholdError;
pub use histogram::{intensity_counts, normalized_histogram, GrayHistogram, LEVELS};
pub use otsu::{
    otsu_objective, otsu_select, otsu_threshold, threshold_image, OtsuSelection, MEAN_EPSILON,
};
pub use params::{ReferencePolicy, RegionParams};
pub use reference::{background_reference, border_mean, center_mean};
pub use region::{apply_mask, bounding_box, classify, BinaryMask, BoundingBox, MaskedImage};
