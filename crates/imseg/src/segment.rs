//! End-to-end foreground segmentation on core image types.

use crate::core::{ColorImage, GrayImageView, ImageError};
use crate::threshold::{
    apply_mask, background_reference, classify, normalized_histogram, otsu_threshold, BinaryMask,
    BoundingBox, RegionParams, ThresholdError,
};
use log::info;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the segmentation pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Everything the pipeline produced for one image.
#[derive(Clone, Debug)]
pub struct Segmentation {
    pub threshold: u8,
    /// Background reference intensity used to orient the classes.
    pub reference: f64,
    pub mask: BinaryMask,
    /// Companion image with background pixels zeroed.
    pub image: ColorImage,
    pub bounding_box: Option<BoundingBox>,
    pub foreground_ratio: f64,
}

impl Segmentation {
    pub fn summary(&self) -> SegmentationSummary {
        SegmentationSummary {
            threshold: self.threshold,
            reference: self.reference,
            bounding_box: self.bounding_box,
            foreground_ratio: self.foreground_ratio,
        }
    }
}

/// Scalar part of a [`Segmentation`], suitable for reports.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationSummary {
    pub threshold: u8,
    pub reference: f64,
    pub bounding_box: Option<BoundingBox>,
    pub foreground_ratio: f64,
}

/// Histogram, Otsu threshold, background reference, mask, masked companion.
///
/// `companion` must have the same width and height as `gray`; it is consumed
/// and returned masked inside the [`Segmentation`].
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(gray, companion, params),
        fields(width = gray.width, height = gray.height, policy = ?params.policy)
    )
)]
pub fn segment_foreground(
    gray: &GrayImageView<'_>,
    companion: ColorImage,
    params: &RegionParams,
) -> Result<Segmentation, SegmentError> {
    let hist = normalized_histogram(gray)?;
    let threshold = otsu_threshold(&hist);
    let reference = background_reference(gray, threshold, params)?;
    let mask = classify(gray, threshold, reference);
    let masked = apply_mask(companion, &mask)?;
    let foreground_ratio = mask.foreground_ratio();

    info!(
        "segmented {}x{}: threshold={threshold} reference={reference:.1} foreground={:.1}%",
        gray.width,
        gray.height,
        foreground_ratio * 100.0
    );

    Ok(Segmentation {
        threshold,
        reference,
        mask,
        image: masked.image,
        bounding_box: masked.bounding_box,
        foreground_ratio,
    })
}

/// [`segment_foreground`] with the grayscale image as its own companion.
pub fn segment_gray(
    gray: &GrayImageView<'_>,
    params: &RegionParams,
) -> Result<Segmentation, SegmentError> {
    segment_foreground(gray, ColorImage::from_gray(gray), params)
}
