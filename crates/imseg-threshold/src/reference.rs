//! Background reference intensity estimates.
//!
//! The Otsu threshold only splits intensities into two classes; which class
//! is background is decided by comparing a reference intensity against the
//! threshold. The reference comes either from the image border or from its
//! center, depending on [`ReferencePolicy`].

use crate::{ReferencePolicy, RegionParams, ThresholdError};
use imseg_core::GrayImageView;
use log::debug;

/// Extent of `fraction` of `dim`, floored, clamped to `1..=dim`.
fn extent(dim: usize, fraction: f64) -> usize {
    ((dim as f64 * fraction).floor() as usize).clamp(1, dim)
}

/// Floor of the average of the four border strip means.
///
/// Strips are `floor(height * fraction)` rows tall (top, bottom) and
/// `floor(width * fraction)` columns wide (left, right), at least one pixel.
pub fn border_mean(img: &GrayImageView<'_>, fraction: f32) -> Result<f64, ThresholdError> {
    if img.is_empty() {
        return Err(ThresholdError::EmptyImage);
    }
    let (rows, cols) = (img.height, img.width);
    let l = extent(rows, fraction as f64);
    let b = extent(cols, fraction as f64);

    let strips = [
        img.window_mean(0..l, 0..cols),
        img.window_mean(rows - l..rows, 0..cols),
        img.window_mean(0..rows, 0..b),
        img.window_mean(0..rows, cols - b..cols),
    ];
    let sum: f64 = strips.iter().flatten().sum();
    Ok((sum / 4.0).floor())
}

/// Floor of the mean of a central rectangle.
///
/// The rectangle spans `2 * floor(height * fraction / 2)` rows and
/// `2 * floor(width * fraction / 2)` columns around `(height / 2, width / 2)`,
/// at least one pixel on each side of the center.
pub fn center_mean(img: &GrayImageView<'_>, fraction: f32) -> Result<f64, ThresholdError> {
    if img.is_empty() {
        return Err(ThresholdError::EmptyImage);
    }
    let (rows, cols) = (img.height, img.width);
    let (cr, cc) = (rows / 2, cols / 2);
    let l = extent(rows, fraction as f64 / 2.0);
    let b = extent(cols, fraction as f64 / 2.0);

    let mean = img
        .window_mean(cr.saturating_sub(l)..cr + l, cc.saturating_sub(b)..cc + b)
        .ok_or(ThresholdError::EmptyImage)?;
    Ok(mean.floor())
}

/// Intensity assumed to belong to the background.
///
/// - [`ReferencePolicy::Border`]: the border mean itself.
/// - [`ReferencePolicy::Center`]: the center is taken as foreground, so the
///   reference is placed on the opposite side of `threshold`: `0` when the
///   center mean is at or above it, `255` otherwise.
pub fn background_reference(
    img: &GrayImageView<'_>,
    threshold: u8,
    params: &RegionParams,
) -> Result<f64, ThresholdError> {
    params.validate()?;
    match params.policy {
        ReferencePolicy::Border => {
            let mean = border_mean(img, params.border_fraction)?;
            debug!("border mean {mean}");
            Ok(mean)
        }
        ReferencePolicy::Center => {
            let foreground = center_mean(img, params.center_fraction)?;
            debug!("center mean {foreground}");
            if foreground >= threshold as f64 {
                Ok(0.0)
            } else {
                Ok(255.0)
            }
        }
    }
}
