//! Adapters between the `image` crate and the core image types.

use crate::core::{ColorImage, GrayImage, GrayImageView, ImageError};
use crate::segment::{segment_foreground, SegmentError, Segmentation};
use crate::threshold::RegionParams;
use image::{DynamicImage, ImageBuffer, Luma, Rgb};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Borrow an `image::GrayImage` as a core view.
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Copy an `image::GrayImage` into an owned core image.
pub fn gray_from_image(img: &::image::GrayImage) -> GrayImage {
    GrayImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw().clone(),
    }
}

/// Wrap a raw 8-bit buffer, validating its length.
pub fn gray_image_from_slice(
    width: usize,
    height: usize,
    data: &[u8],
) -> Result<GrayImage, ImageError> {
    GrayImage::from_raw(width, height, data.to_vec())
}

/// Owned 3-channel copy of an `image::RgbImage`.
pub fn color_from_rgb(img: &::image::RgbImage) -> ColorImage {
    ColorImage {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 3,
        data: img.as_raw().clone(),
    }
}

fn dims_u32(width: usize, height: usize) -> Result<(u32, u32), ImageError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ImageError::InvalidDimensions { width, height }),
    }
}

/// Convert a core color image back to `image::RgbImage`.
///
/// Single-channel images are replicated into RGB; a 4th (alpha) channel is
/// dropped.
pub fn rgb_from_color(img: &ColorImage) -> Result<::image::RgbImage, ImageError> {
    let (w, h) = dims_u32(img.width, img.height)?;
    let mut out = ImageBuffer::<Rgb<u8>, Vec<u8>>::new(w, h);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let src = img.pixel(y as usize, x as usize);
        *px = match src.len() {
            1 | 2 => Rgb([src[0]; 3]),
            _ => Rgb([src[0], src[1], src[2]]),
        };
    }
    Ok(out)
}

/// Convert a core grayscale image to `image::GrayImage`.
pub fn to_luma_image(img: &GrayImage) -> Result<::image::GrayImage, ImageError> {
    let (w, h) = dims_u32(img.width, img.height)?;
    ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(w, h, img.data.clone()).ok_or(
        ImageError::InvalidBuffer {
            expected: img.width * img.height,
            got: img.data.len(),
        },
    )
}

/// Segment a decoded image: its luma drives the threshold, its RGB copy is
/// the masked companion.
///
/// Float images (`[0, 1]` per channel) are quantized with
/// [`GrayImage::from_unit_floats`] rather than the `image` crate's rounding.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width(), height = img.height()))
)]
pub fn segment_dynamic_image(
    img: &DynamicImage,
    params: &RegionParams,
) -> Result<Segmentation, SegmentError> {
    match img {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            let (w, h) = (img.width() as usize, img.height() as usize);
            let gray = GrayImage::from_unit_floats(w, h, img.to_luma32f().as_raw())?;
            let color = ColorImage::from_unit_floats(w, h, 3, img.to_rgb32f().as_raw())?;
            segment_foreground(&gray.view(), color, params)
        }
        _ => {
            let luma = img.to_luma8();
            let rgb = img.to_rgb8();
            segment_foreground(&gray_view(&luma), color_from_rgb(&rgb), params)
        }
    }
}
