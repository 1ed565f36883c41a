/// Errors raised when wrapping raw pixel buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("unsupported channel count {0} (expected 1..=4)")]
    InvalidChannels(usize),
}

/// Borrowed 8-bit grayscale image, row-major, `len = width * height`.
///
/// Rows run along `y`, columns along `x`.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

impl<'a> GrayImageView<'a> {
    /// Wrap a borrowed buffer, validating its length.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, ImageError> {
        check_len(width, height, 1, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Pixel at `(row, col)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.width + col]
    }

    /// Pixel at a signed `(row, col)`, or `None` outside the image.
    #[inline]
    pub fn get_checked(&self, row: isize, col: isize) -> Option<u8> {
        if row < 0 || col < 0 || row >= self.height as isize || col >= self.width as isize {
            return None;
        }
        Some(self.data[row as usize * self.width + col as usize])
    }

    /// Pixels of one row.
    pub fn row(&self, row: usize) -> &'a [u8] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    /// Mean intensity of the half-open window `rows × cols`, or `None` if it is empty.
    pub fn window_mean(
        &self,
        rows: std::ops::Range<usize>,
        cols: std::ops::Range<usize>,
    ) -> Option<f64> {
        let rows = rows.start.min(self.height)..rows.end.min(self.height);
        let cols = cols.start.min(self.width)..cols.end.min(self.width);
        if rows.is_empty() || cols.is_empty() {
            return None;
        }

        let mut sum = 0u64;
        for r in rows.clone() {
            sum += self.row(r)[cols.clone()]
                .iter()
                .map(|&v| v as u64)
                .sum::<u64>();
        }
        let count = rows.len() * cols.len();
        Some(sum as f64 / count as f64)
    }
}

/// Owned 8-bit grayscale image, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Image filled with a constant value.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Take ownership of a raw buffer, validating its length.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        check_len(width, height, 1, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Quantize intensities in `[0, 1]` to 8 bits as `floor(v * 255)`.
    ///
    /// Values outside the unit range are clamped; NaN maps to 0.
    pub fn from_unit_floats(width: usize, height: usize, data: &[f32]) -> Result<Self, ImageError> {
        check_len(width, height, 1, data.len())?;
        Ok(Self {
            width,
            height,
            data: quantize_unit_floats(data),
        })
    }

    /// Build an image from a per-pixel function of `(row, col)`.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.data[row * self.width + col] = value;
    }
}

/// Owned interleaved 8-bit image with 1..=4 channels (gray, gray+alpha, RGB, RGBA).
///
/// This is the companion image the segmentation step masks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorImage {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl ColorImage {
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        if !(1..=4).contains(&channels) {
            return Err(ImageError::InvalidChannels(channels));
        }
        check_len(width, height, channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Interleaved floats in `[0, 1]`, quantized like
    /// [`GrayImage::from_unit_floats`].
    pub fn from_unit_floats(
        width: usize,
        height: usize,
        channels: usize,
        data: &[f32],
    ) -> Result<Self, ImageError> {
        Self::from_raw(width, height, channels, quantize_unit_floats(data))
    }

    /// Single-channel companion built from a grayscale image.
    pub fn from_gray(gray: &GrayImageView<'_>) -> Self {
        Self {
            width: gray.width,
            height: gray.height,
            channels: 1,
            data: gray.data.to_vec(),
        }
    }

    /// Channels of the pixel at `(row, col)`.
    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> &[u8] {
        let start = (row * self.width + col) * self.channels;
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, row: usize, col: usize) -> &mut [u8] {
        let start = (row * self.width + col) * self.channels;
        &mut self.data[start..start + self.channels]
    }
}

fn quantize_unit_floats(data: &[f32]) -> Vec<u8> {
    data.iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8)
        .collect()
}

fn check_len(width: usize, height: usize, channels: usize, got: usize) -> Result<(), ImageError> {
    let Some(expected) = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
    else {
        return Err(ImageError::InvalidDimensions { width, height });
    };
    if got != expected {
        return Err(ImageError::InvalidBuffer { expected, got });
    }
    Ok(())
}
