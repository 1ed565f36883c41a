//! Core types shared by the `imseg-*` crates.
//!
//! Plain row-major image containers and a stderr logger. No codecs here;
//! decoding lives in the `imseg` facade behind its `image` feature.

mod image;
mod logger;

pub use image::{ColorImage, GrayImage, GrayImageView, ImageError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init, init_from_verbosity, init_with_level, level_from_verbosity, LogConfig};
