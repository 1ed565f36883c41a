//! Texture descriptors for grayscale images.
//!
//! Currently a single 8-neighbour local binary pattern: see
//! [`local_binary_pattern`] for the code image and [`lbp_histogram`] for a
//! 256-bin feature vector.

pub mod lbp;

pub use lbp::{lbp_code_at, lbp_histogram, local_binary_pattern, NEIGHBORS, RATIO_EPSILON};
