//! Facade crate for the `imseg-*` workspace.
//!
//! This crate provides:
//! - re-exports of the algorithm crates under short module names
//! - [`segment`]: the full foreground pipeline on core image types
//! - (feature `image`) adapters from the `image` crate and a JSON-driven
//!   analysis runner used by the `imseg` binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use imseg::convert::segment_dynamic_image;
//! use imseg::threshold::RegionParams;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("object.png")?;
//! let seg = segment_dynamic_image(&img, &RegionParams::default())?;
//! println!("threshold {} bbox {:?}", seg.threshold, seg.bounding_box);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `imseg::core`: image containers and the stderr logger.
//! - `imseg::threshold`: histograms, Otsu threshold, background reference, masks.
//! - `imseg::cluster`: silhouette scores, cluster-count sweep, 1-D k-means.
//! - `imseg::texture`: local binary pattern codes.
//! - `imseg::convert` / `imseg::io` (feature `image`): `image` crate adapters,
//!   config and report files.

pub use imseg_cluster as cluster;
pub use imseg_core as core;
pub use imseg_texture as texture;
pub use imseg_threshold as threshold;

pub use imseg_cluster::{optimize_cluster_count, ClusterCountSelection, KMeans};
pub use imseg_core::{ColorImage, GrayImage, GrayImageView};
pub use imseg_texture::local_binary_pattern;
pub use imseg_threshold::{BoundingBox, ReferencePolicy, RegionParams};

pub mod features;
pub mod segment;

#[cfg(feature = "image")]
pub mod convert;
#[cfg(feature = "image")]
pub mod io;

pub use segment::{segment_foreground, segment_gray, SegmentError, Segmentation};
