//! Silhouette scoring and selection of the number of intensity clusters.
//!
//! [`optimize_cluster_count`] sweeps `k = 2..=n-2`, asks a
//! [`ClusteringProvider`] for labels at each `k` and keeps the count with the
//! highest mean [`silhouette_score`]. [`KMeans`] is a deterministic 1-D
//! provider; any `FnMut(&[f64], usize) -> Vec<usize>` works too.
//!
//! ```
//! use imseg_cluster::{optimize_cluster_count, KMeans};
//!
//! let features = [1.0, 2.0, 3.0, 50.0, 51.0, 52.0, 100.0, 101.0, 102.0];
//! let selection = optimize_cluster_count(&features, &mut KMeans::default()).unwrap();
//! assert_eq!(selection.best_k, 3);
//! ```

mod error;
pub mod kmeans;
pub mod optimizer;
pub mod silhouette;

pub use error::ClusterError;
pub use kmeans::{KMeans, KMeansParams, KMeansResult};
pub use optimizer::{
    candidate_range, optimize_cluster_count, ClusterCountSelection, ClusteringProvider, KScore,
};
pub use silhouette::{
    absolute_distance, silhouette_samples, silhouette_samples_with, silhouette_score,
    silhouette_score_with,
};
