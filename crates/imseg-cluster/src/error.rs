/// Errors returned by silhouette scoring and the cluster-count sweep.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    #[error("no feature points to cluster")]
    EmptyFeatures,

    #[error("{labels} labels for {points} feature points")]
    LengthMismatch { points: usize, labels: usize },

    #[error("label {label} of point {index} is outside 0..{k}")]
    InvalidLabel { index: usize, label: usize, k: usize },

    #[error("silhouette needs at least 2 clusters, got {k}")]
    TooFewClusters { k: usize },

    #[error("{points} feature points leave no cluster count to try (need at least 4)")]
    EmptySweep { points: usize },
}
