//! Iterative k-means clustering with replayable centroid trajectories.
//!
//! The crate is organized as follows:
//!
//! - [`core`] - Point sets, centroid sets, assignments and the silhouette quality metric
//! - [`engine`] - The [`ClusterEngine`], its configuration and the per-iteration [`History`]
//! - [`data`] - Seeded synthetic datasets (isotropic Gaussian blobs)
//!
//! # Example
//!
//! ```
//! use kmtrail_engine::{ClusterEngine, ClusterSeed, EngineConfig, PointSet};
//!
//! let points = PointSet::new(vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![10.0, 10.0],
//!     vec![10.0, 11.0],
//! ])?;
//! let config = EngineConfig::new(2, 20).with_seed(ClusterSeed::from_u64(7));
//! let outcome = ClusterEngine::new(&points, config)?.run();
//!
//! assert_eq!(outcome.history.len(), 20);
//! # Ok::<(), kmtrail_engine::InvalidConfiguration>(())
//! ```

pub use self::{core::*, data::*, engine::*};

pub mod core;
pub mod data;
pub mod engine;

/// Rejected run configuration.
///
/// Returned synchronously before any iteration is performed; no partial
/// state is ever produced for a rejected configuration.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidConfiguration {
    #[display("point set is empty")]
    EmptyPointSet,
    #[display("points must have at least one coordinate")]
    ZeroDimension,
    #[display("point {index} has {actual} coordinates, expected {expected}")]
    NonRectangular {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[display("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
    #[display("cluster count {cluster_count} must be in 1..={point_count}")]
    ClusterCountOutOfRange {
        cluster_count: usize,
        point_count: usize,
    },
    #[display("initialization range on axis {axis} overflows; coordinates plus margin are too large")]
    InitRangeOverflow { axis: usize },
    #[display("iteration count must be positive")]
    ZeroIterations,
    #[display("damping factor {damping} must be in (0, 1]")]
    DampingOutOfRange { damping: f64 },
    #[display("initialization margin {margin} must be finite and non-negative")]
    InvalidInitMargin { margin: f64 },
    #[display("centroid set is empty")]
    EmptyCentroidSet,
    #[display("expected {expected} initial centroids, got {actual}")]
    CentroidCountMismatch { expected: usize, actual: usize },
    #[display("initial centroids have dimension {actual}, points have dimension {expected}")]
    CentroidDimensionMismatch { expected: usize, actual: usize },
}
