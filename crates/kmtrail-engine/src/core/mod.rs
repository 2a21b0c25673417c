//! Core data structures for clustering.
//!
//! - [`PointSet`] - Immutable, validated N×D input data
//! - [`CentroidSet`] - K mutable centroid positions in the same space
//! - [`Assignment`] - Nearest-centroid label for every point
//! - [`silhouette`] - Silhouette quality score of an assignment
//! - [`metric`] - Euclidean distance helpers

pub use self::{assignment::*, centroid_set::*, point_set::*};

mod assignment;
mod centroid_set;
pub mod metric;
mod point_set;
pub mod silhouette;
