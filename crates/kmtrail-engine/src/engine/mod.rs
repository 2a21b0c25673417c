//! Clustering engine and run history.
//!
//! - [`ClusterEngine`] - Owns the centroids of one run and advances them step by step
//! - [`EngineConfig`] - Cluster count, iteration budget, damping, initialization margin and seed
//! - [`ClusterSeed`] - Seed for deterministic centroid initialization
//! - [`History`] / [`IterationRecord`] - Immutable per-iteration snapshots
//! - [`RunOutcome`] - History plus the final centroid/assignment pair
//!
//! # Run Flow
//!
//! 1. Validate the configuration against the point set
//! 2. Draw K initial centroids uniformly from the padded bounding box of the data
//! 3. Each step: assign points to nearest centroids, move every centroid a
//!    `damping` fraction toward the mean of its members, score the partition
//! 4. Repeat for exactly `iterations` steps (or until a caller-supplied stop
//!    predicate fires when using [`ClusterEngine::run_until`])
//!
//! # Example
//!
//! ```
//! use kmtrail_engine::{ClusterEngine, EngineConfig, PointSet};
//!
//! let points = PointSet::new([[0.0, 0.0], [0.0, 1.0], [8.0, 8.0], [9.0, 8.0]])?;
//! let mut engine = ClusterEngine::new(&points, EngineConfig::new(2, 5))?;
//!
//! while let Some(record) = engine.advance() {
//!     println!("#{}: score {:?}", record.iteration(), record.score());
//! }
//! assert!(engine.is_finished());
//! # Ok::<(), kmtrail_engine::InvalidConfiguration>(())
//! ```

pub use self::{cluster_engine::*, config::*, history::*, seed::*};

mod cluster_engine;
mod config;
mod history;
mod seed;
