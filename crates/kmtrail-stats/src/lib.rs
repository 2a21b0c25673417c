//! Statistical summaries for the kmtrail project.
//!
//! This crate provides the small set of statistical tools used to summarize
//! clustering runs:
//!
//! - **Descriptive statistics**: min, max, mean, median, variance and standard
//!   deviation over a series of `f64` values (e.g. the silhouette score
//!   trajectory or per-step centroid displacement of a run)
//!
//! # Examples
//!
//! ```
//! use kmtrail_stats::descriptive::DescriptiveStats;
//!
//! let scores = [0.25, 0.5, 0.75];
//! let stats = DescriptiveStats::new(scores).unwrap();
//! assert_eq!(stats.mean, 0.5);
//! assert_eq!(stats.count, 3);
//! ```

pub mod descriptive;
