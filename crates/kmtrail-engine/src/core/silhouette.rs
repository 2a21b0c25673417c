//! Silhouette quality score of a partition.
//!
//! For a point `i` in cluster `C`:
//!
//! - `a(i)` is the mean distance from `i` to the other members of `C`
//! - `b(i)` is the smallest mean distance from `i` to the members of another
//!   non-empty cluster
//! - `s(i) = (b(i) - a(i)) / max(a(i), b(i))`
//!
//! Policies for the corner cases:
//!
//! - A member of a singleton cluster scores `0`.
//! - A point with `a(i) = b(i) = 0` (all relevant points coincide) scores `0`.
//! - The overall score is only defined when the partition uses between 2 and
//!   N - 1 distinct clusters. A single cluster has no "other cluster" to
//!   compare with, and an all-singleton partition carries no cohesion
//!   information; both yield `None` rather than a made-up number.
//!
//! The computation is O(N² · D).

use crate::{Assignment, PointSet, core::metric};

/// Returns the silhouette value of every point.
///
/// Unlike [`silhouette_score`] this is computed for any partition; points of a
/// single-cluster partition all score `0` because no neighbouring cluster exists.
///
/// # Panics
///
/// Panics if `assignment` does not label exactly `points.len()` points.
#[must_use]
pub fn silhouette_samples(points: &PointSet, assignment: &Assignment) -> Vec<f64> {
    assert_eq!(
        points.len(),
        assignment.labels().len(),
        "assignment must label every point"
    );
    let labels = assignment.labels();
    let sizes = assignment.cluster_sizes();
    let mut sums = vec![0.0; assignment.cluster_count()];

    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            sums.fill(0.0);
            for (j, other) in points.iter().enumerate() {
                if i != j {
                    sums[labels[j]] += metric::euclidean(point, other);
                }
            }
            point_silhouette(labels[i], &sums, &sizes)
        })
        .collect()
}

#[expect(clippy::cast_precision_loss)]
fn point_silhouette(own: usize, sums: &[f64], sizes: &[usize]) -> f64 {
    if sizes[own] <= 1 {
        return 0.0;
    }
    let a = sums[own] / (sizes[own] - 1) as f64;
    let b = sums
        .iter()
        .zip(sizes)
        .enumerate()
        .filter(|&(cluster, (_, &size))| cluster != own && size > 0)
        .map(|(_, (&sum, &size))| sum / size as f64)
        .fold(f64::INFINITY, f64::min);
    if b.is_infinite() {
        return 0.0;
    }
    let denom = f64::max(a, b);
    if denom > 0.0 { (b - a) / denom } else { 0.0 }
}

/// Mean silhouette value over all points.
///
/// Returns `None` if the assignment uses fewer than 2 or more than N - 1
/// distinct clusters.
///
/// # Example
///
/// ```
/// use kmtrail_engine::{Assignment, PointSet, core::silhouette::silhouette_score};
///
/// let points = PointSet::new([[0.0], [1.0], [10.0], [11.0]])?;
/// let split = Assignment::from_labels(2, vec![0, 0, 1, 1]).unwrap();
/// let score = silhouette_score(&points, &split).unwrap();
/// assert!(score > 0.8);
///
/// let collapsed = Assignment::from_labels(2, vec![0, 0, 0, 0]).unwrap();
/// assert_eq!(silhouette_score(&points, &collapsed), None);
/// # Ok::<(), kmtrail_engine::InvalidConfiguration>(())
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn silhouette_score(points: &PointSet, assignment: &Assignment) -> Option<f64> {
    let distinct = assignment.distinct_clusters();
    if distinct < 2 || distinct >= points.len() {
        return None;
    }
    let samples = silhouette_samples(points, assignment);
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}
