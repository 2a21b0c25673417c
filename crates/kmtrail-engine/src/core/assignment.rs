use serde::{Deserialize, Serialize};

use crate::{CentroidSet, PointSet, core::metric};

/// Maps every point index to the index of its nearest centroid.
///
/// An assignment also remembers how many centroids it was computed against,
/// so that empty clusters remain visible in [`Self::cluster_sizes`].
///
/// # Example
///
/// ```
/// use kmtrail_engine::{Assignment, CentroidSet, PointSet};
///
/// let points = PointSet::new([[0.0], [1.0], [9.0]])?;
/// let centroids = CentroidSet::new([[0.5], [10.0], [100.0]])?;
/// let assignment = Assignment::nearest(&points, &centroids);
///
/// assert_eq!(assignment.labels(), &[0, 0, 1]);
/// assert_eq!(assignment.cluster_sizes(), vec![2, 1, 0]);
/// assert_eq!(assignment.distinct_clusters(), 2);
/// # Ok::<(), kmtrail_engine::InvalidConfiguration>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    cluster_count: usize,
    labels: Vec<usize>,
}

impl Assignment {
    /// Assigns each point to the centroid at minimum Euclidean distance.
    ///
    /// Ties are broken in favour of the lowest centroid index.
    ///
    /// # Panics
    ///
    /// Panics if `centroids` is empty.
    #[must_use]
    pub fn nearest(points: &PointSet, centroids: &CentroidSet) -> Self {
        assert!(!centroids.is_empty(), "at least one centroid is required");
        let labels = points
            .iter()
            .map(|point| nearest_centroid(point, centroids))
            .collect();
        Self {
            cluster_count: centroids.len(),
            labels,
        }
    }

    /// Builds an assignment from explicit labels.
    ///
    /// Returns `None` if any label is `>= cluster_count`.
    #[must_use]
    pub fn from_labels(cluster_count: usize, labels: Vec<usize>) -> Option<Self> {
        labels
            .iter()
            .all(|&label| label < cluster_count)
            .then_some(Self {
                cluster_count,
                labels,
            })
    }

    /// Centroid index of every point, in point order.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of centroids the assignment was computed against (K).
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Number of points assigned to each centroid, indexed by centroid.
    #[must_use]
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.cluster_count];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }

    /// Number of centroids that received at least one point.
    #[must_use]
    pub fn distinct_clusters(&self) -> usize {
        self.cluster_sizes().iter().filter(|&&size| size > 0).count()
    }

    /// Indices of the points assigned to `cluster`.
    pub fn members(&self, cluster: usize) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |&(_, &label)| label == cluster)
            .map(|(index, _)| index)
    }
}

fn nearest_centroid(point: &[f64], centroids: &CentroidSet) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = metric::euclidean(point, centroid);
        // strict comparison keeps the lowest index on ties
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_go_to_lowest_index() {
        let points = PointSet::new([[0.0, 0.0]]).unwrap();
        let centroids = CentroidSet::new([[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0]]).unwrap();
        let assignment = Assignment::nearest(&points, &centroids);
        assert_eq!(assignment.labels(), &[0]);
    }

    #[test]
    fn test_duplicate_centroids_only_first_used() {
        let points = PointSet::new([[0.0], [5.0], [6.0]]).unwrap();
        let centroids = CentroidSet::new([[5.5], [5.5]]).unwrap();
        let assignment = Assignment::nearest(&points, &centroids);
        assert_eq!(assignment.labels(), &[0, 0, 0]);
        assert_eq!(assignment.cluster_sizes(), vec![3, 0]);
        assert_eq!(assignment.distinct_clusters(), 1);
    }

    #[test]
    fn test_members() {
        let assignment = Assignment::from_labels(3, vec![2, 0, 2, 1]).unwrap();
        assert_eq!(assignment.members(2).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(assignment.members(0).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_from_labels_rejects_out_of_range() {
        assert!(Assignment::from_labels(2, vec![0, 2]).is_none());
        assert!(Assignment::from_labels(2, vec![0, 1]).is_some());
    }
}
