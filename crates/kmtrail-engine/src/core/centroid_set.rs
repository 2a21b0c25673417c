use serde::{Deserialize, Serialize};

use crate::InvalidConfiguration;

/// K centroid positions in D-dimensional space.
///
/// Unlike [`PointSet`](crate::PointSet), a centroid set is mutable: the
/// engine moves its centroids in place every iteration. Snapshots stored in
/// the history are independent clones, so later updates never alter them.
///
/// Serialized as a JSON array of coordinate arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct CentroidSet {
    dim: usize,
    coords: Vec<f64>,
}

impl CentroidSet {
    /// Builds a centroid set from rows of coordinates.
    ///
    /// Validation mirrors [`PointSet::new`](crate::PointSet::new): at least one
    /// centroid, a common non-zero dimension and finite coordinates.
    pub fn new<R>(rows: impl IntoIterator<Item = R>) -> Result<Self, InvalidConfiguration>
    where
        R: AsRef<[f64]>,
    {
        let mut dim = None;
        let mut coords = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let expected = *dim.get_or_insert(row.len());
            if expected == 0 {
                return Err(InvalidConfiguration::ZeroDimension);
            }
            if row.len() != expected {
                return Err(InvalidConfiguration::NonRectangular {
                    index,
                    expected,
                    actual: row.len(),
                });
            }
            if !row.iter().all(|x| x.is_finite()) {
                return Err(InvalidConfiguration::NonFiniteCoordinate { index });
            }
            coords.extend_from_slice(row);
        }
        let dim = dim.ok_or(InvalidConfiguration::EmptyCentroidSet)?;
        Ok(Self { dim, coords })
    }

    /// Creates `count` centroids whose coordinates are produced by `f(centroid, axis)`.
    ///
    /// Coordinates are generated centroid by centroid, axis by axis, so a
    /// stateful generator (e.g. an RNG) is consumed in a reproducible order.
    pub(crate) fn from_fn<F>(count: usize, dim: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut coords = Vec::with_capacity(count * dim);
        for centroid in 0..count {
            for axis in 0..dim {
                coords.push(f(centroid, axis));
            }
        }
        Self { dim, coords }
    }

    /// Number of centroids (K).
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len() / self.dim
    }

    /// Returns `true` if the set holds no centroid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Dimension of every centroid.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the coordinates of centroid `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn get(&self, index: usize) -> &[f64] {
        &self.coords[index * self.dim..(index + 1) * self.dim]
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut [f64] {
        &mut self.coords[index * self.dim..(index + 1) * self.dim]
    }

    /// Iterates over the centroids in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.coords.chunks_exact(self.dim)
    }

    /// Copies the centroids out as one `Vec` per centroid.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter().map(<[f64]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for CentroidSet {
    type Error = InvalidConfiguration;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<CentroidSet> for Vec<Vec<f64>> {
    fn from(centroids: CentroidSet) -> Self {
        centroids.to_rows()
    }
}
