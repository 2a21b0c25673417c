use serde::{Deserialize, Serialize};

use crate::InvalidConfiguration;

/// An ordered, immutable collection of N points in D-dimensional space.
///
/// Coordinates are stored row-major in a single buffer. Construction
/// guarantees the set is non-empty, rectangular (every point has the same
/// dimension D ≥ 1) and that every coordinate is finite, so downstream code
/// never has to re-check those properties.
///
/// Serialized as a JSON array of coordinate arrays.
///
/// # Example
///
/// ```
/// use kmtrail_engine::PointSet;
///
/// let points = PointSet::new(vec![vec![0.0, 1.0], vec![2.0, 3.0]])?;
/// assert_eq!(points.len(), 2);
/// assert_eq!(points.dim(), 2);
/// assert_eq!(points.point(1), &[2.0, 3.0]);
/// # Ok::<(), kmtrail_engine::InvalidConfiguration>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PointSet {
    dim: usize,
    coords: Vec<f64>,
}

impl PointSet {
    /// Builds a point set from rows of coordinates.
    ///
    /// # Errors
    ///
    /// - [`InvalidConfiguration::EmptyPointSet`] if `rows` is empty
    /// - [`InvalidConfiguration::ZeroDimension`] if the first row is empty
    /// - [`InvalidConfiguration::NonRectangular`] if a row's length differs from the first row
    /// - [`InvalidConfiguration::NonFiniteCoordinate`] if a coordinate is `NaN` or infinite
    pub fn new<R>(rows: impl IntoIterator<Item = R>) -> Result<Self, InvalidConfiguration>
    where
        R: AsRef<[f64]>,
    {
        let mut rows = rows.into_iter();
        let first = rows.next().ok_or(InvalidConfiguration::EmptyPointSet)?;
        let first = first.as_ref();
        let dim = first.len();
        if dim == 0 {
            return Err(InvalidConfiguration::ZeroDimension);
        }

        let mut coords = Vec::with_capacity(dim * (rows.size_hint().0 + 1));
        push_row(&mut coords, 0, dim, first)?;
        for (offset, row) in rows.enumerate() {
            push_row(&mut coords, offset + 1, dim, row.as_ref())?;
        }
        Ok(Self { dim, coords })
    }

    /// Number of points (N).
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len() / self.dim
    }

    /// Always `false`: a point set holds at least one point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Dimension of every point (D).
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the coordinates of the point at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn point(&self, index: usize) -> &[f64] {
        &self.coords[index * self.dim..(index + 1) * self.dim]
    }

    /// Iterates over all points in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.coords.chunks_exact(self.dim)
    }

    /// Returns the per-axis `(min, max)` bounding box of the data.
    #[must_use]
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        let mut bounds = self
            .point(0)
            .iter()
            .map(|&x| (x, x))
            .collect::<Vec<_>>();
        for point in self.iter().skip(1) {
            for ((min, max), &x) in bounds.iter_mut().zip(point) {
                *min = f64::min(*min, x);
                *max = f64::max(*max, x);
            }
        }
        bounds
    }

    /// Copies the points out as one `Vec` per point.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter().map(<[f64]>::to_vec).collect()
    }
}

fn push_row(
    coords: &mut Vec<f64>,
    index: usize,
    dim: usize,
    row: &[f64],
) -> Result<(), InvalidConfiguration> {
    if row.len() != dim {
        return Err(InvalidConfiguration::NonRectangular {
            index,
            expected: dim,
            actual: row.len(),
        });
    }
    if !row.iter().all(|x| x.is_finite()) {
        return Err(InvalidConfiguration::NonFiniteCoordinate { index });
    }
    coords.extend_from_slice(row);
    Ok(())
}

impl TryFrom<Vec<Vec<f64>>> for PointSet {
    type Error = InvalidConfiguration;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<PointSet> for Vec<Vec<f64>> {
    fn from(points: PointSet) -> Self {
        points.to_rows()
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a [f64];
    type IntoIter = std::slice::ChunksExact<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.coords.chunks_exact(self.dim)
    }
}
