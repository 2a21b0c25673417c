//! Distance functions over coordinate slices.

/// Squared Euclidean distance between two points of equal dimension.
///
/// # Panics
///
/// Panics in debug mode if the slices have different lengths.
#[must_use]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Euclidean distance between two points of equal dimension.
///
/// ```
/// use kmtrail_engine::core::metric::euclidean;
///
/// assert_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
/// ```
#[must_use]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let a = [1.0, -2.0, 3.5];
        let b = [-4.0, 0.5, 2.0];
        assert_eq!(euclidean(&a, &b), euclidean(&b, &a));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = [1.25, 7.0];
        assert_eq!(euclidean(&a, &a), 0.0);
    }

    #[test]
    fn test_one_dimensional_distance() {
        assert_eq!(euclidean(&[-1.0], &[2.0]), 3.0);
        assert_eq!(squared_euclidean(&[-1.0], &[2.0]), 9.0);
    }
}
