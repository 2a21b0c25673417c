use serde::{Deserialize, Serialize};

use crate::{ClusterSeed, InvalidConfiguration, PointSet};

/// Default fraction of the distance toward the recomputed mean applied per step.
///
/// Values below 1 under-relax the update so the centroid trajectory stays
/// smooth enough to animate.
pub const DEFAULT_DAMPING: f64 = 0.4;

/// Default padding added on every side of the data's bounding box before
/// drawing initial centroids.
///
/// Starting outside the point cloud makes the convergence trajectory longer
/// and more visible.
pub const DEFAULT_INIT_MARGIN: f64 = 10.0;

/// Default cluster count (K).
pub const DEFAULT_CLUSTER_COUNT: usize = 3;

/// Default iteration budget.
pub const DEFAULT_ITERATIONS: usize = 10;

/// Default seed value.
pub const DEFAULT_SEED: u64 = 42;

/// Configuration of a single clustering run.
///
/// Missing fields fall back to their defaults when deserialized.
///
/// # Example
///
/// ```
/// use kmtrail_engine::{ClusterSeed, EngineConfig};
///
/// let config = EngineConfig::new(4, 25)
///     .with_damping(1.0)
///     .with_init_margin(0.0)
///     .with_seed(ClusterSeed::from_u64(3));
/// assert_eq!(config.cluster_count, 4);
/// assert_eq!(config.iterations, 25);
///
/// let parsed: EngineConfig = serde_json::from_str(r#"{ "cluster_count": 2 }"#)?;
/// assert_eq!(parsed.damping, kmtrail_engine::DEFAULT_DAMPING);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of centroids (K), in `1..=N`.
    pub cluster_count: usize,
    /// Number of steps a run performs; must be positive.
    pub iterations: usize,
    /// Relaxation fraction in `(0, 1]`; `1` is the classic Lloyd update.
    pub damping: f64,
    /// Padding around the data's bounding box for initial centroids; finite and `>= 0`.
    pub init_margin: f64,
    /// Seed of the run's random number generator.
    pub seed: ClusterSeed,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cluster_count: DEFAULT_CLUSTER_COUNT,
            iterations: DEFAULT_ITERATIONS,
            damping: DEFAULT_DAMPING,
            init_margin: DEFAULT_INIT_MARGIN,
            seed: ClusterSeed::from_u64(DEFAULT_SEED),
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with the given K and iteration budget and
    /// default damping, margin and seed.
    #[must_use]
    pub fn new(cluster_count: usize, iterations: usize) -> Self {
        Self {
            cluster_count,
            iterations,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    #[must_use]
    pub fn with_init_margin(mut self, init_margin: f64) -> Self {
        self.init_margin = init_margin;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: ClusterSeed) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the configuration against the point set it will run on.
    pub fn validate(&self, points: &PointSet) -> Result<(), InvalidConfiguration> {
        if !(1..=points.len()).contains(&self.cluster_count) {
            return Err(InvalidConfiguration::ClusterCountOutOfRange {
                cluster_count: self.cluster_count,
                point_count: points.len(),
            });
        }
        if self.iterations == 0 {
            return Err(InvalidConfiguration::ZeroIterations);
        }
        // also rejects NaN
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(InvalidConfiguration::DampingOutOfRange {
                damping: self.damping,
            });
        }
        if !(self.init_margin.is_finite() && self.init_margin >= 0.0) {
            return Err(InvalidConfiguration::InvalidInitMargin {
                margin: self.init_margin,
            });
        }
        // the sampled interval must have a finite width
        let margin = self.init_margin;
        for (axis, (min, max)) in points.bounds().into_iter().enumerate() {
            if !((max + margin) - (min - margin)).is_finite() {
                return Err(InvalidConfiguration::InitRangeOverflow { axis });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::cast_precision_loss)]
    fn points(n: usize) -> PointSet {
        PointSet::new((0..n).map(|i| [i as f64, 0.0])).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.cluster_count, 3);
        assert_eq!(config.iterations, 10);
        assert_eq!(config.damping, 0.4);
        assert_eq!(config.init_margin, 10.0);
        assert_eq!(config.seed, ClusterSeed::from_u64(42));
        assert_eq!(config.validate(&points(3)), Ok(()));
    }

    #[test]
    fn test_cluster_count_range() {
        let pts = points(4);
        assert_eq!(
            EngineConfig::new(0, 1).validate(&pts),
            Err(InvalidConfiguration::ClusterCountOutOfRange {
                cluster_count: 0,
                point_count: 4,
            })
        );
        assert_eq!(
            EngineConfig::new(5, 1).validate(&pts),
            Err(InvalidConfiguration::ClusterCountOutOfRange {
                cluster_count: 5,
                point_count: 4,
            })
        );
        assert_eq!(EngineConfig::new(4, 1).validate(&pts), Ok(()));
        assert_eq!(EngineConfig::new(1, 1).validate(&pts), Ok(()));
    }

    #[test]
    fn test_zero_iterations() {
        assert_eq!(
            EngineConfig::new(1, 0).validate(&points(2)),
            Err(InvalidConfiguration::ZeroIterations)
        );
    }

    #[test]
    fn test_damping_range() {
        let pts = points(2);
        for damping in [0.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                EngineConfig::new(1, 1).with_damping(damping).validate(&pts),
                Err(InvalidConfiguration::DampingOutOfRange { .. })
            ));
        }
        assert_eq!(
            EngineConfig::new(1, 1).with_damping(1.0).validate(&pts),
            Ok(())
        );
    }

    #[test]
    fn test_init_margin() {
        let pts = points(2);
        for margin in [-1.0, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                EngineConfig::new(1, 1).with_init_margin(margin).validate(&pts),
                Err(InvalidConfiguration::InvalidInitMargin { .. })
            ));
        }
        assert_eq!(
            EngineConfig::new(1, 1).with_init_margin(0.0).validate(&pts),
            Ok(())
        );
    }

    #[test]
    fn test_init_range_overflow() {
        let huge = PointSet::new([[0.0, -1.0e308], [1.0, 1.0e308]]).unwrap();
        assert_eq!(
            EngineConfig::new(1, 1).validate(&huge),
            Err(InvalidConfiguration::InitRangeOverflow { axis: 1 })
        );
        // finite data, but the margin pushes the interval past f64::MAX
        let pts = points(2);
        assert_eq!(
            EngineConfig::new(1, 1).with_init_margin(1.7e308).validate(&pts),
            Err(InvalidConfiguration::InitRangeOverflow { axis: 0 })
        );
        let large = PointSet::new([[-1.0e307], [1.0e307]]).unwrap();
        assert_eq!(EngineConfig::new(1, 1).validate(&large), Ok(()));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::new(5, 7).with_damping(0.5);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
