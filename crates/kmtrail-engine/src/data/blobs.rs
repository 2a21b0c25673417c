use rand::{Rng as _, seq::SliceRandom as _};
use rand_distr::{Distribution as _, Normal};
use serde::{Deserialize, Serialize};

use crate::{ClusterSeed, PointSet};

/// Parameters of an isotropic Gaussian blob dataset.
///
/// The defaults reproduce the dataset of the interactive k-means page:
/// 300 two-dimensional points around 3 centers with a standard deviation of
/// 3.5, centers drawn from `[-10, 10]` on every axis, seed 42.
///
/// # Example
///
/// ```
/// use kmtrail_engine::BlobConfig;
///
/// let dataset = BlobConfig::default().generate()?;
/// assert_eq!(dataset.points.len(), 300);
/// assert_eq!(dataset.labels.len(), 300);
/// assert_eq!(dataset.centers.len(), 3);
/// # Ok::<(), kmtrail_engine::InvalidBlobConfig>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    /// Total number of points.
    pub samples: usize,
    /// Number of blob centers.
    pub centers: usize,
    /// Dimension of every point.
    pub dim: usize,
    /// Standard deviation of every blob along every axis.
    pub cluster_std: f64,
    /// Lower bound of the box centers are drawn from.
    pub center_min: f64,
    /// Upper bound of the box centers are drawn from.
    pub center_max: f64,
    pub seed: ClusterSeed,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            samples: 300,
            centers: 3,
            dim: 2,
            cluster_std: 3.5,
            center_min: -10.0,
            center_max: 10.0,
            seed: ClusterSeed::from_u64(42),
        }
    }
}

/// Rejected blob dataset parameters.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidBlobConfig {
    #[display("sample count must be positive")]
    NoSamples,
    #[display("center count must be in 1..={samples}, got {centers}")]
    CenterCountOutOfRange { centers: usize, samples: usize },
    #[display("dimension must be positive")]
    ZeroDimension,
    #[display("cluster standard deviation {cluster_std} must be finite and non-negative")]
    InvalidStd { cluster_std: f64 },
    #[display("center box [{min}, {max}] must be non-empty with a finite width")]
    InvalidCenterBox { min: f64, max: f64 },
}

/// Generated points together with their ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobDataset {
    pub points: PointSet,
    /// Index of the blob each point was drawn from.
    pub labels: Vec<usize>,
    /// Blob centers, indexed by label.
    pub centers: Vec<Vec<f64>>,
}

impl BlobConfig {
    pub fn validate(&self) -> Result<(), InvalidBlobConfig> {
        if self.samples == 0 {
            return Err(InvalidBlobConfig::NoSamples);
        }
        if !(1..=self.samples).contains(&self.centers) {
            return Err(InvalidBlobConfig::CenterCountOutOfRange {
                centers: self.centers,
                samples: self.samples,
            });
        }
        if self.dim == 0 {
            return Err(InvalidBlobConfig::ZeroDimension);
        }
        if !(self.cluster_std.is_finite() && self.cluster_std >= 0.0) {
            return Err(InvalidBlobConfig::InvalidStd {
                cluster_std: self.cluster_std,
            });
        }
        if !(self.center_min.is_finite()
            && self.center_max.is_finite()
            && self.center_min <= self.center_max
            && (self.center_max - self.center_min).is_finite())
        {
            return Err(InvalidBlobConfig::InvalidCenterBox {
                min: self.center_min,
                max: self.center_max,
            });
        }
        Ok(())
    }

    /// Generates the dataset.
    ///
    /// Points are split across centers as evenly as possible (the first
    /// `samples % centers` centers get one extra point), offset from their
    /// center by `N(0, cluster_std²)` noise on every axis, then shuffled.
    /// The same configuration always produces the same dataset.
    pub fn generate(&self) -> Result<BlobDataset, InvalidBlobConfig> {
        self.validate()?;
        let mut rng = self.seed.rng();

        let centers = (0..self.centers)
            .map(|_| {
                (0..self.dim)
                    .map(|_| {
                        if self.center_min < self.center_max {
                            rng.random_range(self.center_min..self.center_max)
                        } else {
                            self.center_min
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let noise = Normal::new(0.0, self.cluster_std).map_err(|_| InvalidBlobConfig::InvalidStd {
            cluster_std: self.cluster_std,
        })?;
        let base = self.samples / self.centers;
        let extra = self.samples % self.centers;
        let mut samples = Vec::with_capacity(self.samples);
        for (label, center) in centers.iter().enumerate() {
            let count = base + usize::from(label < extra);
            for _ in 0..count {
                let point = center
                    .iter()
                    .map(|&c| c + noise.sample(&mut rng))
                    .collect::<Vec<_>>();
                samples.push((point, label));
            }
        }
        samples.shuffle(&mut rng);

        let labels = samples.iter().map(|&(_, label)| label).collect();
        // only extreme deviations can overflow a coordinate to infinity
        let points = PointSet::new(samples.iter().map(|(point, _)| point))
            .map_err(|_| InvalidBlobConfig::InvalidStd {
                cluster_std: self.cluster_std,
            })?;

        Ok(BlobDataset {
            points,
            labels,
            centers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metric;

    #[test]
    fn test_sample_counts_per_center() {
        let config = BlobConfig {
            samples: 10,
            centers: 3,
            ..BlobConfig::default()
        };
        let dataset = config.generate().unwrap();
        let mut counts = [0; 3];
        for &label in &dataset.labels {
            counts[label] += 1;
        }
        assert_eq!(counts, [4, 3, 3]);
        assert_eq!(dataset.points.len(), 10);
        assert_eq!(dataset.points.dim(), 2);
    }

    #[test]
    fn test_deterministic_given_seed() {
        let config = BlobConfig::default();
        assert_eq!(config.generate().unwrap(), config.generate().unwrap());
        let other = BlobConfig {
            seed: ClusterSeed::from_u64(7),
            ..config
        };
        assert_ne!(config.generate().unwrap(), other.generate().unwrap());
    }

    #[test]
    fn test_zero_std_places_points_on_centers() {
        let config = BlobConfig {
            samples: 12,
            centers: 4,
            dim: 3,
            cluster_std: 0.0,
            ..BlobConfig::default()
        };
        let dataset = config.generate().unwrap();
        for (point, &label) in dataset.points.iter().zip(&dataset.labels) {
            assert_eq!(point, dataset.centers[label].as_slice());
        }
    }

    #[test]
    fn test_centers_inside_box() {
        let config = BlobConfig {
            centers: 20,
            center_min: -1.0,
            center_max: 2.0,
            ..BlobConfig::default()
        };
        let dataset = config.generate().unwrap();
        for center in &dataset.centers {
            assert!(center.iter().all(|&x| (-1.0..2.0).contains(&x)));
        }
    }

    #[test]
    fn test_points_stay_near_their_center() {
        let config = BlobConfig {
            cluster_std: 0.5,
            ..BlobConfig::default()
        };
        let dataset = config.generate().unwrap();
        for (point, &label) in dataset.points.iter().zip(&dataset.labels) {
            // ten standard deviations on both axes
            let limit = 10.0 * config.cluster_std * 2.0_f64.sqrt();
            assert!(metric::euclidean(point, &dataset.centers[label]) < limit);
        }
    }

    #[test]
    fn test_validation() {
        let base = BlobConfig::default();
        assert_eq!(
            BlobConfig { samples: 0, ..base }.validate(),
            Err(InvalidBlobConfig::NoSamples)
        );
        assert!(matches!(
            BlobConfig { centers: 0, ..base }.validate(),
            Err(InvalidBlobConfig::CenterCountOutOfRange { .. })
        ));
        assert!(matches!(
            BlobConfig {
                samples: 2,
                centers: 3,
                ..base
            }
            .validate(),
            Err(InvalidBlobConfig::CenterCountOutOfRange { .. })
        ));
        assert_eq!(
            BlobConfig { dim: 0, ..base }.validate(),
            Err(InvalidBlobConfig::ZeroDimension)
        );
        assert!(matches!(
            BlobConfig {
                cluster_std: -1.0,
                ..base
            }
            .validate(),
            Err(InvalidBlobConfig::InvalidStd { .. })
        ));
        assert!(matches!(
            BlobConfig {
                center_min: 1.0,
                center_max: 0.0,
                ..base
            }
            .validate(),
            Err(InvalidBlobConfig::InvalidCenterBox { .. })
        ));
        assert!(matches!(
            BlobConfig {
                center_min: -1.0e308,
                center_max: 1.0e308,
                ..base
            }
            .generate(),
            Err(InvalidBlobConfig::InvalidCenterBox { .. })
        ));
    }
}
