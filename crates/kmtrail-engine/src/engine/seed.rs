use std::fmt::{self, Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic centroid initialization and dataset generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator owned by a single run. Using the same seed with the same points
/// and configuration reproduces the run bit for bit, and separate runs never
/// share generator state.
///
/// Serialized as a 32-character lowercase hex string.
///
/// # Example
///
/// ```
/// use kmtrail_engine::ClusterSeed;
/// use rand::Rng as _;
///
/// // Generate a random seed
/// let seed: ClusterSeed = rand::rng().random();
///
/// // Or derive one from an integer, like `np.random.seed(42)`
/// let fixed = ClusterSeed::from_u64(42);
/// assert_eq!(fixed, ClusterSeed::from_u64(42));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterSeed([u8; 16]);

impl ClusterSeed {
    /// Derives a seed from an integer, zero-extended to 128 bits.
    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        Self((value as u128).to_be_bytes())
    }

    /// Creates the generator instance for one run.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }

    fn to_hex(self) -> String {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        // writing to a String cannot fail
        let _ = write!(&mut hex_str, "{num:032x}");
        hex_str
    }
}

impl From<u64> for ClusterSeed {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::Debug for ClusterSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClusterSeed({})", self.to_hex())
    }
}

impl fmt::Display for ClusterSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ClusterSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ClusterSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows generating random `ClusterSeed` values with `rng.random()`.
impl Distribution<ClusterSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ClusterSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ClusterSeed(seed)
    }
}
