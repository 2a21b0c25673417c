use std::path::PathBuf;

use kmtrail_engine::{BlobConfig, ClusterSeed};
use tracing::info;

use crate::util::Output;

/// Parameters of a generated Gaussian blob dataset.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BlobArg {
    /// Number of points
    #[arg(long, default_value_t = 300)]
    samples: usize,
    /// Number of blob centers
    #[arg(long, default_value_t = 3)]
    centers: usize,
    /// Dimension of every point
    #[arg(long, default_value_t = 2)]
    dim: usize,
    /// Standard deviation of every blob
    #[arg(long, default_value_t = 3.5)]
    cluster_std: f64,
    /// Seed of the dataset generator
    #[arg(long, default_value_t = 42)]
    data_seed: u64,
}

impl BlobArg {
    pub(crate) fn to_config(&self) -> BlobConfig {
        BlobConfig {
            samples: self.samples,
            centers: self.centers,
            dim: self.dim,
            cluster_std: self.cluster_std,
            seed: ClusterSeed::from_u64(self.data_seed),
            ..BlobConfig::default()
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    #[clap(flatten)]
    blobs: BlobArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let GenerateArg { blobs, output } = arg;
    let config = blobs.to_config();
    let dataset = config.generate()?;

    let output = Output::create(output.clone())?;
    info!(
        samples = dataset.points.len(),
        centers = dataset.centers.len(),
        output = %output.display_path(),
        "generated blob dataset"
    );
    output.write_json(&dataset)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[derive(Debug, clap::Parser)]
    struct TestCli {
        #[clap(flatten)]
        arg: GenerateArg,
    }

    fn parse(args: &[&str]) -> GenerateArg {
        TestCli::try_parse_from(std::iter::once("kmtrail").chain(args.iter().copied()))
            .unwrap()
            .arg
    }

    #[test]
    fn test_default_flags_match_default_config() {
        assert_eq!(parse(&[]).blobs.to_config(), BlobConfig::default());
    }

    #[test]
    fn test_flags_map_to_blob_config() {
        let arg = parse(&[
            "--samples",
            "50",
            "--centers",
            "4",
            "--dim",
            "3",
            "--cluster-std",
            "1.5",
            "--data-seed",
            "5",
            "--output",
            "blobs.json",
        ]);
        let config = arg.blobs.to_config();
        assert_eq!(config.samples, 50);
        assert_eq!(config.centers, 4);
        assert_eq!(config.dim, 3);
        assert_eq!(config.cluster_std, 1.5);
        assert_eq!(config.seed, ClusterSeed::from_u64(5));
        assert_eq!(config.center_min, BlobConfig::default().center_min);
        assert_eq!(config.center_max, BlobConfig::default().center_max);
        assert_eq!(arg.output, Some(PathBuf::from("blobs.json")));
        assert_eq!(config.generate().unwrap().points.len(), 50);
    }
}
