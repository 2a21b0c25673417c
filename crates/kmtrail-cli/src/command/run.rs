use std::{fmt::Write as _, path::PathBuf};

use anyhow::Context as _;
use chrono::Utc;
use kmtrail_engine::{ClusterEngine, ClusterSeed, Degeneracy, EngineConfig, IterationRecord};
use tracing::info;

use crate::{
    command::generate::BlobArg,
    schema::{
        dataset::DatasetFile,
        run_report::{DataSource, RunReport, RunSummary},
    },
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Dataset JSON file (array of points, or output of `generate`).
    /// Blobs are generated when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    #[clap(flatten)]
    blobs: BlobArg,
    /// Engine configuration JSON file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of clusters (K)
    #[arg(short = 'k', long)]
    clusters: Option<usize>,
    /// Number of iterations
    #[arg(long)]
    iterations: Option<usize>,
    /// Fraction of the way each centroid moves toward its cluster mean per step
    #[arg(long)]
    damping: Option<f64>,
    /// Padding around the data's bounding box for initial centroids
    #[arg(long)]
    init_margin: Option<f64>,
    /// Seed of centroid initialization
    #[arg(long)]
    seed: Option<u64>,
    /// Stop once no centroid moved farther than this in one step
    #[arg(long)]
    stop_below: Option<f64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl RunArg {
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<EngineConfig, _>("engine config", path)?,
            None => EngineConfig::default(),
        };
        if let Some(clusters) = self.clusters {
            config.cluster_count = clusters;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(damping) = self.damping {
            config.damping = damping;
        }
        if let Some(init_margin) = self.init_margin {
            config.init_margin = init_margin;
        }
        if let Some(seed) = self.seed {
            config.seed = ClusterSeed::from_u64(seed);
        }
        Ok(config)
    }
}

fn describe(record: &IterationRecord) -> String {
    let score = record
        .score()
        .map_or_else(|| "undefined".to_string(), |score| format!("{score:.4}"));
    let empty = record
        .degeneracies()
        .iter()
        .filter(|d| d.is_empty_cluster())
        .count();
    let mut line = format!(
        "Iteration #{:3}: score {score:>9}, max displacement {:.4}",
        record.iteration(),
        record.max_displacement(),
    );
    if empty > 0 {
        // writing to a String cannot fail
        let _ = write!(line, ", {empty} empty cluster(s)");
    }
    if record.degeneracies().contains(&Degeneracy::SingleCluster) {
        line.push_str(", single cluster");
    }
    if record.degeneracies().contains(&Degeneracy::AllSingletons) {
        line.push_str(", all singletons");
    }
    line
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let (points, source) = match &arg.input {
        Some(path) => {
            let points = util::read_json_file::<DatasetFile, _>("dataset", path)?.into_points();
            let source = DataSource::File {
                path: path.display().to_string(),
            };
            (points, source)
        }
        None => {
            let config = arg.blobs.to_config();
            let dataset = config.generate()?;
            (dataset.points, DataSource::Blobs { config })
        }
    };
    let config = arg.engine_config()?;
    info!(
        points = points.len(),
        dim = points.dim(),
        k = config.cluster_count,
        iterations = config.iterations,
        "starting run"
    );

    let engine = ClusterEngine::new(&points, config).context("Invalid run configuration")?;
    eprintln!(
        "Clustering {} points into {} clusters ({} iterations, damping {}):",
        points.len(),
        config.cluster_count,
        config.iterations,
        config.damping
    );
    let outcome = engine.run_until(|record| {
        eprintln!("  {}", describe(record));
        arg.stop_below
            .is_some_and(|threshold| record.max_displacement() < threshold)
    });

    if outcome.stopped_early {
        eprintln!(
            "Stopped after {} of {} iterations (centroids settled)",
            outcome.history.len(),
            config.iterations
        );
    }
    match outcome.last_score {
        Some(score) => eprintln!("Final silhouette score: {score:.4}"),
        None => eprintln!("Final silhouette score: none computed (every iteration was degenerate)"),
    }

    let report = RunReport {
        recorded_at: Utc::now(),
        source,
        config,
        summary: RunSummary::from_outcome(&outcome),
        outcome,
    };
    let output = Output::create(arg.output.clone())?;
    info!(output = %output.display_path(), "writing run report");
    output.write_json(&report)?;
    Ok(())
}
