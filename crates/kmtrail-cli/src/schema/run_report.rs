use chrono::{DateTime, Utc};
use kmtrail_engine::{EngineConfig, RunOutcome};
use kmtrail_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

/// Recorded clustering run, replayable frame by frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Timestamp when the run finished (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Where the points came from
    pub source: DataSource,
    /// Configuration the run was started with (includes the seed)
    pub config: EngineConfig,
    /// Summary of the score trajectory and centroid movement
    pub summary: RunSummary,
    /// Full history plus final centroids and assignment
    pub outcome: RunOutcome,
}

/// Origin of the clustered points
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// Read from a JSON file
    File { path: String },
    /// Generated Gaussian blobs
    Blobs { config: kmtrail_engine::BlobConfig },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub iterations: usize,
    pub scored_iterations: usize,
    pub final_score: Option<f64>,
    pub score: Option<StatsSummary>,
    pub max_displacement: Option<StatsSummary>,
    pub stopped_early: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl From<DescriptiveStats> for StatsSummary {
    fn from(stats: DescriptiveStats) -> Self {
        Self {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
        }
    }
}

impl RunSummary {
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        let history = &outcome.history;
        Self {
            iterations: history.len(),
            scored_iterations: history.scores().flatten().count(),
            final_score: outcome.last_score,
            score: history.score_stats().map(StatsSummary::from),
            max_displacement: history.displacement_stats().map(StatsSummary::from),
            stopped_early: outcome.stopped_early,
        }
    }
}

#[cfg(test)]
mod tests {
    use kmtrail_engine::{ClusterEngine, PointSet};

    use super::*;

    #[test]
    fn test_summary_counts_only_defined_scores() {
        let points = PointSet::new([[0.0], [0.5], [9.0], [9.5]]).unwrap();
        let outcome = ClusterEngine::new(&points, EngineConfig::new(1, 4))
            .unwrap()
            .run();
        let summary = RunSummary::from_outcome(&outcome);
        assert_eq!(summary.iterations, 4);
        assert_eq!(summary.scored_iterations, 0);
        assert!(summary.final_score.is_none());
        assert!(summary.score.is_none());
        assert!(summary.max_displacement.is_some());
    }

    #[test]
    fn test_report_serializes_undefined_score_as_null() {
        let points = PointSet::new([[0.0], [1.0]]).unwrap();
        let config = EngineConfig::new(1, 2);
        let outcome = ClusterEngine::new(&points, config).unwrap().run();
        let report = RunReport {
            recorded_at: Utc::now(),
            source: DataSource::File {
                path: "points.json".to_string(),
            },
            config,
            summary: RunSummary::from_outcome(&outcome),
            outcome,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["summary"]["final_score"].is_null());
        assert_eq!(json["source"]["kind"], "file");
        assert_eq!(json["outcome"]["history"]["records"].as_array().unwrap().len(), 2);
    }
}
