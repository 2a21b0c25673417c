use kmtrail_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::{Assignment, CentroidSet};

/// A numerical degeneracy absorbed during one step.
///
/// Degeneracies never abort a run; they only explain why a centroid did not
/// move or why a step has no quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degeneracy {
    /// No point was assigned to `centroid`; it kept its position.
    EmptyCluster { centroid: usize },
    /// Every point was assigned to the same centroid; the score is undefined.
    SingleCluster,
    /// Every point formed its own cluster; the score is undefined.
    AllSingletons,
}

/// Immutable snapshot of one clustering step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    iteration: usize,
    centroids: CentroidSet,
    assignment: Assignment,
    score: Option<f64>,
    displacement: Vec<f64>,
    degeneracies: Vec<Degeneracy>,
}

impl IterationRecord {
    pub(crate) fn new(
        iteration: usize,
        centroids: CentroidSet,
        assignment: Assignment,
        score: Option<f64>,
        displacement: Vec<f64>,
        degeneracies: Vec<Degeneracy>,
    ) -> Self {
        Self {
            iteration,
            centroids,
            assignment,
            score,
            displacement,
            degeneracies,
        }
    }

    /// Zero-based step index.
    #[must_use]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Centroid positions after this step's update.
    #[must_use]
    pub fn centroids(&self) -> &CentroidSet {
        &self.centroids
    }

    /// Assignment computed from the centroids *before* this step's update.
    #[must_use]
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Silhouette score of [`Self::assignment`], or `None` if undefined.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Distance each centroid moved during this step, indexed by centroid.
    #[must_use]
    pub fn displacement(&self) -> &[f64] {
        &self.displacement
    }

    /// Largest centroid displacement of this step.
    #[must_use]
    pub fn max_displacement(&self) -> f64 {
        self.displacement.iter().copied().fold(0.0, f64::max)
    }

    #[must_use]
    pub fn degeneracies(&self) -> &[Degeneracy] {
        &self.degeneracies
    }
}

/// Ordered, append-only sequence of [`IterationRecord`]s of a run.
///
/// The history also keeps the initial centroids, so that the assignment of
/// every record can be checked against the centroids it was computed from
/// (see [`Self::centroids_before`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    initial_centroids: CentroidSet,
    records: Vec<IterationRecord>,
}

impl History {
    pub(crate) fn new(initial_centroids: CentroidSet, capacity: usize) -> Self {
        Self {
            initial_centroids,
            records: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, record: IterationRecord) {
        debug_assert_eq!(record.iteration, self.records.len());
        self.records.push(record);
    }

    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Centroids the run started from.
    #[must_use]
    pub fn initial_centroids(&self) -> &CentroidSet {
        &self.initial_centroids
    }

    /// Centroids that were current when step `iteration` computed its assignment.
    ///
    /// Returns `None` if `iteration` has not been recorded.
    #[must_use]
    pub fn centroids_before(&self, iteration: usize) -> Option<&CentroidSet> {
        match iteration {
            _ if iteration >= self.records.len() => None,
            0 => Some(&self.initial_centroids),
            _ => Some(self.records[iteration - 1].centroids()),
        }
    }

    #[must_use]
    pub fn get(&self, iteration: usize) -> Option<&IterationRecord> {
        self.records.get(iteration)
    }

    #[must_use]
    pub fn last(&self) -> Option<&IterationRecord> {
        self.records.last()
    }

    #[must_use]
    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IterationRecord> {
        self.records.iter()
    }

    /// Score of every step, `None` where undefined.
    pub fn scores(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.records.iter().map(IterationRecord::score)
    }

    /// Most recent defined score, or `None` if every step was degenerate.
    #[must_use]
    pub fn last_score(&self) -> Option<f64> {
        self.records.iter().rev().find_map(IterationRecord::score)
    }

    /// Summary of the defined scores; undefined steps are skipped, not counted as 0.
    #[must_use]
    pub fn score_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.scores().flatten())
    }

    /// Summary of the per-step maximum centroid displacement.
    #[must_use]
    pub fn displacement_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.records.iter().map(IterationRecord::max_displacement))
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a IterationRecord;
    type IntoIter = std::slice::Iter<'a, IterationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Result of a complete (or caller-stopped) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Every recorded step, in order.
    pub history: History,
    /// Centroid positions after the last step.
    pub final_centroids: CentroidSet,
    /// Assignment of the last step.
    pub final_assignment: Assignment,
    /// Last defined score, `None` if no step produced one.
    pub last_score: Option<f64>,
    /// `true` if a stop predicate ended the run before the iteration budget.
    pub stopped_early: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(iteration: usize, x: f64, score: Option<f64>) -> IterationRecord {
        IterationRecord::new(
            iteration,
            CentroidSet::new([[x]]).unwrap(),
            Assignment::from_labels(1, vec![0]).unwrap(),
            score,
            vec![x.abs(), 0.5],
            vec![],
        )
    }

    fn history() -> History {
        let mut history = History::new(CentroidSet::new([[0.0]]).unwrap(), 3);
        history.push(record(0, 1.0, Some(0.2)));
        history.push(record(1, 2.0, None));
        history.push(record(2, 3.0, Some(0.6)));
        history
    }

    #[test]
    fn test_centroids_before() {
        let history = history();
        assert_eq!(history.centroids_before(0).unwrap().get(0), &[0.0]);
        assert_eq!(history.centroids_before(1).unwrap().get(0), &[1.0]);
        assert_eq!(history.centroids_before(2).unwrap().get(0), &[2.0]);
        assert!(history.centroids_before(3).is_none());
    }

    #[test]
    fn test_scores_skip_undefined() {
        let history = history();
        assert_eq!(
            history.scores().collect::<Vec<_>>(),
            vec![Some(0.2), None, Some(0.6)]
        );
        assert_eq!(history.last_score(), Some(0.6));
        let stats = history.score_stats().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 0.2);
        assert_eq!(stats.max, 0.6);
    }

    #[test]
    fn test_last_score_looks_back() {
        let mut history = History::new(CentroidSet::new([[0.0]]).unwrap(), 2);
        history.push(record(0, 1.0, Some(0.3)));
        history.push(record(1, 1.0, None));
        assert_eq!(history.last_score(), Some(0.3));
    }

    #[test]
    fn test_no_scores_at_all() {
        let mut history = History::new(CentroidSet::new([[0.0]]).unwrap(), 1);
        history.push(record(0, 1.0, None));
        assert_eq!(history.last_score(), None);
        assert!(history.score_stats().is_none());
    }

    #[test]
    fn test_displacement() {
        let history = history();
        assert_eq!(history.get(0).unwrap().max_displacement(), 1.0);
        assert_eq!(history.get(1).unwrap().max_displacement(), 2.0);
        let stats = history.displacement_stats().unwrap();
        assert_eq!(stats.max, 3.0);
    }

    #[test]
    fn test_degeneracy_json_tagging() {
        let json = serde_json::to_string(&Degeneracy::EmptyCluster { centroid: 2 }).unwrap();
        assert_eq!(json, r#"{"kind":"empty_cluster","centroid":2}"#);
        let json = serde_json::to_string(&Degeneracy::SingleCluster).unwrap();
        assert_eq!(json, r#"{"kind":"single_cluster"}"#);
        assert!(Degeneracy::AllSingletons.is_all_singletons());
    }

    #[test]
    fn test_undefined_score_serializes_as_null() {
        let json = serde_json::to_value(record(0, 1.0, None)).unwrap();
        assert!(json["score"].is_null());
    }
}
