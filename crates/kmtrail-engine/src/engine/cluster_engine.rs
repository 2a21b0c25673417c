use rand::Rng as _;
use tracing::{debug, trace};

use crate::{
    Assignment, CentroidSet, InvalidConfiguration, PointSet, core::silhouette,
};

use super::{Degeneracy, EngineConfig, History, IterationRecord, RunOutcome};

/// Damped k-means over a borrowed point set.
///
/// The engine owns everything that changes during a run (centroids and
/// history) and only borrows the points, so several engines may cluster the
/// same data concurrently. Every step appends an immutable
/// [`IterationRecord`]; the live centroids can be mutated afterwards without
/// affecting past records.
///
/// The run always performs exactly `iterations` steps unless stopped through
/// [`Self::run_until`]. There is no built-in convergence test; callers that
/// want one can inspect [`IterationRecord::max_displacement`].
#[derive(Debug, Clone)]
pub struct ClusterEngine<'a> {
    points: &'a PointSet,
    config: EngineConfig,
    centroids: CentroidSet,
    history: History,
}

impl<'a> ClusterEngine<'a> {
    /// Creates an engine with randomly initialized centroids.
    ///
    /// Every coordinate of every centroid is drawn independently and
    /// uniformly from the data's per-axis range widened by
    /// `config.init_margin` on both sides. The generator is created from
    /// `config.seed` and owned by this call, so identical inputs produce
    /// identical centroids.
    pub fn new(points: &'a PointSet, config: EngineConfig) -> Result<Self, InvalidConfiguration> {
        config.validate(points)?;

        let mut rng = config.seed.rng();
        let bounds = points.bounds();
        let margin = config.init_margin;
        let centroids = CentroidSet::from_fn(config.cluster_count, points.dim(), |_, axis| {
            let (min, max) = bounds[axis];
            let (low, high) = (min - margin, max + margin);
            if low < high {
                rng.random_range(low..high)
            } else {
                low
            }
        });

        Ok(Self::from_parts(points, config, centroids))
    }

    /// Creates an engine starting from caller-supplied centroids.
    ///
    /// `config.seed` and `config.init_margin` are validated but unused.
    pub fn with_initial_centroids(
        points: &'a PointSet,
        config: EngineConfig,
        centroids: CentroidSet,
    ) -> Result<Self, InvalidConfiguration> {
        config.validate(points)?;
        if centroids.len() != config.cluster_count {
            return Err(InvalidConfiguration::CentroidCountMismatch {
                expected: config.cluster_count,
                actual: centroids.len(),
            });
        }
        if centroids.dim() != points.dim() {
            return Err(InvalidConfiguration::CentroidDimensionMismatch {
                expected: points.dim(),
                actual: centroids.dim(),
            });
        }
        Ok(Self::from_parts(points, config, centroids))
    }

    fn from_parts(points: &'a PointSet, config: EngineConfig, centroids: CentroidSet) -> Self {
        debug!(
            points = points.len(),
            dim = points.dim(),
            k = config.cluster_count,
            iterations = config.iterations,
            damping = config.damping,
            seed = %config.seed,
            "cluster engine initialized"
        );
        let history = History::new(centroids.clone(), config.iterations);
        Self {
            points,
            config,
            centroids,
            history,
        }
    }

    #[must_use]
    pub fn points(&self) -> &'a PointSet {
        self.points
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current (live) centroid positions.
    #[must_use]
    pub fn centroids(&self) -> &CentroidSet {
        &self.centroids
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Number of steps performed so far.
    #[must_use]
    pub fn completed_iterations(&self) -> usize {
        self.history.len()
    }

    /// Returns `true` once the iteration budget is exhausted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.history.len() >= self.config.iterations
    }

    /// Performs one step and returns its record.
    ///
    /// Returns `None` without doing any work once the iteration budget is
    /// exhausted.
    ///
    /// A step:
    ///
    /// 1. Assigns each point to its nearest current centroid (lowest index on ties)
    /// 2. Computes the mean of each centroid's members; an empty centroid keeps
    ///    its position and is reported as [`Degeneracy::EmptyCluster`]
    /// 3. Moves each centroid `damping` of the way toward that mean
    /// 4. Scores the assignment with the silhouette metric, recording `None`
    ///    (with [`Degeneracy::SingleCluster`] or [`Degeneracy::AllSingletons`])
    ///    when the score is undefined
    #[expect(clippy::cast_precision_loss)]
    pub fn advance(&mut self) -> Option<&IterationRecord> {
        if self.is_finished() {
            return None;
        }

        let iteration = self.history.len();
        let dim = self.points.dim();
        let damping = self.config.damping;

        let assignment = Assignment::nearest(self.points, &self.centroids);
        let sizes = assignment.cluster_sizes();
        let mut sums = vec![0.0; sizes.len() * dim];
        for (point, &label) in self.points.iter().zip(assignment.labels()) {
            for (sum, x) in sums[label * dim..(label + 1) * dim].iter_mut().zip(point) {
                *sum += x;
            }
        }

        let mut degeneracies = vec![];
        let mut displacement = Vec::with_capacity(sizes.len());
        for (index, (&size, sum)) in sizes.iter().zip(sums.chunks_exact(dim)).enumerate() {
            if size == 0 {
                trace!(iteration, centroid = index, "empty cluster, centroid kept in place");
                degeneracies.push(Degeneracy::EmptyCluster { centroid: index });
                displacement.push(0.0);
                continue;
            }
            let count = size as f64;
            let centroid = self.centroids.get_mut(index);
            let mut moved = 0.0;
            for (c, s) in centroid.iter_mut().zip(sum) {
                let old = *c;
                *c = old + damping * (s / count - old);
                moved += (*c - old).powi(2);
            }
            displacement.push(f64::sqrt(moved));
        }

        let distinct = assignment.distinct_clusters();
        let score = if distinct <= 1 {
            degeneracies.push(Degeneracy::SingleCluster);
            None
        } else if distinct >= self.points.len() {
            degeneracies.push(Degeneracy::AllSingletons);
            None
        } else {
            silhouette::silhouette_score(self.points, &assignment)
        };

        let record = IterationRecord::new(
            iteration,
            self.centroids.clone(),
            assignment,
            score,
            displacement,
            degeneracies,
        );
        debug!(
            iteration,
            clusters = distinct,
            score = ?record.score(),
            max_displacement = record.max_displacement(),
            degeneracies = record.degeneracies().len(),
            "step completed"
        );
        self.history.push(record);
        self.history.last()
    }

    /// Runs the remaining iteration budget and returns the outcome.
    ///
    /// The returned history always holds exactly `config.iterations` records.
    #[must_use]
    pub fn run(self) -> RunOutcome {
        self.run_until(|_| false)
    }

    /// Runs the remaining budget, evaluating `stop` after every step.
    ///
    /// When `stop` returns `true` the run ends immediately with
    /// [`RunOutcome::stopped_early`] set (unless that step was the last one
    /// anyway). This is the hook for external cancellation and for
    /// caller-defined convergence rules:
    ///
    /// ```
    /// use std::sync::atomic::{AtomicBool, Ordering};
    ///
    /// use kmtrail_engine::{ClusterEngine, EngineConfig, PointSet};
    ///
    /// let points = PointSet::new([[0.0], [1.0], [10.0], [11.0]])?;
    /// let engine = ClusterEngine::new(&points, EngineConfig::new(2, 1_000))?;
    ///
    /// let cancelled = AtomicBool::new(false);
    /// let outcome = engine.run_until(|record| {
    ///     cancelled.load(Ordering::Relaxed) || record.max_displacement() < 1e-6
    /// });
    /// assert!(outcome.history.len() <= 1_000);
    /// # Ok::<(), kmtrail_engine::InvalidConfiguration>(())
    /// ```
    pub fn run_until<F>(mut self, mut stop: F) -> RunOutcome
    where
        F: FnMut(&IterationRecord) -> bool,
    {
        let mut stopped_early = false;
        while let Some(record) = self.advance() {
            if stop(record) {
                stopped_early = !self.is_finished();
                break;
            }
        }
        if stopped_early {
            debug!(
                completed = self.history.len(),
                budget = self.config.iterations,
                "run stopped early"
            );
        }
        self.into_outcome(stopped_early)
    }

    fn into_outcome(self, stopped_early: bool) -> RunOutcome {
        let final_assignment = match self.history.last() {
            Some(record) => record.assignment().clone(),
            None => Assignment::nearest(self.points, &self.centroids),
        };
        let last_score = self.history.last_score();
        RunOutcome {
            history: self.history,
            final_centroids: self.centroids,
            final_assignment,
            last_score,
            stopped_early,
        }
    }
}
