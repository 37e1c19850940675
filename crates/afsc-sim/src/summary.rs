//! Per-run records and batch-level statistics.

use std::time::Duration;

use afsc_core::{Cadet, JobCategory, JobId, ModelConstructionError};
use afsc_model::{RankBucket, RunResult, SolveError};
use thiserror::Error;

use crate::error::SynthesisError;

/// Why a run produced no answer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunFailure {
    #[error("synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("model construction failed: {0}")]
    Construction(#[from] ModelConstructionError),

    #[error("solve failed: {0}")]
    Solve(#[from] SolveError),
}

/// Terminal outcome of one run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Optimal(RunResult),
    Infeasible,
    Failed(RunFailure),
}

impl RunOutcome {
    pub fn result(&self) -> Option<&RunResult> {
        match self {
            RunOutcome::Optimal(result) => Some(result),
            _ => None,
        }
    }

    /// Short label used in logs and exported tables.
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Optimal(_) => "optimal",
            RunOutcome::Infeasible => "infeasible",
            RunOutcome::Failed(_) => "failed",
        }
    }
}

/// One completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// Run index (0-based).
    pub run: usize,
    /// Seed the run's RNG was created from.
    pub seed: u64,
    /// Population the run solved; empty when synthesis failed.
    pub population: Vec<Cadet>,
    pub outcome: RunOutcome,
    /// Wall time from synthesis to aggregation.
    pub elapsed: Duration,
}

/// Mean statistics for one histogram bucket over the optimal runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStats {
    pub bucket: RankBucket,
    /// Mean count of placements in the bucket.
    pub mean_count: f64,
    /// Mean share of each run's own placements in the bucket.
    pub mean_fraction: f64,
}

/// How often each job appeared in any preference list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandProfile {
    /// Counts in job input order; ids never configured are appended.
    counts: Vec<(JobId, usize)>,
}

impl DemandProfile {
    /// Starts a profile with a zero count for every job.
    pub fn new(jobs: &[JobCategory]) -> Self {
        Self {
            counts: jobs.iter().map(|j| (j.id().clone(), 0)).collect(),
        }
    }

    /// Counts every ranked job of every cadet.
    pub fn record_population(&mut self, cadets: &[Cadet]) {
        for cadet in cadets {
            for job in cadet.preferences().jobs() {
                self.record(job);
            }
        }
    }

    pub fn record(&mut self, job: &JobId) {
        match self.counts.iter_mut().find(|(id, _)| id == job) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((job.clone(), 1)),
        }
    }

    pub fn count(&self, job: &JobId) -> usize {
        self.counts
            .iter()
            .find(|(id, _)| id == job)
            .map_or(0, |(_, count)| *count)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Counts in job input order.
    pub fn iter(&self) -> impl Iterator<Item = (&JobId, usize)> {
        self.counts.iter().map(|(id, count)| (id, *count))
    }

    /// Counts from most to least demanded; ties keep job order.
    pub fn sorted_desc(&self) -> Vec<(&JobId, usize)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

/// Aggregated outcome of a batch.
///
/// Statistics cover optimal runs only; infeasible and failed runs are
/// counted separately so the feasibility rate of a configuration is visible.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    base_seed: u64,
    jobs: Vec<JobCategory>,
    runs: Vec<RunRecord>,
    buckets: Vec<BucketStats>,
    demand: DemandProfile,
}

impl BatchSummary {
    /// Aggregates completed runs, in any order.
    pub fn from_runs(base_seed: u64, jobs: &[JobCategory], mut runs: Vec<RunRecord>) -> Self {
        runs.sort_by_key(|r| r.run);

        let results: Vec<&RunResult> = runs.iter().filter_map(|r| r.outcome.result()).collect();
        let optimal = results.len() as f64;
        let buckets = RankBucket::all()
            .map(|bucket| {
                if results.is_empty() {
                    return BucketStats {
                        bucket,
                        mean_count: 0.0,
                        mean_fraction: 0.0,
                    };
                }
                let counts: usize = results.iter().map(|r| r.histogram().count(bucket)).sum();
                let fractions: f64 = results.iter().map(|r| r.histogram().fraction(bucket)).sum();
                BucketStats {
                    bucket,
                    mean_count: counts as f64 / optimal,
                    mean_fraction: fractions / optimal,
                }
            })
            .collect();

        let mut demand = DemandProfile::new(jobs);
        for run in &runs {
            demand.record_population(&run.population);
        }

        Self {
            base_seed,
            jobs: jobs.to_vec(),
            runs,
            buckets,
            demand,
        }
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    pub fn jobs(&self) -> &[JobCategory] {
        &self.jobs
    }

    /// Runs in index order.
    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    pub fn num_runs(&self) -> usize {
        self.runs.len()
    }

    pub fn optimal_count(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| matches!(r.outcome, RunOutcome::Optimal(_)))
            .count()
    }

    pub fn infeasible_count(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| matches!(r.outcome, RunOutcome::Infeasible))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| matches!(r.outcome, RunOutcome::Failed(_)))
            .count()
    }

    /// Share of runs that reached an optimal answer.
    pub fn pass_rate(&self) -> f64 {
        if self.runs.is_empty() {
            0.0
        } else {
            self.optimal_count() as f64 / self.runs.len() as f64
        }
    }

    /// Per-bucket means, ranks 1 through 6 then unranked.
    pub fn buckets(&self) -> &[BucketStats] {
        &self.buckets
    }

    pub fn bucket(&self, bucket: RankBucket) -> Option<&BucketStats> {
        self.buckets.iter().find(|s| s.bucket == bucket)
    }

    pub fn demand(&self) -> &DemandProfile {
        &self.demand
    }

    /// Mean objective value over optimal runs.
    pub fn mean_total_utility(&self) -> f64 {
        self.mean_over_results(RunResult::total_utility)
    }

    /// Mean of each optimal run's utility per placement.
    pub fn mean_placement_utility(&self) -> f64 {
        self.mean_over_results(RunResult::mean_utility)
    }

    /// Mean population size over runs that synthesized one.
    pub fn mean_population(&self) -> f64 {
        let sizes: Vec<usize> = self
            .runs
            .iter()
            .filter(|r| !r.population.is_empty())
            .map(|r| r.population.len())
            .collect();
        if sizes.is_empty() {
            0.0
        } else {
            sizes.iter().sum::<usize>() as f64 / sizes.len() as f64
        }
    }

    /// Average run wall time.
    pub fn avg_elapsed(&self) -> Duration {
        if self.runs.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.runs.iter().map(|r| r.elapsed).sum();
        total / self.runs.len() as u32
    }

    fn mean_over_results(&self, metric: fn(&RunResult) -> f64) -> f64 {
        let values: Vec<f64> = self
            .runs
            .iter()
            .filter_map(|r| r.outcome.result())
            .map(metric)
            .collect();
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }
}
