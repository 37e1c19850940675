//! Monte Carlo harness: synthesize, build, solve and aggregate, N times.

use std::time::{Duration, Instant};

use afsc_config::SimulationConfig;
use afsc_core::{Cadet, JobCategory, DEFAULT_DEVIATION_PENALTY};
use afsc_model::{solve, ModelBuilder, RunResult, SolveOutcome, SolverOracle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::error::SimulationError;
use crate::pool::WorkerPool;
use crate::summary::{BatchSummary, RunFailure, RunOutcome, RunRecord};
use crate::synth::PopulationSynthesizer;

/// Settings for a batch of runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarnessSettings {
    pub num_runs: usize,
    /// Base seed; run `i` uses `seed + i`. Drawn from the OS when `None`.
    pub seed: Option<u64>,
    pub deviation_penalty: f64,
    pub workers: WorkerPool,
    pub synthesizer: PopulationSynthesizer,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            deviation_penalty: DEFAULT_DEVIATION_PENALTY,
            workers: WorkerPool::default(),
            synthesizer: PopulationSynthesizer::default(),
        }
    }
}

impl From<&SimulationConfig> for HarnessSettings {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            num_runs: config.num_runs,
            seed: config.random_seed,
            deviation_penalty: config.deviation_penalty,
            workers: WorkerPool::from(config.worker_threads),
            synthesizer: PopulationSynthesizer::from(&config.population),
        }
    }
}

impl HarnessSettings {
    pub fn with_num_runs(mut self, num_runs: usize) -> Self {
        self.num_runs = num_runs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_deviation_penalty(mut self, penalty: f64) -> Self {
        self.deviation_penalty = penalty;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = WorkerPool::with_workers(workers);
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: PopulationSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }
}

/// Coarse status carried by a [`RunEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Optimal,
    Infeasible,
    Failed,
}

/// Progress notification sent as each run completes.
#[derive(Debug, Clone, PartialEq)]
pub struct RunEvent {
    pub run: usize,
    pub status: RunStatus,
    pub population: usize,
    pub elapsed: Duration,
}

impl From<&RunRecord> for RunEvent {
    fn from(record: &RunRecord) -> Self {
        let status = match record.outcome {
            RunOutcome::Optimal(_) => RunStatus::Optimal,
            RunOutcome::Infeasible => RunStatus::Infeasible,
            RunOutcome::Failed(_) => RunStatus::Failed,
        };
        Self {
            run: record.run,
            status,
            population: record.population.len(),
            elapsed: record.elapsed,
        }
    }
}

/// Runs the synthesize-build-solve-aggregate pipeline over many populations.
///
/// Runs are independent and execute in parallel on a rayon pool. Each run
/// seeds its own `ChaCha8Rng` with `seed + run`, so a batch with a fixed seed
/// is reproducible however the runs are scheduled. Per-run problems are
/// recorded in the summary and never abort the batch.
///
/// # Example
///
/// ```
/// use afsc_core::JobCategory;
/// use afsc_model::GoodLpOracle;
/// use afsc_sim::{HarnessSettings, SimulationHarness};
///
/// let jobs: Vec<JobCategory> = (1..=6)
///     .map(|i| JobCategory::new(format!("J{i}"), 1).with_popularity_weight(1.0))
///     .collect();
///
/// let settings = HarnessSettings::default().with_num_runs(4).with_seed(11);
/// let summary = SimulationHarness::new(GoodLpOracle, settings)
///     .run_batch(&jobs)
///     .unwrap();
///
/// assert_eq!(summary.num_runs(), 4);
/// assert_eq!(summary.optimal_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationHarness<O> {
    oracle: O,
    settings: HarnessSettings,
}

impl<O: SolverOracle> SimulationHarness<O> {
    pub fn new(oracle: O, settings: HarnessSettings) -> Self {
        Self { oracle, settings }
    }

    /// Creates a harness from the batch settings in `config`.
    pub fn from_config(oracle: O, config: &SimulationConfig) -> Self {
        Self::new(oracle, HarnessSettings::from(config))
    }

    pub fn settings(&self) -> &HarnessSettings {
        &self.settings
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Runs `num_runs` synthesized populations against `jobs`.
    ///
    /// # Errors
    ///
    /// Only when the worker pool cannot be built.
    pub fn run_batch(&self, jobs: &[JobCategory]) -> Result<BatchSummary, SimulationError> {
        self.execute(jobs, None)
    }

    /// Like [`run_batch`](Self::run_batch), sending a [`RunEvent`] on
    /// `events` as each run completes. A closed channel is ignored.
    pub fn run_batch_with_channel(
        &self,
        jobs: &[JobCategory],
        events: UnboundedSender<RunEvent>,
    ) -> Result<BatchSummary, SimulationError> {
        self.execute(jobs, Some(&events))
    }

    /// Builds and solves a single externally supplied population.
    pub fn run_population(&self, cadets: &[Cadet], jobs: &[JobCategory]) -> RunOutcome {
        self.pipeline("population", cadets, jobs)
            .unwrap_or_else(RunOutcome::Failed)
    }

    fn execute(
        &self,
        jobs: &[JobCategory],
        events: Option<&UnboundedSender<RunEvent>>,
    ) -> Result<BatchSummary, SimulationError> {
        let base_seed = self.settings.seed.unwrap_or_else(rand::random::<u64>);
        let num_runs = self.settings.num_runs;
        info!(
            event = "batch_start",
            runs = num_runs,
            jobs = jobs.len(),
            seed = base_seed,
            workers = self.settings.workers.workers,
            oracle = self.oracle.name(),
        );
        let start = Instant::now();

        let runs: Vec<RunRecord> = self.settings.workers.install(|| {
            (0..num_runs)
                .into_par_iter()
                .map(|run| {
                    let record = self.run_synthesized(run, base_seed, jobs);
                    if let Some(tx) = events {
                        let _ = tx.send(RunEvent::from(&record));
                    }
                    record
                })
                .collect()
        })?;

        let summary = BatchSummary::from_runs(base_seed, jobs, runs);
        info!(
            event = "batch_end",
            runs = summary.num_runs(),
            optimal = summary.optimal_count(),
            infeasible = summary.infeasible_count(),
            failed = summary.failed_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
        );
        Ok(summary)
    }

    fn run_synthesized(&self, run: usize, base_seed: u64, jobs: &[JobCategory]) -> RunRecord {
        let start = Instant::now();
        let seed = base_seed.wrapping_add(run as u64);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let (population, outcome) = match self.settings.synthesizer.synthesize(jobs, &mut rng) {
            Ok(cadets) => {
                let name = format!("run_{}", run + 1);
                let outcome = self
                    .pipeline(&name, &cadets, jobs)
                    .unwrap_or_else(RunOutcome::Failed);
                (cadets, outcome)
            }
            Err(e) => (Vec::new(), RunOutcome::Failed(e.into())),
        };

        let elapsed = start.elapsed();
        if let RunOutcome::Failed(reason) = &outcome {
            warn!(event = "run_failed", run = run, seed = seed, error = %reason);
        } else {
            debug!(
                event = "run_end",
                run = run,
                population = population.len(),
                outcome = outcome.label(),
                elapsed_ms = elapsed.as_millis() as u64,
            );
        }

        RunRecord {
            run,
            seed,
            population,
            outcome,
            elapsed,
        }
    }

    fn pipeline(
        &self,
        name: &str,
        cadets: &[Cadet],
        jobs: &[JobCategory],
    ) -> Result<RunOutcome, RunFailure> {
        let model = ModelBuilder::new(cadets, jobs)
            .with_deviation_penalty(self.settings.deviation_penalty)
            .with_name(name)
            .build()?;
        Ok(match solve(&self.oracle, &model)? {
            SolveOutcome::Optimal(assignment) => {
                RunOutcome::Optimal(RunResult::from_assignment(&assignment, cadets, jobs))
            }
            SolveOutcome::Infeasible => RunOutcome::Infeasible,
        })
    }
}
