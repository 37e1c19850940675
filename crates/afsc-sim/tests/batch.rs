//! Batches driven end to end through the `good_lp` oracle.

use afsc_core::{JobCategory, ModelConstructionError, MAX_PREFERENCES};
use afsc_model::{
    AssignmentModel, GoodLpOracle, OracleError, OracleStatus, RankBucket, SolverOracle,
};
use afsc_sim::{
    HarnessSettings, MemorySink, PopulationSynthesizer, RunFailure, RunOutcome, RunStatus,
    SimulationHarness, SynthesisError, DEMAND_TABLE, POPULATION_TABLE, ROSTER_TABLE,
};
use afsc_test::{cadets, jobs};
use tokio::sync::mpsc;

struct Broken;

impl SolverOracle for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn solve(&self, _model: &AssignmentModel) -> Result<OracleStatus, OracleError> {
        Err(OracleError::new("broken", "backend unavailable"))
    }
}

fn harness(runs: usize, seed: u64) -> SimulationHarness<GoodLpOracle> {
    SimulationHarness::new(
        GoodLpOracle,
        HarnessSettings::default()
            .with_num_runs(runs)
            .with_seed(seed),
    )
}

#[test]
fn test_hundred_runs_all_optimal() {
    let jobs = jobs::uniform(6, 1);
    let summary = harness(100, 2024).run_batch(&jobs).unwrap();

    assert_eq!(summary.num_runs(), 100);
    assert_eq!(summary.optimal_count(), 100);
    assert_eq!(summary.pass_rate(), 1.0);

    for run in summary.runs() {
        let result = run.outcome.result().unwrap();
        assert_eq!(run.population.len(), 6);
        assert_eq!(result.assigned_count(), 6);
        let fractions: f64 = RankBucket::all()
            .map(|b| result.histogram().fraction(b))
            .sum();
        assert!((fractions - 1.0).abs() < 1e-9);
        assert!(result.rosters().iter().all(|r| r.len() == 1));
    }

    let means: f64 = summary.buckets().iter().map(|b| b.mean_fraction).sum();
    assert!((means - 1.0).abs() < 1e-9);
    // Every cadet ranks all six jobs, so nobody lands unranked.
    let unranked = summary.bucket(RankBucket::Unranked).unwrap();
    assert_eq!(unranked.mean_count, 0.0);
}

#[test]
fn test_demand_profile_totals() {
    let jobs = jobs::uniform(8, 2);
    let summary = harness(10, 5).run_batch(&jobs).unwrap();

    let cadets: usize = summary.runs().iter().map(|r| r.population.len()).sum();
    assert_eq!(summary.demand().total(), cadets * MAX_PREFERENCES);
}

#[test]
fn test_same_seed_same_batch() {
    let jobs = jobs::overclassed(6, 2, 1.5);
    let a = harness(8, 77).run_batch(&jobs).unwrap();
    let b = harness(8, 77).run_batch(&jobs).unwrap();

    for (ra, rb) in a.runs().iter().zip(b.runs()) {
        assert_eq!(ra.seed, rb.seed);
        assert_eq!(ra.population, rb.population);
        assert_eq!(ra.outcome.label(), rb.outcome.label());
    }
    assert_eq!(a.demand(), b.demand());
    assert_eq!(a.runs()[3].seed, 80);
}

#[test]
fn test_different_workers_same_populations() {
    let jobs = jobs::uniform(6, 1);
    let pooled = SimulationHarness::new(
        GoodLpOracle,
        HarnessSettings::default()
            .with_num_runs(6)
            .with_seed(3)
            .with_workers(2),
    )
    .run_batch(&jobs)
    .unwrap();
    let global = harness(6, 3).run_batch(&jobs).unwrap();

    for (a, b) in pooled.runs().iter().zip(global.runs()) {
        assert_eq!(a.population, b.population);
    }
}

#[test]
fn test_oracle_failures_do_not_abort_batch() {
    let jobs = jobs::uniform(6, 1);
    let summary = SimulationHarness::new(
        Broken,
        HarnessSettings::default().with_num_runs(5).with_seed(1),
    )
    .run_batch(&jobs)
    .unwrap();

    assert_eq!(summary.num_runs(), 5);
    assert_eq!(summary.failed_count(), 5);
    assert!(summary
        .runs()
        .iter()
        .all(|r| matches!(r.outcome, RunOutcome::Failed(RunFailure::Solve(_)))));
    // Populations were still synthesized.
    assert!(summary.runs().iter().all(|r| r.population.len() == 6));
}

#[test]
fn test_insufficient_demand_recorded_per_run() {
    let jobs = jobs::weighted(&[("A", 1, 1.0), ("B", 1, 1.0), ("C", 1, 0.0)]);
    let summary = harness(3, 0).run_batch(&jobs).unwrap();

    assert_eq!(summary.failed_count(), 3);
    for run in summary.runs() {
        assert!(run.population.is_empty());
        assert_eq!(
            run.outcome,
            RunOutcome::Failed(RunFailure::Synthesis(SynthesisError::InsufficientDemand {
                positive: 2,
                required: MAX_PREFERENCES,
            }))
        );
    }
}

#[test]
fn test_malformed_job_fails_every_run_without_aborting() {
    let mut jobs = jobs::uniform(6, 1);
    jobs[0] = jobs[0].clone().with_overclass_factor(f64::INFINITY);
    let summary = harness(2, 6).run_batch(&jobs).unwrap();

    assert_eq!(summary.num_runs(), 2);
    assert_eq!(summary.failed_count(), 2);
    for run in summary.runs() {
        assert!(run.population.is_empty());
        assert!(matches!(
            run.outcome,
            RunOutcome::Failed(RunFailure::Synthesis(SynthesisError::Job(
                ModelConstructionError::OverclassFactor { .. }
            )))
        ));
    }
}

#[test]
fn test_oversized_population_band_fails_run() {
    let mut jobs = jobs::uniform(6, 1);
    jobs[3] = jobs[3].clone().with_overclass_factor(1e15);
    let summary = harness(3, 6).run_batch(&jobs).unwrap();

    assert_eq!(summary.failed_count(), 3);
    assert!(summary.runs().iter().all(|r| matches!(
        r.outcome,
        RunOutcome::Failed(RunFailure::Synthesis(SynthesisError::PopulationTooLarge { .. }))
    )));
}

#[test]
fn test_shorter_lists_fit_small_job_sets() {
    let jobs = jobs::uniform(3, 1);
    let settings = HarnessSettings::default()
        .with_num_runs(4)
        .with_seed(9)
        .with_synthesizer(PopulationSynthesizer::new().with_preference_count(3));
    let summary = SimulationHarness::new(GoodLpOracle, settings)
        .run_batch(&jobs)
        .unwrap();

    assert_eq!(summary.optimal_count(), 4);
}

#[test]
fn test_channel_receives_one_event_per_run() {
    let jobs = jobs::uniform(6, 1);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let summary = harness(7, 12).run_batch_with_channel(&jobs, tx).unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(events.len(), summary.num_runs());
    events.sort_by_key(|e| e.run);
    assert!(events.iter().enumerate().all(|(i, e)| e.run == i));
    assert!(events.iter().all(|e| e.status == RunStatus::Optimal));
}

#[test]
fn test_run_population() {
    let jobs: Vec<JobCategory> = jobs::uniform(3, 1);
    let population = cadets::fully_qualified(3, &jobs);
    let outcome = harness(1, 0).run_population(&population, &jobs);

    let result = outcome.result().unwrap();
    assert_eq!(result.assigned_count(), 3);
    assert_eq!(result.histogram().total(), 3);
}

#[test]
fn test_export_tables() {
    let jobs = jobs::uniform(6, 1);
    let summary = harness(2, 4).run_batch(&jobs).unwrap();

    let mut sink = MemorySink::new();
    summary.export(&mut sink).unwrap();
    assert_eq!(sink.table(ROSTER_TABLE).unwrap().len(), 12);
    assert_eq!(sink.table(POPULATION_TABLE).unwrap().len(), 12);
    assert_eq!(sink.table(DEMAND_TABLE).unwrap().len(), 6);
}
