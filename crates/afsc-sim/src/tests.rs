//! Tests for batch aggregation, export tables and the Markdown report

use std::time::Duration;

use afsc_core::{Cadet, JobId, Rank};
use afsc_model::{AssignmentModel, OracleError, OracleStatus, RankBucket, SolverOracle};
use afsc_test::{cadets, jobs};

use super::error::SynthesisError;
use super::export::{
    demand_records, population_records, roster_records, FieldValue, MemorySink, Record,
    DEMAND_TABLE, POPULATION_TABLE, ROSTER_TABLE,
};
use super::harness::{HarnessSettings, RunEvent, RunStatus, SimulationHarness};
use super::report::MarkdownReport;
use super::summary::{BatchSummary, DemandProfile, RunFailure, RunOutcome, RunRecord};

/// Oracle placing cadet `c` in job `c % num_jobs`, ignoring the constraints.
struct Diagonal;

impl SolverOracle for Diagonal {
    fn name(&self) -> &'static str {
        "diagonal"
    }

    fn solve(&self, model: &AssignmentModel) -> Result<OracleStatus, OracleError> {
        let mut values = vec![0.0; model.variables().len()];
        for cadet in 0..model.num_cadets() {
            values[model.variable(cadet, cadet % model.num_jobs()).index()] = 1.0;
        }
        Ok(OracleStatus::Optimal(values))
    }
}

fn record(run: usize, population: Vec<Cadet>, outcome: RunOutcome) -> RunRecord {
    RunRecord {
        run,
        seed: 100 + run as u64,
        population,
        outcome,
        elapsed: Duration::from_millis(10),
    }
}

/// Four runs over jobs J1, J2:
///
/// - run 0: two ranked cadets, placed at ranks 1 and 2
/// - run 1: one cadet with no preferences, placed unranked
/// - run 2: infeasible, population of two
/// - run 3: synthesis failed
fn mixed_summary() -> BatchSummary {
    let jobs = jobs::uniform(2, 1);
    let harness = SimulationHarness::new(Diagonal, HarnessSettings::default());

    let ranked = cadets::fully_qualified(2, &jobs);
    let unranked = cadets::unattested(1);
    let run0 = harness.run_population(&ranked, &jobs);
    let run1 = harness.run_population(&unranked, &jobs);
    let failure = RunFailure::from(SynthesisError::InvalidProbability(2.0));

    BatchSummary::from_runs(
        9,
        &jobs,
        vec![
            record(2, ranked.clone(), RunOutcome::Infeasible),
            record(0, ranked, run0),
            record(3, Vec::new(), RunOutcome::Failed(failure)),
            record(1, unranked, run1),
        ],
    )
}

fn rank(r: u8) -> RankBucket {
    RankBucket::Ranked(Rank::new(r).unwrap())
}

#[test]
fn test_runs_sorted_and_counted() {
    let summary = mixed_summary();

    let order: Vec<usize> = summary.runs().iter().map(|r| r.run).collect();
    assert_eq!(order, vec![0, 1, 2, 3]);
    assert_eq!(summary.base_seed(), 9);
    assert_eq!(summary.num_runs(), 4);
    assert_eq!(summary.optimal_count(), 2);
    assert_eq!(summary.infeasible_count(), 1);
    assert_eq!(summary.failed_count(), 1);
    assert!((summary.pass_rate() - 0.5).abs() < 1e-12);
    assert_eq!(summary.runs()[3].outcome.label(), "failed");
}

#[test]
fn test_bucket_means_cover_optimal_runs_only() {
    let summary = mixed_summary();

    let first = summary.bucket(rank(1)).unwrap();
    assert!((first.mean_count - 0.5).abs() < 1e-12);
    assert!((first.mean_fraction - 0.25).abs() < 1e-12);

    let second = summary.bucket(rank(2)).unwrap();
    assert!((second.mean_fraction - 0.25).abs() < 1e-12);

    let unranked = summary.bucket(RankBucket::Unranked).unwrap();
    assert!((unranked.mean_count - 0.5).abs() < 1e-12);
    assert!((unranked.mean_fraction - 0.5).abs() < 1e-12);

    assert_eq!(summary.buckets().len(), 7);
    let total: f64 = summary.buckets().iter().map(|b| b.mean_fraction).sum();
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn test_utility_and_population_means() {
    let summary = mixed_summary();

    let results: Vec<_> = summary
        .runs()
        .iter()
        .filter_map(|r| r.outcome.result())
        .collect();
    assert_eq!(results.len(), 2);
    let expected_total = (results[0].total_utility() + results[1].total_utility()) / 2.0;
    let expected_mean = (results[0].mean_utility() + results[1].mean_utility()) / 2.0;
    assert!((summary.mean_total_utility() - expected_total).abs() < 1e-9);
    assert!((summary.mean_placement_utility() - expected_mean).abs() < 1e-9);

    assert!((summary.mean_population() - 5.0 / 3.0).abs() < 1e-12);
    assert_eq!(summary.avg_elapsed(), Duration::from_millis(10));
}

#[test]
fn test_empty_batch() {
    let summary = BatchSummary::from_runs(0, &jobs::uniform(2, 1), Vec::new());
    assert_eq!(summary.pass_rate(), 0.0);
    assert_eq!(summary.mean_total_utility(), 0.0);
    assert_eq!(summary.mean_population(), 0.0);
    assert_eq!(summary.avg_elapsed(), Duration::ZERO);
    assert!(summary.buckets().iter().all(|b| b.mean_fraction == 0.0));
}

#[test]
fn test_demand_counts_every_population() {
    let summary = mixed_summary();
    let demand = summary.demand();

    // Runs 0 and 2 each carry two cadets ranking J1 then J2.
    assert_eq!(demand.count(&JobId::from("J1")), 4);
    assert_eq!(demand.count(&JobId::from("J2")), 4);
    assert_eq!(demand.total(), 8);
}

#[test]
fn test_demand_sorted_desc_is_stable() {
    let mut demand = DemandProfile::new(&jobs::uniform(3, 1));
    for id in ["J2", "J3", "J2", "J1", "J3", "X9"] {
        demand.record(&JobId::from(id));
    }

    let sorted: Vec<(&str, usize)> = demand
        .sorted_desc()
        .into_iter()
        .map(|(id, count)| (id.as_str(), count))
        .collect();
    assert_eq!(sorted, vec![("J2", 2), ("J3", 2), ("J1", 1), ("X9", 1)]);

    let order: Vec<&str> = demand.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(order, vec!["J1", "J2", "J3", "X9"]);
    assert_eq!(demand.count(&JobId::from("Z")), 0);
}

#[test]
fn test_roster_records() {
    let summary = mixed_summary();
    let rows = roster_records(&summary);

    assert_eq!(rows.len(), 3);
    let names: Vec<&str> = rows[0].names().collect();
    assert_eq!(
        names,
        vec!["run", "job", "cadet", "percentile", "qualification", "preference_rank"]
    );
    assert_eq!(rows[0].get("run"), Some(&FieldValue::Int(1)));
    assert_eq!(rows[0].get("job"), Some(&FieldValue::Text("J1".into())));
    assert_eq!(rows[0].get("cadet"), Some(&FieldValue::Text("Cadet 1".into())));
    assert_eq!(
        rows[0].get("qualification"),
        Some(&FieldValue::Text("Permitted".into()))
    );
    assert_eq!(rows[1].get("preference_rank"), Some(&FieldValue::Int(2)));

    let unranked = &rows[2];
    assert_eq!(unranked.get("run"), Some(&FieldValue::Int(2)));
    assert_eq!(unranked.get("preference_rank"), Some(&FieldValue::Empty));
    assert_eq!(unranked.get("qualification"), Some(&FieldValue::Empty));
}

#[test]
fn test_population_records() {
    let summary = mixed_summary();
    let rows = population_records(&summary);

    // 2 + 1 + 2 cadets; the failed run has no population.
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].fields().len(), 4 + 6 + 6);
    assert_eq!(rows[0].get("preference_1"), Some(&FieldValue::Text("J1".into())));
    assert_eq!(rows[0].get("preference_2"), Some(&FieldValue::Text("J2".into())));
    assert_eq!(rows[0].get("preference_3"), Some(&FieldValue::Empty));
    assert_eq!(
        rows[0].get("qualification_2"),
        Some(&FieldValue::Text("Permitted".into()))
    );
    assert_eq!(rows[0].get("origin_group_a"), Some(&FieldValue::Bool(false)));
    assert_eq!(rows[2].get("preference_1"), Some(&FieldValue::Empty));
    assert_eq!(rows[4].get("run"), Some(&FieldValue::Int(3)));
}

#[test]
fn test_demand_records() {
    let summary = mixed_summary();
    let rows = demand_records(&summary);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("job"), Some(&FieldValue::Text("J1".into())));
    assert_eq!(rows[0].get("preference_count"), Some(&FieldValue::Int(4)));
}

#[test]
fn test_export_writes_three_tables() {
    let summary = mixed_summary();
    let mut sink = MemorySink::new();
    summary.export(&mut sink).unwrap();

    let names: Vec<&str> = sink.table_names().collect();
    assert_eq!(names, vec![DEMAND_TABLE, POPULATION_TABLE, ROSTER_TABLE]);
    assert_eq!(sink.table(ROSTER_TABLE).unwrap().len(), 3);
    assert_eq!(sink.table(POPULATION_TABLE).unwrap().len(), 5);
    assert!(sink.table("missing").is_none());
}

#[test]
fn test_field_value_display() {
    assert_eq!(FieldValue::from(3usize).to_string(), "3");
    assert_eq!(FieldValue::from(0.25).to_string(), "0.25");
    assert_eq!(FieldValue::from("J1").to_string(), "J1");
    assert_eq!(FieldValue::from(true).to_string(), "true");
    assert_eq!(FieldValue::from(None::<&str>).to_string(), "");

    let record = Record::new().with("a", 1usize).with("b", Some("x"));
    assert_eq!(record.get("b"), Some(&FieldValue::Text("x".into())));
    assert!(record.get("c").is_none());
}

#[test]
fn test_markdown_report() {
    let summary = mixed_summary();
    let md = MarkdownReport::new(&summary).to_string();

    assert!(md.contains("- **Runs**: 4"));
    assert!(md.contains("- **Seed**: 9"));
    assert!(md.contains("| Optimal | 2 |"));
    assert!(md.contains("| Infeasible | 1 |"));
    assert!(md.contains("| Failed | 1 |"));
    assert!(md.contains("| Pass Rate | 50.00% |"));
    assert!(md.contains("| 1 | 0.50 | 25.00% |"));
    assert!(md.contains("| unranked | 0.50 | 50.00% |"));
    assert!(md.contains("| J1 | 4 |"));

    let mut buffer = Vec::new();
    MarkdownReport::new(&summary).write(&mut buffer).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), md);
}

#[test]
fn test_run_event_from_record() {
    let summary = mixed_summary();

    let event = RunEvent::from(&summary.runs()[0]);
    assert_eq!(event.run, 0);
    assert_eq!(event.status, RunStatus::Optimal);
    assert_eq!(event.population, 2);

    assert_eq!(RunEvent::from(&summary.runs()[2]).status, RunStatus::Infeasible);
    assert_eq!(RunEvent::from(&summary.runs()[3]).status, RunStatus::Failed);
}

#[test]
fn test_run_population_construction_failure() {
    let harness = SimulationHarness::new(Diagonal, HarnessSettings::default());
    let outcome = harness.run_population(&cadets::unattested(1), &[]);
    assert!(matches!(
        outcome,
        RunOutcome::Failed(RunFailure::Construction(_))
    ));
}
