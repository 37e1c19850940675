//! Tests for solve interpretation and result aggregation

use afsc_core::{Qualification, Rank};
use afsc_test::{cadets, jobs, CadetBuilder};

use super::builder::ModelBuilder;
use super::model::{AssignmentModel, LinearExpr};
use super::oracle::{OracleError, OracleStatus, SolverOracle};
use super::result::{RankBucket, RankHistogram, RunResult};
use super::solve::{solve, AssignmentDefect, SolveError, SolveOutcome};

/// Oracle answering every model with a fixed response.
struct Scripted(Result<OracleStatus, OracleError>);

impl SolverOracle for Scripted {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn solve(&self, _model: &AssignmentModel) -> Result<OracleStatus, OracleError> {
        self.0.clone()
    }
}

/// Values placing cadet `c` in `jobs[c]`.
fn values_for(model: &AssignmentModel, jobs: &[usize]) -> Vec<f64> {
    let mut values = vec![0.0; model.variables().len()];
    for (cadet, &job) in jobs.iter().enumerate() {
        values[model.variable(cadet, job).index()] = 1.0;
    }
    values
}

fn three_by_three() -> AssignmentModel {
    let jobs = jobs::uniform(3, 1);
    let cadets = cadets::fully_qualified(3, &jobs);
    ModelBuilder::new(&cadets, &jobs).build().unwrap()
}

#[test]
fn test_optimal_values_become_assignment() {
    let model = three_by_three();
    let oracle = Scripted(Ok(OracleStatus::Optimal(values_for(&model, &[2, 0, 1]))));

    let outcome = solve(&oracle, &model).unwrap();
    let assignment = outcome.assignment().unwrap();
    assert_eq!(assignment.job_by_cadet(), &[2, 0, 1]);
    assert_eq!(assignment.headcounts(3), vec![1, 1, 1]);
    let expected: f64 = (0..3)
        .map(|c| model.objective().coefficient(model.variable(c, assignment.job_by_cadet()[c])))
        .sum();
    assert!((assignment.objective_value() - expected).abs() < 1e-9);
}

#[test]
fn test_dense_coefficients_match_sparse_lookup() {
    let model = three_by_three();
    let dense = model.objective().dense_coefficients(model.variables().len());
    for v in model.variables() {
        let id = model.variable(v.cadet(), v.job());
        assert_eq!(dense[id.index()], model.objective().coefficient(id));
    }

    let mut expr = LinearExpr::new();
    expr.add_term(model.variable(0, 1), 2.0);
    expr.add_term(model.variable(0, 1), 0.5);
    expr.add_term(model.variable(2, 2), 9.0);
    assert_eq!(expr.dense_coefficients(2), vec![0.0, 2.5]);
}

#[test]
fn test_values_within_tolerance_are_binary() {
    let model = three_by_three();
    let mut values = values_for(&model, &[0, 1, 2]);
    values[0] = 0.999_999_9;
    values[1] = 1e-8;
    let outcome = solve(&Scripted(Ok(OracleStatus::Optimal(values))), &model).unwrap();
    assert!(outcome.is_optimal());
}

#[test]
fn test_infeasible_is_not_an_error() {
    let model = three_by_three();
    let outcome = solve(&Scripted(Ok(OracleStatus::Infeasible)), &model).unwrap();
    assert_eq!(outcome, SolveOutcome::Infeasible);
    assert!(outcome.assignment().is_none());
}

#[test]
fn test_oracle_error_is_solver_failure() {
    let model = three_by_three();
    let oracle = Scripted(Err(OracleError::new("scripted", "license expired")));
    match solve(&oracle, &model) {
        Err(SolveError::SolverFailure(e)) => {
            assert_eq!(e.message, "license expired");
            assert_eq!(e.to_string(), "scripted oracle failed: license expired");
        }
        other => panic!("expected solver failure, got {other:?}"),
    }
}

#[test]
fn test_wrong_value_count() {
    let model = three_by_three();
    let oracle = Scripted(Ok(OracleStatus::Optimal(vec![1.0; 4])));
    assert_eq!(
        solve(&oracle, &model).unwrap_err(),
        SolveError::InconsistentAssignment(AssignmentDefect::ValueCount {
            expected: 9,
            actual: 4
        })
    );
}

#[test]
fn test_fractional_value() {
    let model = three_by_three();
    let mut values = values_for(&model, &[0, 1, 2]);
    values[3] = 0.5;
    assert!(matches!(
        solve(&Scripted(Ok(OracleStatus::Optimal(values))), &model),
        Err(SolveError::InconsistentAssignment(AssignmentDefect::NonBinary { variable, .. }))
            if variable == "Cadet 2_J1"
    ));
}

#[test]
fn test_cadet_placed_twice_or_never() {
    let model = three_by_three();
    let mut values = values_for(&model, &[0, 1, 2]);
    values[model.variable(0, 1).index()] = 1.0;
    assert_eq!(
        solve(&Scripted(Ok(OracleStatus::Optimal(values))), &model).unwrap_err(),
        SolveError::InconsistentAssignment(AssignmentDefect::PlacementCount {
            cadet: "Cadet 1".to_string(),
            count: 2
        })
    );

    let mut values = values_for(&model, &[0, 1, 2]);
    values[model.variable(2, 2).index()] = 0.0;
    assert!(matches!(
        solve(&Scripted(Ok(OracleStatus::Optimal(values))), &model),
        Err(SolveError::InconsistentAssignment(AssignmentDefect::PlacementCount { count: 0, .. }))
    ));
}

#[test]
fn test_oracle_through_arc_and_dyn() {
    let model = three_by_three();
    let oracle: std::sync::Arc<dyn SolverOracle> =
        std::sync::Arc::new(Scripted(Ok(OracleStatus::Infeasible)));
    assert_eq!(solve(&oracle, &model).unwrap(), SolveOutcome::Infeasible);
    assert_eq!(solve(oracle.as_ref(), &model).unwrap(), SolveOutcome::Infeasible);
}

#[test]
fn test_run_result_rosters_and_histogram() {
    let jobs = jobs::uniform(3, 1);
    let cadets = vec![
        CadetBuilder::new("a")
            .percentile(0.9)
            .prefers(&["J1", "J2"])
            .qualified("J1", Qualification::Mandatory)
            .qualified("J2", Qualification::Desired)
            .build(),
        CadetBuilder::new("b")
            .percentile(0.4)
            .prefers(&["J1", "J2"])
            .qualified_for_all(&jobs, Qualification::Permitted)
            .build(),
        CadetBuilder::new("c").percentile(0.1).build(),
    ];
    let model = ModelBuilder::new(&cadets, &jobs).build().unwrap();
    let oracle = Scripted(Ok(OracleStatus::Optimal(values_for(&model, &[0, 1, 2]))));
    let SolveOutcome::Optimal(assignment) = solve(&oracle, &model).unwrap() else {
        panic!("expected optimal");
    };

    let result = RunResult::from_assignment(&assignment, &cadets, &jobs);
    assert_eq!(result.assigned_count(), 3);
    assert_eq!(result.rosters().len(), 3);
    assert_eq!(result.rosters()[0].job.as_str(), "J1");
    assert_eq!(result.rosters()[0].cadets[0].as_str(), "a");
    assert_eq!(result.roster(&"J3".into()).unwrap().len(), 1);

    let hist = result.histogram();
    assert_eq!(hist.count(RankBucket::Ranked(Rank::FIRST)), 1);
    assert_eq!(hist.count(RankBucket::Ranked(Rank::new(2).unwrap())), 1);
    assert_eq!(hist.count(RankBucket::Unranked), 1);
    assert_eq!(hist.total(), result.assigned_count());

    let c = &result.placements()[2];
    assert_eq!(c.qualification, None);
    assert_eq!(c.rank, None);
    assert_eq!(c.utility, -50_000.0);

    let a = &result.placements()[0];
    assert_eq!(a.qualification, Some(Qualification::Mandatory));
    assert!((a.utility - 259.0).abs() < 1e-9);
    assert!((result.total_utility() - assignment.objective_value()).abs() < 1e-9);
    assert!((result.mean_utility() - result.total_utility() / 3.0).abs() < 1e-9);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "assignment and cadet slice differ in length")]
fn test_run_result_rejects_mismatched_cadets() {
    let jobs = jobs::uniform(3, 1);
    let cadets = cadets::fully_qualified(3, &jobs);
    let model = ModelBuilder::new(&cadets, &jobs).build().unwrap();
    let oracle = Scripted(Ok(OracleStatus::Optimal(values_for(&model, &[0, 1, 2]))));
    let SolveOutcome::Optimal(assignment) = solve(&oracle, &model).unwrap() else {
        panic!("expected optimal");
    };

    RunResult::from_assignment(&assignment, &cadets[..2], &jobs);
}

#[test]
fn test_histogram_fraction_and_merge() {
    let mut hist = RankHistogram::new();
    assert_eq!(hist.fraction(RankBucket::Unranked), 0.0);
    hist.record(RankBucket::Ranked(Rank::FIRST));
    hist.record(RankBucket::Unranked);
    hist.record(RankBucket::Unranked);
    assert!((hist.fraction(RankBucket::Unranked) - 2.0 / 3.0).abs() < 1e-9);

    let mut other = RankHistogram::new();
    other.record(RankBucket::from(Rank::new(6)));
    hist.merge(&other);
    assert_eq!(hist.total(), 4);
    assert_eq!(hist.iter().count(), 7);
    assert_eq!(hist.iter().last(), Some((RankBucket::Unranked, 2)));
    assert_eq!(RankBucket::Unranked.to_string(), "unranked");
}
