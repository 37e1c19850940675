//! Submits a model to an oracle and interprets the answer.

use std::time::Instant;

use thiserror::Error;
use tracing::debug;

use crate::model::AssignmentModel;
use crate::oracle::{OracleError, OracleStatus, SolverOracle};

/// Allowed distance of a reported value from 0 or 1.
pub const BINARY_TOLERANCE: f64 = 1e-6;

/// Terminal outcome of a solve. Infeasibility is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Optimal(Assignment),
    Infeasible,
}

impl SolveOutcome {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveOutcome::Optimal(_))
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SolveOutcome::Optimal(assignment) => Some(assignment),
            SolveOutcome::Infeasible => None,
        }
    }
}

/// Errors raised while solving.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The oracle failed internally.
    #[error(transparent)]
    SolverFailure(#[from] OracleError),

    /// The oracle answered, but its values do not describe a valid placement.
    #[error("inconsistent assignment: {0}")]
    InconsistentAssignment(AssignmentDefect),
}

/// What was wrong with the values an oracle returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignmentDefect {
    #[error("expected {expected} values, got {actual}")]
    ValueCount { expected: usize, actual: usize },

    #[error("variable {variable} has non-binary value {value}")]
    NonBinary { variable: String, value: f64 },

    #[error("cadet {cadet} is placed in {count} jobs")]
    PlacementCount { cadet: String, count: usize },
}

/// A validated placement of every cadet in exactly one job.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    job_by_cadet: Vec<usize>,
    utility_by_cadet: Vec<f64>,
}

impl Assignment {
    /// Job index assigned to each cadet, in model cadet order.
    pub fn job_by_cadet(&self) -> &[usize] {
        &self.job_by_cadet
    }

    /// Objective coefficient of each cadet's placement.
    pub fn utility_by_cadet(&self) -> &[f64] {
        &self.utility_by_cadet
    }

    pub fn job_of(&self, cadet: usize) -> Option<usize> {
        self.job_by_cadet.get(cadet).copied()
    }

    pub fn num_cadets(&self) -> usize {
        self.job_by_cadet.len()
    }

    /// Objective value of the placement.
    pub fn objective_value(&self) -> f64 {
        self.utility_by_cadet.iter().sum()
    }

    /// Headcount per job index.
    pub fn headcounts(&self, num_jobs: usize) -> Vec<usize> {
        let mut counts = vec![0; num_jobs];
        for &job in &self.job_by_cadet {
            if let Some(count) = counts.get_mut(job) {
                *count += 1;
            }
        }
        counts
    }
}

/// Solves `model` once with `oracle`.
///
/// No retry happens on infeasibility. On an optimal answer the values are
/// checked against the model: one value per variable, each binary within
/// [`BINARY_TOLERANCE`], and exactly one job per cadet.
///
/// # Errors
///
/// [`SolveError::SolverFailure`] when the oracle fails and
/// [`SolveError::InconsistentAssignment`] when its values are unusable.
pub fn solve<O>(oracle: &O, model: &AssignmentModel) -> Result<SolveOutcome, SolveError>
where
    O: SolverOracle + ?Sized,
{
    let start = Instant::now();
    let status = oracle.solve(model)?;
    let elapsed = start.elapsed();

    let outcome = match status {
        OracleStatus::Optimal(values) => SolveOutcome::Optimal(interpret(model, &values)?),
        OracleStatus::Infeasible => SolveOutcome::Infeasible,
    };

    debug!(
        event = "model_solved",
        oracle = oracle.name(),
        model = %model.name(),
        optimal = outcome.is_optimal(),
        objective = ?outcome.assignment().map(Assignment::objective_value),
        elapsed_ms = elapsed.as_millis() as u64,
    );

    Ok(outcome)
}

fn interpret(model: &AssignmentModel, values: &[f64]) -> Result<Assignment, SolveError> {
    let expected = model.variables().len();
    if values.len() != expected {
        return Err(SolveError::InconsistentAssignment(
            AssignmentDefect::ValueCount {
                expected,
                actual: values.len(),
            },
        ));
    }

    let mut chosen = vec![false; expected];
    for (variable, &value) in model.variables().iter().zip(values) {
        let is_one = (value - 1.0).abs() <= BINARY_TOLERANCE;
        if !is_one && value.abs() > BINARY_TOLERANCE {
            return Err(SolveError::InconsistentAssignment(
                AssignmentDefect::NonBinary {
                    variable: variable.name().to_string(),
                    value,
                },
            ));
        }
        let id = model.variable(variable.cadet(), variable.job());
        chosen[id.index()] = is_one;
    }

    let num_jobs = model.num_jobs();
    let utilities = model.objective().dense_coefficients(expected);
    let mut job_by_cadet = Vec::with_capacity(model.num_cadets());
    let mut utility_by_cadet = Vec::with_capacity(model.num_cadets());
    for (cadet, id) in model.cadet_ids().iter().enumerate() {
        let jobs: Vec<usize> = (0..num_jobs)
            .filter(|&job| chosen[model.variable(cadet, job).index()])
            .collect();
        let &[job] = jobs.as_slice() else {
            return Err(SolveError::InconsistentAssignment(
                AssignmentDefect::PlacementCount {
                    cadet: id.to_string(),
                    count: jobs.len(),
                },
            ));
        };
        job_by_cadet.push(job);
        utility_by_cadet.push(utilities[model.variable(cadet, job).index()]);
    }

    Ok(Assignment {
        job_by_cadet,
        utility_by_cadet,
    })
}
