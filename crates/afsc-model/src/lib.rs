//! AFSC Model - the assignment program and everything around one solve
//!
//! - [`ModelBuilder`]: turns cadets and job categories into an [`AssignmentModel`]
//! - [`SolverOracle`]: the injected integer-programming solver
//! - [`solve()`]: runs the oracle once and validates its answer
//! - [`RunResult`]: rosters, placement detail and the rank histogram
//!
//! # Example
//!
//! ```
//! use afsc_core::{Cadet, JobCategory, Preferences, Qualification};
//! use afsc_model::{solve, GoodLpOracle, ModelBuilder, RunResult, SolveOutcome};
//!
//! let jobs = vec![JobCategory::new("A", 1), JobCategory::new("B", 1)];
//! let cadets: Vec<Cadet> = ["Cadet 1", "Cadet 2"]
//!     .into_iter()
//!     .zip([0.2, 0.8])
//!     .map(|(id, p)| {
//!         Cadet::new(id, p)
//!             .unwrap()
//!             .with_preferences(
//!                 Preferences::from_ordered([jobs[0].id().clone(), jobs[1].id().clone()]).unwrap(),
//!             )
//!             .with_qualifications(
//!                 jobs.iter().map(|j| (j.id().clone(), Qualification::Permitted)),
//!             )
//!     })
//!     .collect();
//!
//! let model = ModelBuilder::new(&cadets, &jobs).build().unwrap();
//! let SolveOutcome::Optimal(assignment) = solve(&GoodLpOracle, &model).unwrap() else {
//!     panic!("expected an optimal assignment");
//! };
//!
//! let result = RunResult::from_assignment(&assignment, &cadets, &jobs);
//! assert_eq!(result.assigned_count(), 2);
//! assert_eq!(result.histogram().total(), 2);
//! ```

pub mod builder;
pub mod model;
pub mod oracle;
pub mod result;
pub mod solve;

#[cfg(test)]
mod solve_tests;

pub use builder::ModelBuilder;
pub use model::{
    AssignmentModel, ConstraintFamily, DecisionVariable, LinearConstraint, LinearExpr, VariableId,
};
#[cfg(feature = "good_lp")]
pub use oracle::GoodLpOracle;
pub use oracle::{OracleError, OracleStatus, SolverOracle};
pub use result::{Placement, RankBucket, RankHistogram, Roster, RunResult};
pub use solve::{solve, Assignment, AssignmentDefect, SolveError, SolveOutcome, BINARY_TOLERANCE};
