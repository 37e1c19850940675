//! The seam between the model and an integer-programming solver.
//!
//! A [`SolverOracle`] receives a fully built [`AssignmentModel`] and answers
//! with either optimal variable values or a proof of infeasibility. The
//! oracle is passed explicitly to [`solve`](crate::solve()); nothing here
//! holds a global solver handle.

#[cfg(feature = "good_lp")]
mod lp;

#[cfg(feature = "good_lp")]
pub use self::lp::GoodLpOracle;

use std::sync::Arc;

use thiserror::Error;

use crate::model::AssignmentModel;

/// Terminal status reported by an oracle.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleStatus {
    /// Optimal values, indexed by [`VariableId`](crate::VariableId).
    Optimal(Vec<f64>),
    /// No assignment satisfies every constraint.
    Infeasible,
}

/// Failure inside the oracle itself.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{oracle} oracle failed: {message}")]
pub struct OracleError {
    pub oracle: &'static str,
    pub message: String,
}

impl OracleError {
    pub fn new(oracle: &'static str, message: impl Into<String>) -> Self {
        Self {
            oracle,
            message: message.into(),
        }
    }
}

/// A binary integer program solver.
///
/// Implementations must be shareable across the worker threads of a batch.
///
/// # Example
///
/// ```
/// use afsc_model::{AssignmentModel, OracleError, OracleStatus, SolverOracle};
///
/// /// Reports every model as infeasible.
/// struct Refuse;
///
/// impl SolverOracle for Refuse {
///     fn name(&self) -> &'static str {
///         "refuse"
///     }
///
///     fn solve(&self, _model: &AssignmentModel) -> Result<OracleStatus, OracleError> {
///         Ok(OracleStatus::Infeasible)
///     }
/// }
/// ```
pub trait SolverOracle: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Maximizes the model's objective over binary variables.
    fn solve(&self, model: &AssignmentModel) -> Result<OracleStatus, OracleError>;
}

impl<O: SolverOracle + ?Sized> SolverOracle for &O {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&self, model: &AssignmentModel) -> Result<OracleStatus, OracleError> {
        (**self).solve(model)
    }
}

impl<O: SolverOracle + ?Sized> SolverOracle for Arc<O> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&self, model: &AssignmentModel) -> Result<OracleStatus, OracleError> {
        (**self).solve(model)
    }
}

impl<O: SolverOracle + ?Sized> SolverOracle for Box<O> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&self, model: &AssignmentModel) -> Result<OracleStatus, OracleError> {
        (**self).solve(model)
    }
}
