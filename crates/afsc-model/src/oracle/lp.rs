//! [`SolverOracle`] backed by `good_lp` and its pure-Rust `microlp` solver.

use good_lp::{
    default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use tracing::trace;

use super::{OracleError, OracleStatus, SolverOracle};
use crate::model::{AssignmentModel, LinearExpr};

const NAME: &str = "good_lp";

/// Slack allowed when checking a constant constraint against its bounds.
const CONSTANT_TOLERANCE: f64 = 1e-9;

/// Translates an [`AssignmentModel`] into a `good_lp` problem and solves it.
///
/// Constraints whose expression has no terms are checked directly against
/// their bounds, and a violated one short-circuits to
/// [`OracleStatus::Infeasible`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpOracle;

impl GoodLpOracle {
    pub fn new() -> Self {
        Self
    }
}

impl SolverOracle for GoodLpOracle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn solve(&self, model: &AssignmentModel) -> Result<OracleStatus, OracleError> {
        if let Some(violated) = model
            .constraints()
            .iter()
            .find(|c| c.expr.is_empty() && !c.admits(0.0, CONSTANT_TOLERANCE))
        {
            trace!(
                event = "constant_constraint_violated",
                constraint = %violated.name,
                lower = violated.lower,
                upper = violated.upper,
            );
            return Ok(OracleStatus::Infeasible);
        }

        if model.variables().is_empty() {
            return Ok(OracleStatus::Optimal(Vec::new()));
        }

        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = model
            .variables()
            .iter()
            .map(|v| vars.add(variable().binary().name(v.name())))
            .collect();

        let objective = to_expression(model.objective(), &xs);
        let mut problem = vars.maximise(objective).using(default_solver);

        let mut rows = 0usize;
        for constraint in model.constraints() {
            if constraint.expr.is_empty() {
                continue;
            }
            let expr = to_expression(&constraint.expr, &xs);
            if constraint.is_equality() {
                problem = problem.with(expr.eq(constraint.lower));
                rows += 1;
                continue;
            }
            if constraint.lower.is_finite() {
                problem = problem.with(expr.clone().geq(constraint.lower));
                rows += 1;
            }
            if constraint.upper.is_finite() {
                problem = problem.with(expr.leq(constraint.upper));
                rows += 1;
            }
        }

        trace!(
            event = "model_translated",
            model = %model.name(),
            variables = xs.len(),
            rows = rows,
        );

        match problem.solve() {
            Ok(solution) => Ok(OracleStatus::Optimal(
                xs.iter().map(|&x| solution.value(x)).collect(),
            )),
            Err(ResolutionError::Infeasible) => Ok(OracleStatus::Infeasible),
            Err(e) => Err(OracleError::new(NAME, e.to_string())),
        }
    }
}

fn to_expression(expr: &LinearExpr, xs: &[Variable]) -> Expression {
    let mut out = Expression::with_capacity(expr.terms().len());
    for &(var, coefficient) in expr.terms() {
        out.add_mul(coefficient, xs[var.index()]);
    }
    out
}
