//! Solver-independent description of the assignment program.
//!
//! An [`AssignmentModel`] holds one binary variable per (cadet, job) pair, a
//! linear objective to maximize, and named linear constraints with lower and
//! upper bounds (either may be infinite). Oracles translate this description
//! into whatever their backend expects.

use std::fmt;

use afsc_core::{CadetId, JobId};

/// Index of a decision variable within its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(usize);

impl VariableId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Binary decision `x[cadet, job]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionVariable {
    name: String,
    cadet: usize,
    job: usize,
}

impl DecisionVariable {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the cadet in the builder's input slice.
    pub fn cadet(&self) -> usize {
        self.cadet
    }

    /// Index of the job category in the builder's input slice.
    pub fn job(&self) -> usize {
        self.job
    }
}

/// Sparse linear expression `Σ coefficient · x`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VariableId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
        }
    }

    /// Appends `coefficient · variable`.
    pub fn add_term(&mut self, variable: VariableId, coefficient: f64) {
        self.terms.push((variable, coefficient));
    }

    pub fn terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the coefficient of `variable`, 0 when absent.
    pub fn coefficient(&self, variable: VariableId) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| *v == variable)
            .map(|(_, c)| c)
            .sum()
    }

    /// Dense coefficients indexed by [`VariableId`], `len` entries long.
    ///
    /// Repeated terms are summed; terms at or past `len` are ignored.
    pub fn dense_coefficients(&self, len: usize) -> Vec<f64> {
        let mut dense = vec![0.0; len];
        for &(v, c) in &self.terms {
            if let Some(slot) = dense.get_mut(v.0) {
                *slot += c;
            }
        }
        dense
    }

    /// Evaluates the expression for values indexed by [`VariableId`].
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Constraint family, one per modelling concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    /// Each cadet is placed exactly once.
    ExactlyOne,
    /// `target <= headcount <= target * overclass_factor`.
    Headcount,
    /// Count of mandatory-qualified cadets within the job's band.
    MandatoryQualification,
    /// Count of origin group A cadets within the job's band.
    OriginGroupA,
    /// Sum of assigned percentiles within the job's band.
    Merit,
}

impl ConstraintFamily {
    pub fn prefix(self) -> &'static str {
        match self {
            ConstraintFamily::ExactlyOne => "One_AFSC",
            ConstraintFamily::Headcount => "Target",
            ConstraintFamily::MandatoryQualification => "Mandatory",
            ConstraintFamily::OriginGroupA => "OriginGroupA",
            ConstraintFamily::Merit => "Merit",
        }
    }
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Named linear constraint `lower <= expr <= upper`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub family: ConstraintFamily,
    pub expr: LinearExpr,
    /// `f64::NEG_INFINITY` when unbounded below.
    pub lower: f64,
    /// `f64::INFINITY` when unbounded above.
    pub upper: f64,
}

impl LinearConstraint {
    /// Returns true when `lower == upper`.
    pub fn is_equality(&self) -> bool {
        self.lower == self.upper
    }

    /// Returns true when `value` lies within the bounds, allowing `tolerance`.
    pub fn admits(&self, value: f64, tolerance: f64) -> bool {
        value >= self.lower - tolerance && value <= self.upper + tolerance
    }

    /// Checks the constraint against values indexed by [`VariableId`].
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        self.admits(self.expr.evaluate(values), tolerance)
    }
}

/// The complete binary program for one run.
///
/// The objective is always maximized and every variable is binary.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentModel {
    pub(crate) name: String,
    pub(crate) cadet_ids: Vec<CadetId>,
    pub(crate) job_ids: Vec<JobId>,
    pub(crate) variables: Vec<DecisionVariable>,
    pub(crate) objective: LinearExpr,
    pub(crate) constraints: Vec<LinearConstraint>,
}

impl AssignmentModel {
    pub(crate) fn new(name: String, cadet_ids: Vec<CadetId>, job_ids: Vec<JobId>) -> Self {
        let variable_count = cadet_ids.len() * job_ids.len();
        Self {
            name,
            cadet_ids,
            job_ids,
            variables: Vec::with_capacity(variable_count),
            objective: LinearExpr::with_capacity(variable_count),
            constraints: Vec::new(),
        }
    }

    pub(crate) fn add_variable(&mut self, cadet: usize, job: usize) -> VariableId {
        let id = VariableId(self.variables.len());
        debug_assert_eq!(id, self.variable(cadet, job));
        let name = format!("{}_{}", self.cadet_ids[cadet], self.job_ids[job]);
        self.variables.push(DecisionVariable { name, cadet, job });
        id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cadet_ids(&self) -> &[CadetId] {
        &self.cadet_ids
    }

    pub fn job_ids(&self) -> &[JobId] {
        &self.job_ids
    }

    pub fn num_cadets(&self) -> usize {
        self.cadet_ids.len()
    }

    pub fn num_jobs(&self) -> usize {
        self.job_ids.len()
    }

    /// Returns the variable for a (cadet index, job index) pair.
    pub fn variable(&self, cadet: usize, job: usize) -> VariableId {
        VariableId(cadet * self.job_ids.len() + job)
    }

    pub fn variables(&self) -> &[DecisionVariable] {
        &self.variables
    }

    /// The maximization objective.
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Iterates the constraints of one family.
    pub fn constraints_of(
        &self,
        family: ConstraintFamily,
    ) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints.iter().filter(move |c| c.family == family)
    }

    /// Looks up a constraint by name.
    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }
}
