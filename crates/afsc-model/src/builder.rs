//! Builds an [`AssignmentModel`] from cadets and job categories.

use std::collections::HashSet;

use afsc_core::{
    BoundFamily, Cadet, JobCategory, ModelConstructionError, Qualification, UtilityScorer,
};
use tracing::{debug, warn};

use crate::model::{AssignmentModel, ConstraintFamily, LinearConstraint, LinearExpr};

const DEFAULT_MODEL_NAME: &str = "AFSC_Assignment";

/// Builder for the binary assignment program of one run.
///
/// Emits one variable per (cadet, job) pair, an objective whose coefficients
/// come from the [`UtilityScorer`], and five constraint families:
///
/// - `One_AFSC_<cadet>`: every cadet is placed exactly once
/// - `Target_Min/Max_<job>`: `target <= headcount <= target * overclass_factor`
/// - `Mandatory_Min/Max_<job>`: mandatory-qualified count within `target * bounds`
/// - `OriginGroupA_Min/Max_<job>`: origin group A count within `target * bounds`
/// - `Merit_Min/Max_<job>`: percentile sum within `target * bounds`
///
/// # Example
///
/// ```
/// use afsc_core::{Cadet, JobCategory};
/// use afsc_model::ModelBuilder;
///
/// let jobs = vec![JobCategory::new("A", 1), JobCategory::new("B", 1)];
/// let cadets = vec![
///     Cadet::new("Cadet 1", 0.4).unwrap(),
///     Cadet::new("Cadet 2", 0.9).unwrap(),
/// ];
///
/// let model = ModelBuilder::new(&cadets, &jobs)
///     .with_deviation_penalty(-1000.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(model.variables().len(), 4);
/// assert!(model.constraint("One_AFSC_Cadet 1").is_some());
/// assert!(model.constraint("Target_Max_B").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder<'a> {
    cadets: &'a [Cadet],
    jobs: &'a [JobCategory],
    scorer: UtilityScorer,
    name: String,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(cadets: &'a [Cadet], jobs: &'a [JobCategory]) -> Self {
        Self {
            cadets,
            jobs,
            scorer: UtilityScorer::default(),
            name: DEFAULT_MODEL_NAME.to_string(),
        }
    }

    /// Sets the utility of a pair the cadet holds no qualification for.
    pub fn with_deviation_penalty(mut self, penalty: f64) -> Self {
        self.scorer = self.scorer.with_deviation_penalty(penalty);
        self
    }

    /// Replaces the scorer, including its rule table.
    pub fn with_scorer(mut self, scorer: UtilityScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Validates the inputs and emits the model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelConstructionError`] for invalid job parameters, duplicate
    /// or empty ids, out-of-range percentiles, or cadets with no job to go to.
    pub fn build(self) -> Result<AssignmentModel, ModelConstructionError> {
        self.validate()?;

        let num_jobs = self.jobs.len();
        let mut model = AssignmentModel::new(
            self.name.clone(),
            self.cadets.iter().map(|c| c.id().clone()).collect(),
            self.jobs.iter().map(|j| j.id().clone()).collect(),
        );

        for (c, cadet) in self.cadets.iter().enumerate() {
            for (j, job) in self.jobs.iter().enumerate() {
                let var = model.add_variable(c, j);
                let utility = self.scorer.score(cadet, job);
                if utility != 0.0 {
                    model.objective.add_term(var, utility);
                }
            }
        }

        for (c, cadet) in self.cadets.iter().enumerate() {
            let mut expr = LinearExpr::with_capacity(num_jobs);
            for j in 0..num_jobs {
                expr.add_term(model.variable(c, j), 1.0);
            }
            model.constraints.push(LinearConstraint {
                name: format!("{}_{}", ConstraintFamily::ExactlyOne.prefix(), cadet.id()),
                family: ConstraintFamily::ExactlyOne,
                expr,
                lower: 1.0,
                upper: 1.0,
            });
        }

        for (j, job) in self.jobs.iter().enumerate() {
            let headcount = self.job_expr(&model, j, |_| 1.0);
            push_band(
                &mut model,
                ConstraintFamily::Headcount,
                job,
                headcount,
                f64::from(job.target()),
                job.max_headcount(),
            );

            let (min, max) = job
                .bounds(BoundFamily::MandatoryQualification)
                .scaled(job.target());
            let mandatory = self.job_expr(&model, j, |cadet| {
                match cadet.qualification_for(job.id()) {
                    Some(Qualification::Mandatory) => 1.0,
                    _ => 0.0,
                }
            });
            push_band(
                &mut model,
                ConstraintFamily::MandatoryQualification,
                job,
                mandatory,
                min,
                max,
            );

            let (min, max) = job.bounds(BoundFamily::OriginGroupA).scaled(job.target());
            let origin = self.job_expr(&model, j, |cadet| {
                if cadet.is_origin_group_a() {
                    1.0
                } else {
                    0.0
                }
            });
            push_band(
                &mut model,
                ConstraintFamily::OriginGroupA,
                job,
                origin,
                min,
                max,
            );

            let (min, max) = job.bounds(BoundFamily::Merit).scaled(job.target());
            let merit = self.job_expr(&model, j, Cadet::percentile);
            push_band(&mut model, ConstraintFamily::Merit, job, merit, min, max);
        }

        let unqualified = self.ranked_without_qualification();
        if unqualified > 0 {
            warn!(
                event = "ranked_without_qualification",
                pairs = unqualified,
                deviation_penalty = self.scorer.deviation_penalty(),
            );
        }

        debug!(
            event = "model_built",
            model = %model.name(),
            cadets = model.num_cadets(),
            jobs = model.num_jobs(),
            variables = model.variables().len(),
            constraints = model.constraints().len(),
        );

        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelConstructionError> {
        let mut job_ids = HashSet::with_capacity(self.jobs.len());
        for job in self.jobs {
            job.validate()?;
            if !job_ids.insert(job.id()) {
                return Err(ModelConstructionError::DuplicateJob(job.id().clone()));
            }
        }

        let mut cadet_ids = HashSet::with_capacity(self.cadets.len());
        for cadet in self.cadets {
            if cadet.id().is_empty() {
                return Err(ModelConstructionError::EmptyId);
            }
            if !cadet_ids.insert(cadet.id()) {
                return Err(ModelConstructionError::DuplicateCadet(cadet.id().clone()));
            }
            let p = cadet.percentile();
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(ModelConstructionError::PercentileOutOfRange {
                    cadet: cadet.id().clone(),
                    value: p,
                });
            }
        }

        if self.jobs.is_empty() && !self.cadets.is_empty() {
            return Err(ModelConstructionError::NoJobCategories {
                cadets: self.cadets.len(),
            });
        }
        Ok(())
    }

    /// Sums `coefficient(cadet) * x[cadet, job]` over all cadets, skipping zeros.
    fn job_expr<F>(&self, model: &AssignmentModel, job: usize, coefficient: F) -> LinearExpr
    where
        F: Fn(&Cadet) -> f64,
    {
        let mut expr = LinearExpr::with_capacity(self.cadets.len());
        for (c, cadet) in self.cadets.iter().enumerate() {
            let coeff = coefficient(cadet);
            if coeff != 0.0 {
                expr.add_term(model.variable(c, job), coeff);
            }
        }
        expr
    }

    /// Counts (cadet, job) pairs the cadet ranked but holds no tier for.
    fn ranked_without_qualification(&self) -> usize {
        let known: HashSet<_> = self.jobs.iter().map(JobCategory::id).collect();
        self.cadets
            .iter()
            .flat_map(|cadet| cadet.ranked_without_qualification())
            .filter(|job| known.contains(job))
            .count()
    }
}

/// Adds `<Family>_Min_<job>` and `<Family>_Max_<job>`.
fn push_band(
    model: &mut AssignmentModel,
    family: ConstraintFamily,
    job: &JobCategory,
    expr: LinearExpr,
    min: f64,
    max: f64,
) {
    let prefix = family.prefix();
    model.constraints.push(LinearConstraint {
        name: format!("{prefix}_Min_{}", job.id()),
        family,
        expr: expr.clone(),
        lower: min,
        upper: f64::INFINITY,
    });
    model.constraints.push(LinearConstraint {
        name: format!("{prefix}_Max_{}", job.id()),
        family,
        expr,
        lower: f64::NEG_INFINITY,
        upper: max,
    });
}
