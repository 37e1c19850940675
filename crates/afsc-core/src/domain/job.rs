//! Job categories (AFSCs) and their fairness bounds.

use std::fmt;

use super::JobId;
use crate::error::ModelConstructionError;

/// The three fraction-of-target bands a job category carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundFamily {
    /// Share of cadets holding a mandatory qualification.
    MandatoryQualification,
    /// Share of cadets from origin group A.
    OriginGroupA,
    /// Sum of assigned percentiles relative to target.
    Merit,
}

impl BoundFamily {
    pub const ALL: [BoundFamily; 3] = [
        BoundFamily::MandatoryQualification,
        BoundFamily::OriginGroupA,
        BoundFamily::Merit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BoundFamily::MandatoryQualification => "Mandatory",
            BoundFamily::OriginGroupA => "OriginGroupA",
            BoundFamily::Merit => "Merit",
        }
    }
}

impl fmt::Display for BoundFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `{min, max}` pair of fractions of a job's target.
///
/// # Example
///
/// ```
/// use afsc_core::FractionBounds;
///
/// let bounds = FractionBounds::new(0.25, 0.75);
/// assert_eq!(bounds.scaled(8), (2.0, 6.0));
/// assert_eq!(FractionBounds::OPEN.scaled(8), (0.0, 8.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FractionBounds {
    pub min: f64,
    pub max: f64,
}

impl FractionBounds {
    /// Bounds that never bind: `[0, 1]`.
    pub const OPEN: FractionBounds = FractionBounds { min: 0.0, max: 1.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `(target * min, target * max)`.
    pub fn scaled(&self, target: u32) -> (f64, f64) {
        let target = f64::from(target);
        (target * self.min, target * self.max)
    }

    fn validate(&self, job: &JobId, family: BoundFamily) -> Result<(), ModelConstructionError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.min) || !in_unit(self.max) {
            return Err(ModelConstructionError::BoundsOutOfRange {
                job: job.clone(),
                family,
                min: self.min,
                max: self.max,
            });
        }
        if self.min > self.max {
            return Err(ModelConstructionError::InvertedBounds {
                job: job.clone(),
                family,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl Default for FractionBounds {
    fn default() -> Self {
        Self::OPEN
    }
}

fn default_overclass_factor() -> f64 {
    1.0
}

/// A job category with a target headcount and fairness bounds.
///
/// # Example
///
/// ```
/// use afsc_core::{FractionBounds, JobCategory};
///
/// let job = JobCategory::new("14N", 10)
///     .with_overclass_factor(1.2)
///     .with_merit_bounds(FractionBounds::new(0.3, 0.7))
///     .with_popularity_weight(2.5);
///
/// assert_eq!(job.target(), 10);
/// assert!((job.max_headcount() - 12.0).abs() < 1e-9);
/// assert!(job.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobCategory {
    id: JobId,
    target: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_overclass_factor"))]
    overclass_factor: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    mandatory_qualification_bounds: FractionBounds,
    #[cfg_attr(feature = "serde", serde(default))]
    origin_group_a_bounds: FractionBounds,
    #[cfg_attr(feature = "serde", serde(default))]
    merit_bounds: FractionBounds,
    #[cfg_attr(feature = "serde", serde(default))]
    popularity_weight: f64,
}

impl JobCategory {
    /// Creates a job category with no overclassification, open bounds and zero
    /// popularity weight.
    pub fn new(id: impl Into<JobId>, target: u32) -> Self {
        Self {
            id: id.into(),
            target,
            overclass_factor: default_overclass_factor(),
            mandatory_qualification_bounds: FractionBounds::OPEN,
            origin_group_a_bounds: FractionBounds::OPEN,
            merit_bounds: FractionBounds::OPEN,
            popularity_weight: 0.0,
        }
    }

    pub fn with_overclass_factor(mut self, factor: f64) -> Self {
        self.overclass_factor = factor;
        self
    }

    pub fn with_mandatory_qualification_bounds(mut self, bounds: FractionBounds) -> Self {
        self.mandatory_qualification_bounds = bounds;
        self
    }

    pub fn with_origin_group_a_bounds(mut self, bounds: FractionBounds) -> Self {
        self.origin_group_a_bounds = bounds;
        self
    }

    pub fn with_merit_bounds(mut self, bounds: FractionBounds) -> Self {
        self.merit_bounds = bounds;
        self
    }

    pub fn with_popularity_weight(mut self, weight: f64) -> Self {
        self.popularity_weight = weight;
        self
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn overclass_factor(&self) -> f64 {
        self.overclass_factor
    }

    /// Upper headcount bound, `target * overclass_factor`.
    pub fn max_headcount(&self) -> f64 {
        f64::from(self.target) * self.overclass_factor
    }

    pub fn popularity_weight(&self) -> f64 {
        self.popularity_weight
    }

    /// Returns the bounds for one fraction band.
    pub fn bounds(&self, family: BoundFamily) -> FractionBounds {
        match family {
            BoundFamily::MandatoryQualification => self.mandatory_qualification_bounds,
            BoundFamily::OriginGroupA => self.origin_group_a_bounds,
            BoundFamily::Merit => self.merit_bounds,
        }
    }

    /// Checks the category's parameters.
    ///
    /// # Errors
    ///
    /// Rejects empty ids, overclass factors below 1 (or non-finite), and bound
    /// pairs outside `[0, 1]` or with `min > max`.
    pub fn validate(&self) -> Result<(), ModelConstructionError> {
        if self.id.is_empty() {
            return Err(ModelConstructionError::EmptyId);
        }
        if !self.overclass_factor.is_finite() || self.overclass_factor < 1.0 {
            return Err(ModelConstructionError::OverclassFactor {
                job: self.id.clone(),
                factor: self.overclass_factor,
            });
        }
        for family in BoundFamily::ALL {
            self.bounds(family).validate(&self.id, family)?;
        }
        Ok(())
    }
}
