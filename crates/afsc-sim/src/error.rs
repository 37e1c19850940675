//! Error types for synthesis and batch execution.

use afsc_core::{EntityError, JobId, ModelConstructionError};
use thiserror::Error;

/// Raised when a population cannot be synthesized from the job parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthesisError {
    /// Popularity weights must be finite and non-negative.
    #[error("job category {job} has popularity weight {weight}, expected a finite value >= 0")]
    InvalidWeight { job: JobId, weight: f64 },

    /// Fewer positively weighted jobs than preferences to draw.
    #[error("{positive} job categories have positive popularity weight, {required} are needed to fill a preference list")]
    InsufficientDemand { positive: usize, required: usize },

    /// The origin group A probability lies outside `[0, 1]`.
    #[error("origin group A probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    /// Percentile rounding asks for more decimals than an `f64` can hold.
    #[error("percentile decimals {0} exceed the maximum of 15")]
    InvalidDecimals(u32),

    /// A job category failed validation before any cadet was drawn.
    #[error("invalid job category: {0}")]
    Job(#[from] ModelConstructionError),

    /// The population band is too large to synthesize.
    #[error("population upper bound {max} exceeds the limit of {limit} cadets")]
    PopulationTooLarge { max: f64, limit: usize },

    /// A synthesized cadet failed entity validation.
    #[error(transparent)]
    Entity(#[from] EntityError),
}

/// Batch-level failure. Per-run problems never surface here.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
