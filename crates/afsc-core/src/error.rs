//! Error types for entity construction and model validation

use thiserror::Error;

use crate::domain::{BoundFamily, CadetId, JobId};

/// Raised while constructing a single entity from caller data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityError {
    /// Percentile must be a finite value in `[0, 1]`.
    #[error("percentile {value} of cadet {cadet} is outside [0, 1]")]
    PercentileOutOfRange { cadet: CadetId, value: f64 },

    /// More ranked jobs than a preference list can hold.
    #[error("preference list has {count} entries, at most {max} are allowed")]
    TooManyPreferences { count: usize, max: usize },

    /// The same job was ranked twice.
    #[error("job {0} appears more than once in a preference list")]
    DuplicatePreference(JobId),

    /// Rank outside `1..=MAX_PREFERENCES`.
    #[error("preference rank {0} is outside the allowed range")]
    RankOutOfRange(u8),

    /// Two jobs share a rank.
    #[error("preference rank {0} is assigned more than once")]
    DuplicateRank(u8),

    /// Ranks must run 1, 2, 3, ... without holes.
    #[error("preference ranks must be contiguous from 1, rank {0} is missing")]
    RankGap(u8),
}

/// Raised by the model builder when its inputs cannot form a valid model.
///
/// The caller's data is malformed; the run is aborted and nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelConstructionError {
    /// An identifier was empty after trimming.
    #[error("identifiers must not be empty")]
    EmptyId,

    /// Two cadets share an identifier.
    #[error("duplicate cadet id {0}")]
    DuplicateCadet(CadetId),

    /// Two job categories share an identifier.
    #[error("duplicate job category id {0}")]
    DuplicateJob(JobId),

    /// `overclass_factor` must be finite and at least 1.
    #[error("job category {job} has overclass factor {factor}, expected a finite value >= 1")]
    OverclassFactor { job: JobId, factor: f64 },

    /// A bound fraction lies outside `[0, 1]` or is not finite.
    #[error("job category {job}: {family} bounds [{min}, {max}] must lie within [0, 1]")]
    BoundsOutOfRange {
        job: JobId,
        family: BoundFamily,
        min: f64,
        max: f64,
    },

    /// A bound pair has `min > max`.
    #[error("job category {job}: {family} bound min {min} exceeds max {max}")]
    InvertedBounds {
        job: JobId,
        family: BoundFamily,
        min: f64,
        max: f64,
    },

    /// A cadet carries a percentile outside `[0, 1]`.
    #[error("percentile {value} of cadet {cadet} is outside [0, 1]")]
    PercentileOutOfRange { cadet: CadetId, value: f64 },

    /// Cadets were supplied without any job category to place them in.
    #[error("{cadets} cadets supplied but no job categories")]
    NoJobCategories { cadets: usize },
}
