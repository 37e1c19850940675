//! AFSC Core - entity types and utility scoring for cadet assignment
//!
//! This crate provides the leaf abstractions every other crate builds on:
//! - Identifier newtypes for cadets and job categories (AFSCs)
//! - Immutable `Cadet` and `JobCategory` records with validated preferences
//! - The utility scorer, expressed as an ordered rule table
//! - Error types for entity construction and model validation

pub mod domain;
pub mod error;
pub mod utility;


pub use domain::{
    BoundFamily, Cadet, CadetId, FractionBounds, JobCategory, JobId, Preferences, Qualification,
    Rank, MAX_PREFERENCES,
};
pub use error::{EntityError, ModelConstructionError};
pub use utility::{
    QualificationMatch, RankMatch, UtilityFormula, UtilityRule, UtilityScorer, DEFAULT_RULES,
    DEFAULT_DEVIATION_PENALTY,
};
