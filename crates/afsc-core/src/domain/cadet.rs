//! Cadet records.

use std::collections::BTreeMap;
use std::fmt;

use super::{CadetId, JobId, Preferences, Rank};
use crate::error::EntityError;

/// Formal eligibility class of a cadet for a job category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Qualification {
    /// The cadet holds a degree the job requires.
    Mandatory,
    /// The cadet holds a degree the job prefers.
    Desired,
    /// The cadet may be placed in the job.
    Permitted,
}

impl Qualification {
    /// All tiers, strongest first.
    pub const ALL: [Qualification; 3] = [
        Qualification::Mandatory,
        Qualification::Desired,
        Qualification::Permitted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Qualification::Mandatory => "Mandatory",
            Qualification::Desired => "Desired",
            Qualification::Permitted => "Permitted",
        }
    }
}

impl fmt::Display for Qualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An individual to be assigned.
///
/// Built once with the `with_*` methods and read-only afterwards; the
/// optimization pipeline never mutates a cadet.
///
/// # Example
///
/// ```
/// use afsc_core::{Cadet, JobId, Preferences, Qualification, Rank};
///
/// let pilot = JobId::from("11X");
/// let cadet = Cadet::new("Cadet 1", 0.87)
///     .unwrap()
///     .with_origin_group_a(true)
///     .with_preferences(Preferences::from_ordered([pilot.clone()]).unwrap())
///     .with_qualification(pilot.clone(), Qualification::Desired);
///
/// assert_eq!(cadet.rank_for(&pilot), Some(Rank::FIRST));
/// assert_eq!(cadet.qualification_for(&pilot), Some(Qualification::Desired));
/// assert_eq!(cadet.qualification_for(&JobId::from("62E")), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cadet {
    id: CadetId,
    #[cfg_attr(feature = "serde", serde(default))]
    preferences: Preferences,
    #[cfg_attr(feature = "serde", serde(default))]
    qualifications: BTreeMap<JobId, Qualification>,
    percentile: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    origin_group_a: bool,
}

impl Cadet {
    /// Creates a cadet with no preferences or qualifications.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::PercentileOutOfRange`] unless `percentile` is a
    /// finite value in `[0, 1]`.
    pub fn new(id: impl Into<CadetId>, percentile: f64) -> Result<Self, EntityError> {
        let id = id.into();
        if !percentile.is_finite() || !(0.0..=1.0).contains(&percentile) {
            return Err(EntityError::PercentileOutOfRange {
                cadet: id,
                value: percentile,
            });
        }
        Ok(Self {
            id,
            preferences: Preferences::new(),
            qualifications: BTreeMap::new(),
            percentile,
            origin_group_a: false,
        })
    }

    pub fn with_origin_group_a(mut self, origin_group_a: bool) -> Self {
        self.origin_group_a = origin_group_a;
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Attests the cadet's qualification tier for `job`, replacing any previous tier.
    pub fn with_qualification(mut self, job: JobId, qualification: Qualification) -> Self {
        self.qualifications.insert(job, qualification);
        self
    }

    pub fn with_qualifications<I>(mut self, qualifications: I) -> Self
    where
        I: IntoIterator<Item = (JobId, Qualification)>,
    {
        self.qualifications.extend(qualifications);
        self
    }

    pub fn id(&self) -> &CadetId {
        &self.id
    }

    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    pub fn is_origin_group_a(&self) -> bool {
        self.origin_group_a
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Returns the rank given to `job`, or `None` when unranked.
    pub fn rank_for(&self, job: &JobId) -> Option<Rank> {
        self.preferences.rank_of(job)
    }

    /// Returns the attested tier for `job`, or `None` when not attested.
    pub fn qualification_for(&self, job: &JobId) -> Option<Qualification> {
        self.qualifications.get(job).copied()
    }

    /// Iterates attested `(job, tier)` pairs in job id order.
    pub fn qualifications(&self) -> impl Iterator<Item = (&JobId, Qualification)> {
        self.qualifications.iter().map(|(job, q)| (job, *q))
    }

    /// Jobs the cadet ranked without an attested qualification.
    ///
    /// The default utility table scores these pairs with the deviation penalty.
    pub fn ranked_without_qualification(&self) -> impl Iterator<Item = &JobId> {
        self.preferences
            .jobs()
            .iter()
            .filter(|job| !self.qualifications.contains_key(*job))
    }
}
