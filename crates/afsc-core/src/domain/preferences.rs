//! Ranked preference lists.

use std::collections::HashSet;
use std::fmt;

use smallvec::SmallVec;

use super::JobId;
use crate::error::EntityError;

/// Maximum number of jobs a cadet may rank.
pub const MAX_PREFERENCES: usize = 6;

/// A preference rank in `1..=MAX_PREFERENCES`; 1 is the most preferred job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    /// The most preferred rank.
    pub const FIRST: Rank = Rank(1);

    /// Creates a rank, returning `None` outside `1..=MAX_PREFERENCES`.
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value as usize <= MAX_PREFERENCES {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the numeric rank.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns `1 / rank`, the non-linear weight favouring preferred placements.
    pub fn weight(self) -> f64 {
        1.0 / f64::from(self.0)
    }

    /// Iterates over every valid rank in ascending order.
    pub fn all() -> impl Iterator<Item = Rank> {
        (1..=MAX_PREFERENCES as u8).map(Rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered list of ranked jobs.
///
/// Position `i` holds the job ranked `i + 1`, so ranks are always unique and
/// contiguous from 1. A job absent from the list is unranked.
///
/// # Example
///
/// ```
/// use afsc_core::{JobId, Preferences, Rank};
///
/// let prefs = Preferences::from_ordered(["14N", "17D", "21R"].map(JobId::from)).unwrap();
/// assert_eq!(prefs.rank_of(&JobId::from("17D")), Rank::new(2));
/// assert_eq!(prefs.rank_of(&JobId::from("62E")), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<JobId>", into = "Vec<JobId>"))]
pub struct Preferences(SmallVec<[JobId; MAX_PREFERENCES]>);

impl Preferences {
    /// Creates an empty preference list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from jobs in preference order.
    ///
    /// # Errors
    ///
    /// Fails when more than [`MAX_PREFERENCES`] jobs are given or a job repeats.
    pub fn from_ordered<I>(jobs: I) -> Result<Self, EntityError>
    where
        I: IntoIterator<Item = JobId>,
    {
        let mut list: SmallVec<[JobId; MAX_PREFERENCES]> = SmallVec::new();
        for job in jobs {
            if list.contains(&job) {
                return Err(EntityError::DuplicatePreference(job));
            }
            list.push(job);
        }
        if list.len() > MAX_PREFERENCES {
            return Err(EntityError::TooManyPreferences {
                count: list.len(),
                max: MAX_PREFERENCES,
            });
        }
        Ok(Self(list))
    }

    /// Builds a list from an unordered `job -> rank` mapping.
    ///
    /// # Errors
    ///
    /// Fails on ranks outside `1..=MAX_PREFERENCES`, repeated ranks or jobs,
    /// and gaps in the rank sequence.
    pub fn from_ranks<I>(ranks: I) -> Result<Self, EntityError>
    where
        I: IntoIterator<Item = (JobId, u8)>,
    {
        let mut slots: [Option<JobId>; MAX_PREFERENCES] = Default::default();
        let mut seen_jobs = HashSet::new();
        let mut count = 0usize;

        for (job, rank) in ranks {
            let rank = Rank::new(rank).ok_or(EntityError::RankOutOfRange(rank))?;
            if !seen_jobs.insert(job.clone()) {
                return Err(EntityError::DuplicatePreference(job));
            }
            let slot = &mut slots[usize::from(rank.get()) - 1];
            if slot.is_some() {
                return Err(EntityError::DuplicateRank(rank.get()));
            }
            *slot = Some(job);
            count += 1;
        }

        let mut list = SmallVec::new();
        for (idx, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(job) if list.len() == idx => list.push(job),
                Some(_) => return Err(EntityError::RankGap(list.len() as u8 + 1)),
                None => {}
            }
        }
        debug_assert_eq!(list.len(), count);
        Ok(Self(list))
    }

    /// Returns the rank of `job`, or `None` when the job is unranked.
    pub fn rank_of(&self, job: &JobId) -> Option<Rank> {
        self.0
            .iter()
            .position(|ranked| ranked == job)
            .map(|idx| Rank(idx as u8 + 1))
    }

    /// Returns the job holding `rank`, if any.
    pub fn job_at(&self, rank: Rank) -> Option<&JobId> {
        self.0.get(usize::from(rank.get()) - 1)
    }

    /// Iterates `(rank, job)` pairs from most to least preferred.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, &JobId)> {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, job)| (Rank(idx as u8 + 1), job))
    }

    /// Returns the ranked jobs in preference order.
    pub fn jobs(&self) -> &[JobId] {
        &self.0
    }

    /// Number of ranked jobs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no job is ranked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<JobId>> for Preferences {
    type Error = EntityError;

    fn try_from(jobs: Vec<JobId>) -> Result<Self, Self::Error> {
        Self::from_ordered(jobs)
    }
}

impl From<Preferences> for Vec<JobId> {
    fn from(prefs: Preferences) -> Self {
        prefs.0.into_vec()
    }
}
