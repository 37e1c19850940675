//! Per-run result aggregation: rosters, placement detail and rank histogram.

use std::fmt;

use afsc_core::{Cadet, CadetId, JobCategory, JobId, Qualification, Rank, MAX_PREFERENCES};

use crate::solve::Assignment;

const BUCKETS: usize = MAX_PREFERENCES + 1;

/// Where a placement fell in the cadet's preference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RankBucket {
    Ranked(Rank),
    Unranked,
}

impl RankBucket {
    /// All buckets: ranks 1 through 6, then unranked.
    pub fn all() -> impl Iterator<Item = RankBucket> {
        Rank::all()
            .map(RankBucket::Ranked)
            .chain(std::iter::once(RankBucket::Unranked))
    }

    fn index(self) -> usize {
        match self {
            RankBucket::Ranked(rank) => usize::from(rank.get()) - 1,
            RankBucket::Unranked => MAX_PREFERENCES,
        }
    }
}

impl From<Option<Rank>> for RankBucket {
    fn from(rank: Option<Rank>) -> Self {
        rank.map_or(RankBucket::Unranked, RankBucket::Ranked)
    }
}

impl fmt::Display for RankBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankBucket::Ranked(rank) => write!(f, "{rank}"),
            RankBucket::Unranked => f.write_str("unranked"),
        }
    }
}

/// Count of placements per [`RankBucket`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankHistogram {
    counts: [usize; BUCKETS],
}

impl RankHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, bucket: RankBucket) {
        self.counts[bucket.index()] += 1;
    }

    pub fn count(&self, bucket: RankBucket) -> usize {
        self.counts[bucket.index()]
    }

    /// Sum over all buckets, equal to the number of placements recorded.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Share of placements in `bucket`, 0 for an empty histogram.
    pub fn fraction(&self, bucket: RankBucket) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.count(bucket) as f64 / total as f64
        }
    }

    /// Iterates `(bucket, count)` in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (RankBucket, usize)> + '_ {
        RankBucket::all().map(move |bucket| (bucket, self.count(bucket)))
    }

    /// Adds another histogram's counts into this one.
    pub fn merge(&mut self, other: &RankHistogram) {
        for (count, extra) in self.counts.iter_mut().zip(other.counts) {
            *count += extra;
        }
    }
}

/// One cadet's placement with the detail needed for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub cadet: CadetId,
    pub job: JobId,
    pub percentile: f64,
    pub qualification: Option<Qualification>,
    pub rank: Option<Rank>,
    pub utility: f64,
}

impl Placement {
    pub fn bucket(&self) -> RankBucket {
        RankBucket::from(self.rank)
    }
}

/// Cadets placed in one job, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    pub job: JobId,
    pub cadets: Vec<CadetId>,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.cadets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cadets.is_empty()
    }
}

/// Aggregated view of one optimal run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    rosters: Vec<Roster>,
    placements: Vec<Placement>,
    histogram: RankHistogram,
    total_utility: f64,
}

impl RunResult {
    /// Aggregates an assignment over the same `cadets` and `jobs` the model
    /// was built from.
    ///
    /// Rosters follow job order and list cadets in input order.
    ///
    /// # Panics
    ///
    /// In debug builds, when `cadets` does not have one entry per assigned
    /// cadet or an assigned job index is outside `jobs`. Release builds skip
    /// such placements.
    pub fn from_assignment(assignment: &Assignment, cadets: &[Cadet], jobs: &[JobCategory]) -> Self {
        debug_assert_eq!(
            assignment.num_cadets(),
            cadets.len(),
            "assignment and cadet slice differ in length"
        );
        debug_assert!(
            assignment.job_by_cadet().iter().all(|&j| j < jobs.len()),
            "assignment refers to a job outside the job slice"
        );
        let mut rosters: Vec<Roster> = jobs
            .iter()
            .map(|job| Roster {
                job: job.id().clone(),
                cadets: Vec::new(),
            })
            .collect();
        let mut placements = Vec::with_capacity(cadets.len());
        let mut histogram = RankHistogram::new();

        let placed = cadets
            .iter()
            .zip(assignment.job_by_cadet())
            .zip(assignment.utility_by_cadet());
        for ((cadet, &j), &utility) in placed {
            let (Some(job), Some(roster)) = (jobs.get(j), rosters.get_mut(j)) else {
                continue;
            };
            roster.cadets.push(cadet.id().clone());

            let placement = Placement {
                cadet: cadet.id().clone(),
                job: job.id().clone(),
                percentile: cadet.percentile(),
                qualification: cadet.qualification_for(job.id()),
                rank: cadet.rank_for(job.id()),
                utility,
            };
            histogram.record(placement.bucket());
            placements.push(placement);
        }

        let total_utility = placements.iter().map(|p| p.utility).sum();
        Self {
            rosters,
            placements,
            histogram,
            total_utility,
        }
    }

    pub fn rosters(&self) -> &[Roster] {
        &self.rosters
    }

    pub fn roster(&self, job: &JobId) -> Option<&Roster> {
        self.rosters.iter().find(|r| &r.job == job)
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn histogram(&self) -> &RankHistogram {
        &self.histogram
    }

    /// Objective value of the run.
    pub fn total_utility(&self) -> f64 {
        self.total_utility
    }

    /// Mean utility per placement, 0 when nobody was placed.
    pub fn mean_utility(&self) -> f64 {
        if self.placements.is_empty() {
            0.0
        } else {
            self.total_utility / self.placements.len() as f64
        }
    }

    pub fn assigned_count(&self) -> usize {
        self.placements.len()
    }
}
