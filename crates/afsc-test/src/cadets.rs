//! Cadet builders and canned populations.

use afsc_core::{Cadet, JobCategory, JobId, Preferences, Qualification};

/// Builder producing valid cadets with less ceremony than [`Cadet::new`].
///
/// # Example
///
/// ```
/// use afsc_core::{Qualification, Rank};
/// use afsc_test::CadetBuilder;
///
/// let cadet = CadetBuilder::new("Cadet 1")
///     .percentile(0.75)
///     .prefers(&["A", "B"])
///     .qualified("A", Qualification::Mandatory)
///     .origin_group_a()
///     .build();
///
/// assert_eq!(cadet.rank_for(&"B".into()), Rank::new(2));
/// assert!(cadet.is_origin_group_a());
/// ```
#[derive(Debug, Clone)]
pub struct CadetBuilder {
    id: String,
    percentile: f64,
    preferences: Vec<JobId>,
    qualifications: Vec<(JobId, Qualification)>,
    origin_group_a: bool,
}

impl CadetBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            percentile: 0.5,
            preferences: Vec::new(),
            qualifications: Vec::new(),
            origin_group_a: false,
        }
    }

    pub fn percentile(mut self, percentile: f64) -> Self {
        self.percentile = percentile;
        self
    }

    /// Ranks `jobs` in the given order.
    pub fn prefers(mut self, jobs: &[&str]) -> Self {
        self.preferences = jobs.iter().map(|&j| JobId::from(j)).collect();
        self
    }

    pub fn qualified(mut self, job: &str, tier: Qualification) -> Self {
        self.qualifications.push((JobId::from(job), tier));
        self
    }

    /// Attests `tier` for every job in `jobs`.
    pub fn qualified_for_all(mut self, jobs: &[JobCategory], tier: Qualification) -> Self {
        self.qualifications
            .extend(jobs.iter().map(|j| (j.id().clone(), tier)));
        self
    }

    pub fn origin_group_a(mut self) -> Self {
        self.origin_group_a = true;
        self
    }

    /// Builds the cadet.
    ///
    /// # Panics
    ///
    /// Panics when the percentile or preference list is invalid.
    pub fn build(self) -> Cadet {
        let preferences =
            Preferences::from_ordered(self.preferences).expect("invalid fixture preferences");
        Cadet::new(self.id, self.percentile)
            .expect("invalid fixture percentile")
            .with_preferences(preferences)
            .with_qualifications(self.qualifications)
            .with_origin_group_a(self.origin_group_a)
    }
}

/// `n` cadets `Cadet 1..n` who are Permitted for every job and rank the first
/// six jobs in order. Percentiles are spread evenly over `(0, 1]`.
pub fn fully_qualified(n: usize, jobs: &[JobCategory]) -> Vec<Cadet> {
    let ranked: Vec<&str> = jobs.iter().take(6).map(|j| j.id().as_str()).collect();
    (1..=n)
        .map(|i| {
            CadetBuilder::new(format!("Cadet {i}"))
                .percentile(i as f64 / n as f64)
                .prefers(&ranked)
                .qualified_for_all(jobs, Qualification::Permitted)
                .build()
        })
        .collect()
}

/// `n` cadets with percentile 0.5 and no preferences or qualifications.
pub fn unattested(n: usize) -> Vec<Cadet> {
    (1..=n)
        .map(|i| CadetBuilder::new(format!("Cadet {i}")).build())
        .collect()
}
