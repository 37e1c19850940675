//! Synthetic cadet populations drawn from job demand parameters.

use afsc_config::PopulationConfig;
use afsc_core::{
    Cadet, EntityError, JobCategory, JobId, Preferences, Qualification, MAX_PREFERENCES,
};
use rand::Rng;

use crate::error::SynthesisError;

/// Largest number of decimals a percentile can be rounded to.
pub const MAX_PERCENTILE_DECIMALS: u32 = 15;

/// Upper limit on `⌈Σ target * overclass_factor⌉` for one population.
pub const MAX_POPULATION: usize = 1_000_000;

/// Generates cadet populations from job targets and popularity weights.
///
/// The synthesizer holds only its settings; randomness comes from the RNG
/// passed to [`synthesize`](Self::synthesize), so one synthesizer can serve
/// many concurrent runs.
///
/// # Example
///
/// ```
/// use afsc_core::JobCategory;
/// use afsc_sim::PopulationSynthesizer;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let jobs: Vec<JobCategory> = (1..=8)
///     .map(|i| JobCategory::new(format!("J{i}"), 2).with_popularity_weight(i as f64))
///     .collect();
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let cadets = PopulationSynthesizer::default()
///     .synthesize(&jobs, &mut rng)
///     .unwrap();
///
/// assert_eq!(cadets.len(), 16);
/// assert!(cadets.iter().all(|c| c.preferences().len() == 6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationSynthesizer {
    preference_count: usize,
    percentile_decimals: u32,
    origin_group_a_probability: f64,
}

impl Default for PopulationSynthesizer {
    fn default() -> Self {
        Self::from(&PopulationConfig::default())
    }
}

impl From<&PopulationConfig> for PopulationSynthesizer {
    fn from(config: &PopulationConfig) -> Self {
        Self {
            preference_count: config.preference_count,
            percentile_decimals: config.percentile_decimals,
            origin_group_a_probability: config.origin_group_a_probability,
        }
    }
}

impl PopulationSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preference list length, at most [`MAX_PREFERENCES`].
    pub fn with_preference_count(mut self, count: usize) -> Self {
        self.preference_count = count;
        self
    }

    pub fn with_percentile_decimals(mut self, decimals: u32) -> Self {
        self.percentile_decimals = decimals;
        self
    }

    pub fn with_origin_group_a_probability(mut self, probability: f64) -> Self {
        self.origin_group_a_probability = probability;
        self
    }

    pub fn preference_count(&self) -> usize {
        self.preference_count
    }

    /// Draws a population for `jobs`.
    ///
    /// 1. The cadet count is uniform in `[Σ target, ⌈Σ target * overclass_factor⌉]`.
    /// 2. Each cadet ranks `preference_count` distinct jobs drawn with
    ///    probability proportional to `popularity_weight`; duplicates are
    ///    redrawn and ranks follow draw order.
    /// 3. Each ranked job gets a qualification tier drawn uniformly.
    /// 4. Percentile is uniform in `[0, 1]`, rounded; origin group A membership
    ///    is a coin flip with the configured probability.
    ///
    /// # Errors
    ///
    /// Fails on invalid settings, on a job category that does not validate,
    /// on negative or non-finite weights, on fewer positively weighted jobs
    /// than `preference_count`, on a list longer than [`MAX_PREFERENCES`] and
    /// on a population band reaching past [`MAX_POPULATION`].
    pub fn synthesize<R>(
        &self,
        jobs: &[JobCategory],
        rng: &mut R,
    ) -> Result<Vec<Cadet>, SynthesisError>
    where
        R: Rng,
    {
        let p = self.origin_group_a_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(SynthesisError::InvalidProbability(p));
        }
        if self.percentile_decimals > MAX_PERCENTILE_DECIMALS {
            return Err(SynthesisError::InvalidDecimals(self.percentile_decimals));
        }
        for job in jobs {
            job.validate()?;
        }
        let table = CumulativeWeights::new(jobs)?;
        if self.preference_count > table.len() {
            return Err(SynthesisError::InsufficientDemand {
                positive: table.len(),
                required: self.preference_count,
            });
        }
        if self.preference_count > MAX_PREFERENCES {
            return Err(EntityError::TooManyPreferences {
                count: self.preference_count,
                max: MAX_PREFERENCES,
            }
            .into());
        }

        let count = cadet_count(jobs, rng)?;
        let mut cadets = Vec::with_capacity(count);
        for i in 0..count {
            let ranked = self.draw_preferences(jobs, &table, rng);
            let qualifications: Vec<(JobId, Qualification)> = ranked
                .iter()
                .map(|job| {
                    let tier = Qualification::ALL[rng.random_range(0..Qualification::ALL.len())];
                    (job.clone(), tier)
                })
                .collect();
            let percentile = self.round_percentile(rng.random::<f64>());
            let origin_group_a = rng.random_bool(p);

            let cadet = Cadet::new(format!("Cadet {}", i + 1), percentile)?
                .with_preferences(Preferences::from_ordered(ranked)?)
                .with_qualifications(qualifications)
                .with_origin_group_a(origin_group_a);
            cadets.push(cadet);
        }
        Ok(cadets)
    }

    fn draw_preferences<R>(
        &self,
        jobs: &[JobCategory],
        table: &CumulativeWeights,
        rng: &mut R,
    ) -> Vec<JobId>
    where
        R: Rng,
    {
        let mut drawn: Vec<usize> = Vec::with_capacity(self.preference_count);
        while drawn.len() < self.preference_count {
            let job = table.draw(rng);
            if !drawn.contains(&job) {
                drawn.push(job);
            }
        }
        drawn.into_iter().map(|j| jobs[j].id().clone()).collect()
    }

    fn round_percentile(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.percentile_decimals as i32);
        ((value * scale).round() / scale).clamp(0.0, 1.0)
    }
}

/// Uniform count in `[Σ target, ⌈Σ target * overclass_factor⌉]`.
///
/// Jobs must already have validated, so every factor is finite and >= 1.
fn cadet_count<R>(jobs: &[JobCategory], rng: &mut R) -> Result<usize, SynthesisError>
where
    R: Rng,
{
    let max = jobs
        .iter()
        .map(JobCategory::max_headcount)
        .sum::<f64>()
        .ceil();
    if !max.is_finite() || max > MAX_POPULATION as f64 {
        return Err(SynthesisError::PopulationTooLarge {
            max,
            limit: MAX_POPULATION,
        });
    }
    let max = max as usize;
    let min = jobs
        .iter()
        .map(|j| j.target() as usize)
        .sum::<usize>()
        .min(max);
    Ok(rng.random_range(min..=max))
}

/// Running sum of positive popularity weights.
#[derive(Debug)]
struct CumulativeWeights {
    /// `(job index, cumulative weight)`, zero-weight jobs excluded.
    entries: Vec<(usize, f64)>,
    total: f64,
}

impl CumulativeWeights {
    fn new(jobs: &[JobCategory]) -> Result<Self, SynthesisError> {
        let mut entries = Vec::with_capacity(jobs.len());
        let mut total = 0.0;
        for (index, job) in jobs.iter().enumerate() {
            let weight = job.popularity_weight();
            if !weight.is_finite() || weight < 0.0 {
                return Err(SynthesisError::InvalidWeight {
                    job: job.id().clone(),
                    weight,
                });
            }
            if weight > 0.0 {
                total += weight;
                entries.push((index, total));
            }
        }
        Ok(Self { entries, total })
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Draws a job index. Must not be called on an empty table.
    fn draw<R>(&self, rng: &mut R) -> usize
    where
        R: Rng,
    {
        let target = rng.random::<f64>() * self.total;
        self.entries
            .iter()
            .find(|(_, cumulative)| target < *cumulative)
            .or_else(|| self.entries.last())
            .map_or(0, |&(index, _)| index)
    }
}
