//! Configuration system for AFSC assignment simulations.
//!
//! Load batch settings and job categories from TOML or YAML files so a
//! simulation can be re-run with different parameters without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use afsc_config::{SimulationConfig, WorkerThreads};
//!
//! let config = SimulationConfig::from_toml_str(r#"
//!     num_runs = 250
//!     random_seed = 7
//!     worker_threads = { count = 4 }
//!
//!     [population]
//!     preference_count = 6
//!
//!     [[job_categories]]
//!     id = "14N"
//!     target = 4
//!     overclass_factor = 1.25
//!     popularity_weight = 3.0
//!
//!     [job_categories.merit_bounds]
//!     min = 0.3
//!     max = 0.7
//! "#).unwrap();
//!
//! assert_eq!(config.num_runs, 250);
//! assert_eq!(config.worker_threads, WorkerThreads::Count(4));
//! assert_eq!(config.job_categories.len(), 1);
//! assert_eq!(config.job_categories[0].target(), 4);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use afsc_config::SimulationConfig;
//!
//! let config = SimulationConfig::load("simulation.toml").unwrap_or_default();
//! assert_eq!(config.num_runs, 100);
//! ```

use std::collections::HashSet;
use std::path::Path;

use afsc_core::{JobCategory, ModelConstructionError, DEFAULT_DEVIATION_PENALTY, MAX_PREFERENCES};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid job category: {0}")]
    Job(#[from] ModelConstructionError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_num_runs() -> usize {
    100
}

fn default_deviation_penalty() -> f64 {
    DEFAULT_DEVIATION_PENALTY
}

/// Main simulation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationConfig {
    /// Number of synthesize-build-solve runs in a batch.
    #[serde(default = "default_num_runs")]
    pub num_runs: usize,

    /// Base seed; run `i` is seeded with `random_seed + i`.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Utility of placing a cadet in a job they hold no qualification for.
    #[serde(default = "default_deviation_penalty")]
    pub deviation_penalty: f64,

    /// Number of worker threads executing runs.
    #[serde(default)]
    pub worker_threads: WorkerThreads,

    /// Population synthesis settings.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Job categories the population is assigned to.
    #[serde(default)]
    pub job_categories: Vec<JobCategory>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_runs: default_num_runs(),
            random_seed: None,
            deviation_penalty: default_deviation_penalty(),
            worker_threads: WorkerThreads::default(),
            population: PopulationConfig::default(),
            job_categories: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the number of runs.
    pub fn with_num_runs(mut self, num_runs: usize) -> Self {
        self.num_runs = num_runs;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the deviation penalty.
    pub fn with_deviation_penalty(mut self, penalty: f64) -> Self {
        self.deviation_penalty = penalty;
        self
    }

    /// Sets the worker thread configuration.
    pub fn with_worker_threads(mut self, workers: WorkerThreads) -> Self {
        self.worker_threads = workers;
        self
    }

    /// Adds a job category.
    pub fn with_job_category(mut self, job: JobCategory) -> Self {
        self.job_categories.push(job);
        self
    }

    /// Checks settings that parsing alone cannot catch.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Job`] for an invalid job category and
    /// [`ConfigError::Invalid`] for anything else.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.deviation_penalty.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "deviation_penalty must be finite, got {}",
                self.deviation_penalty
            )));
        }
        if let WorkerThreads::Count(0) = self.worker_threads {
            return Err(ConfigError::Invalid(
                "worker_threads count must be positive, use \"auto\" for the default".to_string(),
            ));
        }
        self.population.validate()?;

        let mut seen = HashSet::new();
        for job in &self.job_categories {
            job.validate()?;
            if !seen.insert(job.id()) {
                return Err(ModelConstructionError::DuplicateJob(job.id().clone()).into());
            }
        }
        Ok(())
    }
}

/// Worker thread configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerThreads {
    /// Use the rayon default (one thread per core).
    #[default]
    Auto,

    /// Specific number of threads.
    Count(usize),
}

impl WorkerThreads {
    /// Returns the explicit thread count, or `None` for the rayon default.
    pub fn count(self) -> Option<usize> {
        match self {
            WorkerThreads::Auto => None,
            WorkerThreads::Count(n) => Some(n),
        }
    }
}

fn default_preference_count() -> usize {
    MAX_PREFERENCES
}

fn default_percentile_decimals() -> u32 {
    3
}

fn default_origin_probability() -> f64 {
    0.5
}

/// Population synthesis settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PopulationConfig {
    /// Length of each synthesized preference list.
    #[serde(default = "default_preference_count")]
    pub preference_count: usize,

    /// Decimal places kept on synthesized percentiles.
    #[serde(default = "default_percentile_decimals")]
    pub percentile_decimals: u32,

    /// Probability a synthesized cadet belongs to origin group A.
    #[serde(default = "default_origin_probability")]
    pub origin_group_a_probability: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            preference_count: default_preference_count(),
            percentile_decimals: default_percentile_decimals(),
            origin_group_a_probability: default_origin_probability(),
        }
    }
}

impl PopulationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.preference_count == 0 || self.preference_count > MAX_PREFERENCES {
            return Err(ConfigError::Invalid(format!(
                "population.preference_count must be in 1..={MAX_PREFERENCES}, got {}",
                self.preference_count
            )));
        }
        if self.percentile_decimals > 15 {
            return Err(ConfigError::Invalid(format!(
                "population.percentile_decimals must be at most 15, got {}",
                self.percentile_decimals
            )));
        }
        let p = self.origin_group_a_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::Invalid(format!(
                "population.origin_group_a_probability must be in [0, 1], got {p}"
            )));
        }
        Ok(())
    }
}
