//! Simulation entry points that hide the oracle and harness wiring.

use std::path::Path;

use afsc_config::{ConfigError, SimulationConfig};
use afsc_model::GoodLpOracle;
use afsc_sim::{BatchSummary, RunEvent, SimulationError, SimulationHarness};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

/// Errors from the simulation entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Validates `config` and runs its batch with the `good_lp` oracle.
///
/// # Errors
///
/// [`Error::Config`] when the configuration is invalid and
/// [`Error::Simulation`] when the worker pool cannot be built. Problems in
/// individual runs are recorded in the returned summary instead.
pub fn run_simulation(config: &SimulationConfig) -> Result<BatchSummary, Error> {
    harness(config)?
        .run_batch(&config.job_categories)
        .map_err(Error::from)
}

/// Like [`run_simulation`], sending a [`RunEvent`] as each run completes.
pub fn run_simulation_with_channel(
    config: &SimulationConfig,
    events: UnboundedSender<RunEvent>,
) -> Result<BatchSummary, Error> {
    harness(config)?
        .run_batch_with_channel(&config.job_categories, events)
        .map_err(Error::from)
}

/// Loads a TOML configuration from `path` and runs it.
pub fn run_simulation_file(path: impl AsRef<Path>) -> Result<BatchSummary, Error> {
    let config = SimulationConfig::load(path)?;
    run_simulation(&config)
}

fn harness(config: &SimulationConfig) -> Result<SimulationHarness<GoodLpOracle>, Error> {
    config.validate()?;
    info!(
        event = "config_loaded",
        runs = config.num_runs,
        jobs = config.job_categories.len(),
        seed = ?config.random_seed,
        deviation_penalty = config.deviation_penalty,
        preference_count = config.population.preference_count,
    );
    Ok(SimulationHarness::from_config(GoodLpOracle, config))
}
