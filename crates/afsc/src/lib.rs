//! AFSC - cadet-to-job assignment studies in Rust
//!
//! Configure job categories, let the harness synthesize cadet populations,
//! solve each assignment program once and read the aggregated statistics.
//!
//! # Example
//!
//! ```rust
//! use afsc::prelude::*;
//!
//! let mut config = SimulationConfig::new().with_num_runs(5).with_random_seed(1);
//! for i in 1..=6 {
//!     config = config.with_job_category(
//!         JobCategory::new(format!("J{i}"), 1).with_popularity_weight(1.0),
//!     );
//! }
//!
//! let summary = afsc::run_simulation(&config).unwrap();
//! assert_eq!(summary.optimal_count(), 5);
//! println!("{}", MarkdownReport::new(&summary));
//! ```

// Entities and scoring
pub use afsc_core::{
    BoundFamily, Cadet, CadetId, EntityError, FractionBounds, JobCategory, JobId,
    ModelConstructionError, Preferences, Qualification, Rank, UtilityScorer,
    DEFAULT_DEVIATION_PENALTY, MAX_PREFERENCES,
};

// Configuration
pub use afsc_config::{ConfigError, PopulationConfig, SimulationConfig, WorkerThreads};

// Model, oracle and per-run results
pub use afsc_model::{
    solve, Assignment, AssignmentModel, GoodLpOracle, ModelBuilder, OracleError, OracleStatus,
    Placement, RankBucket, RankHistogram, Roster, RunResult, SolveError, SolveOutcome,
    SolverOracle,
};

// Synthesis, batches and export
pub use afsc_sim::{
    BatchSummary, BucketStats, DemandProfile, FieldValue, HarnessSettings, MarkdownReport,
    MemorySink, PopulationSynthesizer, Record, RunEvent, RunFailure, RunOutcome, RunRecord,
    RunStatus, SimulationError, SimulationHarness, SynthesisError, TabularSink, DEMAND_TABLE,
    POPULATION_TABLE, ROSTER_TABLE,
};

#[cfg(feature = "console")]
pub mod console;

mod simulation;
pub use simulation::{run_simulation, run_simulation_file, run_simulation_with_channel, Error};

pub mod prelude {
    pub use super::{Cadet, JobCategory, Preferences, Qualification, Rank};
    pub use super::{FractionBounds, SimulationConfig, WorkerThreads};
    pub use super::{GoodLpOracle, ModelBuilder, SolveOutcome, SolverOracle};
    pub use super::{BatchSummary, HarnessSettings, MarkdownReport, SimulationHarness};
    pub use super::{MemorySink, RankBucket, TabularSink};
}
