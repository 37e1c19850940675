//! AFSC Sim - synthetic populations and Monte Carlo batches
//!
//! - [`PopulationSynthesizer`]: draws cadets with preference lists weighted by job popularity
//! - [`SimulationHarness`]: runs synthesize, build, solve and aggregate N times in parallel
//! - [`BatchSummary`]: per-run records plus rank-bucket means and the demand profile
//! - [`TabularSink`] and [`MarkdownReport`]: hand the batch to an exporter or a reader
//!
//! # Example
//!
//! ```
//! use afsc_core::JobCategory;
//! use afsc_model::GoodLpOracle;
//! use afsc_sim::{HarnessSettings, MemorySink, SimulationHarness, DEMAND_TABLE};
//!
//! let jobs: Vec<JobCategory> = (1..=6)
//!     .map(|i| JobCategory::new(format!("J{i}"), 1).with_popularity_weight(1.0))
//!     .collect();
//!
//! let harness = SimulationHarness::new(
//!     GoodLpOracle,
//!     HarnessSettings::default().with_num_runs(3).with_seed(42),
//! );
//! let summary = harness.run_batch(&jobs).unwrap();
//! assert_eq!(summary.optimal_count(), 3);
//!
//! let mut sink = MemorySink::new();
//! summary.export(&mut sink).unwrap();
//! assert_eq!(sink.table(DEMAND_TABLE).unwrap().len(), 6);
//! ```

pub mod error;
pub mod export;
pub mod harness;
pub mod pool;
pub mod report;
pub mod summary;
pub mod synth;

#[cfg(test)]
mod tests;

pub use error::{SimulationError, SynthesisError};
pub use export::{
    demand_records, population_records, roster_records, FieldValue, MemorySink, Record,
    TabularSink, DEMAND_TABLE, POPULATION_TABLE, ROSTER_TABLE,
};
pub use harness::{HarnessSettings, RunEvent, RunStatus, SimulationHarness};
pub use pool::WorkerPool;
pub use report::MarkdownReport;
pub use summary::{BatchSummary, BucketStats, DemandProfile, RunFailure, RunOutcome, RunRecord};
pub use synth::{PopulationSynthesizer, MAX_PERCENTILE_DECIMALS, MAX_POPULATION};
