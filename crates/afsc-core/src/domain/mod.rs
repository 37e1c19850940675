//! Domain model for cadet assignment
//!
//! - `CadetId` / `JobId`: validated identifiers
//! - `Cadet`: an individual with preferences, qualifications and merit
//! - `JobCategory`: an AFSC with target headcount and fairness bounds
//! - `Preferences` / `Rank`: an ordered list of at most six ranked jobs

mod cadet;
mod ids;
mod job;
mod preferences;


pub use cadet::{Cadet, Qualification};
pub use ids::{CadetId, JobId};
pub use job::{BoundFamily, FractionBounds, JobCategory};
pub use preferences::{Preferences, Rank, MAX_PREFERENCES};
