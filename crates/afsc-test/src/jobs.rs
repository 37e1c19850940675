//! Job category sets.
//!
//! # Example
//!
//! ```
//! use afsc_test::jobs;
//!
//! let jobs = jobs::uniform(6, 2);
//! assert_eq!(jobs[5].id().as_str(), "J6");
//! assert_eq!(jobs[0].target(), 2);
//! assert_eq!(jobs[0].popularity_weight(), 1.0);
//! ```

use afsc_core::JobCategory;

/// `n` jobs `J1..Jn` with equal target, overclass factor 1, weight 1 and open bounds.
pub fn uniform(n: usize, target: u32) -> Vec<JobCategory> {
    (1..=n)
        .map(|i| JobCategory::new(format!("J{i}"), target).with_popularity_weight(1.0))
        .collect()
}

/// Like [`uniform`] with an overclass factor applied to every job.
pub fn overclassed(n: usize, target: u32, factor: f64) -> Vec<JobCategory> {
    uniform(n, target)
        .into_iter()
        .map(|job| job.with_overclass_factor(factor))
        .collect()
}

/// Jobs with the given `(id, target, popularity_weight)` triples.
pub fn weighted(entries: &[(&str, u32, f64)]) -> Vec<JobCategory> {
    entries
        .iter()
        .map(|&(id, target, weight)| JobCategory::new(id, target).with_popularity_weight(weight))
        .collect()
}
