//! Shared test fixtures for AFSC crates.
//!
//! This crate provides entity builders and small canned scenarios. It does
//! NOT depend on `afsc-model` so that crate can use it as a dev-dependency;
//! scripted oracles live next to the tests that drive them.
//!
//! - [`jobs`] - job category sets
//! - [`cadets`] - cadet builders and canned populations
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! afsc-test = { workspace = true }
//! ```
//!
//! ```
//! use afsc_test::{cadets, jobs};
//!
//! let jobs = jobs::uniform(3, 1);
//! let cadets = cadets::fully_qualified(3, &jobs);
//! assert_eq!(cadets.len(), 3);
//! ```

pub mod cadets;
pub mod jobs;

pub use cadets::CadetBuilder;
