//! Flat tabular records handed to an export collaborator.
//!
//! A batch produces three tables:
//!
//! - [`ROSTER_TABLE`]: one row per placement of every optimal run
//! - [`POPULATION_TABLE`]: one row per synthesized cadet of every run
//! - [`DEMAND_TABLE`]: one row per job, most demanded first
//!
//! Writing them anywhere (CSV, a spreadsheet, a database) is the sink's job.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;

use afsc_core::{Rank, MAX_PREFERENCES};

use crate::summary::BatchSummary;

pub const ROSTER_TABLE: &str = "roster_detail";
pub const POPULATION_TABLE: &str = "population_summary";
pub const DEMAND_TABLE: &str = "demand_profile";

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Empty,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Text(v) => f.write_str(v),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Empty => Ok(()),
        }
    }
}

impl From<usize> for FieldValue {
    fn from(v: usize) -> Self {
        FieldValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Empty, Into::into)
    }
}

/// An ordered list of named fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn with(mut self, name: &'static str, value: impl Into<FieldValue>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(&'static str, FieldValue)] {
        &self.fields
    }

    /// Field names in order, suitable for a header row.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(n, _)| *n)
    }
}

/// Receives named tables of records.
pub trait TabularSink {
    type Error;

    fn write_table(&mut self, name: &str, records: &[Record]) -> Result<(), Self::Error>;
}

/// Keeps tables in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: BTreeMap<String, Vec<Record>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&[Record]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl TabularSink for MemorySink {
    type Error = Infallible;

    fn write_table(&mut self, name: &str, records: &[Record]) -> Result<(), Self::Error> {
        self.tables.insert(name.to_string(), records.to_vec());
        Ok(())
    }
}

/// Run, job, cadet, percentile, qualification and preference rank of every
/// placement in every optimal run.
pub fn roster_records(summary: &BatchSummary) -> Vec<Record> {
    let mut records = Vec::new();
    for run in summary.runs() {
        let Some(result) = run.outcome.result() else {
            continue;
        };
        for placement in result.placements() {
            records.push(
                Record::new()
                    .with("run", run.run + 1)
                    .with("job", placement.job.as_str())
                    .with("cadet", placement.cadet.as_str())
                    .with("percentile", placement.percentile)
                    .with("qualification", placement.qualification.map(|q| q.as_str()))
                    .with("preference_rank", placement.rank.map(|r| usize::from(r.get()))),
            );
        }
    }
    records
}

/// Profile of every synthesized cadet: percentile, origin flag, ranked jobs
/// and the tier held for each.
pub fn population_records(summary: &BatchSummary) -> Vec<Record> {
    const PREFERENCE_FIELDS: [&str; MAX_PREFERENCES] = [
        "preference_1",
        "preference_2",
        "preference_3",
        "preference_4",
        "preference_5",
        "preference_6",
    ];
    const QUALIFICATION_FIELDS: [&str; MAX_PREFERENCES] = [
        "qualification_1",
        "qualification_2",
        "qualification_3",
        "qualification_4",
        "qualification_5",
        "qualification_6",
    ];

    let mut records = Vec::new();
    for run in summary.runs() {
        for cadet in &run.population {
            let mut record = Record::new()
                .with("run", run.run + 1)
                .with("cadet", cadet.id().as_str())
                .with("percentile", cadet.percentile())
                .with("origin_group_a", cadet.is_origin_group_a());
            for (i, &name) in PREFERENCE_FIELDS.iter().enumerate() {
                let job = Rank::new(i as u8 + 1).and_then(|r| cadet.preferences().job_at(r));
                record = record.with(name, job.map(|j| j.as_str()));
            }
            for (i, &name) in QUALIFICATION_FIELDS.iter().enumerate() {
                let tier = Rank::new(i as u8 + 1)
                    .and_then(|r| cadet.preferences().job_at(r))
                    .and_then(|j| cadet.qualification_for(j));
                record = record.with(name, tier.map(|q| q.as_str()));
            }
            records.push(record);
        }
    }
    records
}

/// Preference-list appearances per job, most demanded first.
pub fn demand_records(summary: &BatchSummary) -> Vec<Record> {
    summary
        .demand()
        .sorted_desc()
        .into_iter()
        .map(|(job, count)| {
            Record::new()
                .with("job", job.as_str())
                .with("preference_count", count)
        })
        .collect()
}

impl BatchSummary {
    /// Writes the roster, population and demand tables to `sink`.
    pub fn export<S: TabularSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.write_table(ROSTER_TABLE, &roster_records(self))?;
        sink.write_table(POPULATION_TABLE, &population_records(self))?;
        sink.write_table(DEMAND_TABLE, &demand_records(self))
    }
}
