//! Markdown report of a batch.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::summary::BatchSummary;

/// Human-readable Markdown rendering of a [`BatchSummary`].
///
/// # Example
///
/// ```
/// use afsc_sim::{BatchSummary, MarkdownReport};
///
/// let summary = BatchSummary::from_runs(7, &[], Vec::new());
/// let md = MarkdownReport::new(&summary).to_string();
/// assert!(md.contains("# AFSC Assignment Simulation"));
/// assert!(md.contains("*No optimal runs.*"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MarkdownReport<'a> {
    summary: &'a BatchSummary,
}

impl<'a> MarkdownReport<'a> {
    pub fn new(summary: &'a BatchSummary) -> Self {
        Self { summary }
    }

    /// Writes the report to a file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, self.to_string())
    }

    /// Writes the report to a writer.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.to_string().as_bytes())
    }
}

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;

        writeln!(f, "# AFSC Assignment Simulation")?;
        writeln!(f)?;
        writeln!(f, "- **Runs**: {}", s.num_runs())?;
        writeln!(f, "- **Seed**: {}", s.base_seed())?;
        writeln!(f, "- **Job categories**: {}", s.jobs().len())?;
        writeln!(f)?;

        writeln!(f, "## Outcomes")?;
        writeln!(f)?;
        writeln!(f, "| Metric | Value |")?;
        writeln!(f, "|--------|-------|")?;
        writeln!(f, "| Optimal | {} |", s.optimal_count())?;
        writeln!(f, "| Infeasible | {} |", s.infeasible_count())?;
        writeln!(f, "| Failed | {} |", s.failed_count())?;
        writeln!(f, "| Pass Rate | {:.2}% |", s.pass_rate() * 100.0)?;
        writeln!(f, "| Avg Population | {:.1} |", s.mean_population())?;
        writeln!(
            f,
            "| Avg Run Time | {:.2} ms |",
            s.avg_elapsed().as_secs_f64() * 1000.0
        )?;
        writeln!(f)?;

        writeln!(f, "## Preference Rank Received")?;
        writeln!(f)?;
        if s.optimal_count() == 0 {
            writeln!(f, "*No optimal runs.*")?;
        } else {
            writeln!(f, "| Rank | Mean Count | Mean Fraction |")?;
            writeln!(f, "|------|------------|---------------|")?;
            for stats in s.buckets() {
                writeln!(
                    f,
                    "| {} | {:.2} | {:.2}% |",
                    stats.bucket,
                    stats.mean_count,
                    stats.mean_fraction * 100.0
                )?;
            }
            writeln!(f)?;
            writeln!(f, "Mean objective: {:.2}", s.mean_total_utility())?;
            writeln!(f, "Mean utility per placement: {:.2}", s.mean_placement_utility())?;
        }
        writeln!(f)?;

        writeln!(f, "## Demand Profile")?;
        writeln!(f)?;
        writeln!(f, "| Job | Preference Count |")?;
        writeln!(f, "|-----|------------------|")?;
        for (job, count) in s.demand().sorted_desc() {
            writeln!(f, "| {job} | {count} |")?;
        }
        Ok(())
    }
}
