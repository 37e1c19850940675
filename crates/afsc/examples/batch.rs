//! Runs a batch from a TOML file, or a built-in job set, and prints the report.
//!
//! ```text
//! cargo run -p afsc --example batch --features console -- simulation.toml
//! ```

use afsc::prelude::*;

fn main() -> Result<(), afsc::Error> {
    #[cfg(feature = "console")]
    afsc::console::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(path)?,
        None => demo_config(),
    };

    let summary = afsc::run_simulation(&config)?;
    println!("{}", MarkdownReport::new(&summary));
    Ok(())
}

fn demo_config() -> SimulationConfig {
    let jobs = [
        ("11X", 6, 5.0),
        ("13N", 2, 2.0),
        ("14N", 3, 1.5),
        ("15W", 1, 0.5),
        ("17D", 4, 3.0),
        ("21R", 3, 1.0),
        ("62E", 2, 2.5),
        ("63A", 3, 1.0),
    ];
    jobs.into_iter().fold(
        SimulationConfig::new().with_num_runs(50).with_random_seed(2024),
        |config, (id, target, weight)| {
            config.with_job_category(
                JobCategory::new(id, target)
                    .with_overclass_factor(1.2)
                    .with_popularity_weight(weight),
            )
        },
    )
}
