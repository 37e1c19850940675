//! Facade entry points from configuration to summary.

use afsc::prelude::*;
use afsc::{run_simulation, run_simulation_file, run_simulation_with_channel, ConfigError, Error};
use tokio::sync::mpsc;

const CONFIG: &str = r#"
num_runs = 6
random_seed = 21
worker_threads = { count = 2 }

[population]
preference_count = 4

[[job_categories]]
id = "11X"
target = 2
overclass_factor = 1.5
popularity_weight = 4.0

[[job_categories]]
id = "13N"
target = 2
overclass_factor = 1.5
popularity_weight = 2.0

[[job_categories]]
id = "14N"
target = 2
overclass_factor = 1.5
popularity_weight = 1.0

[[job_categories]]
id = "17D"
target = 2
overclass_factor = 1.5
popularity_weight = 1.0
"#;

fn uniform_config(runs: usize) -> SimulationConfig {
    (1..=6).fold(
        SimulationConfig::new().with_num_runs(runs).with_random_seed(3),
        |config, i| {
            config.with_job_category(
                JobCategory::new(format!("J{i}"), 1).with_popularity_weight(1.0),
            )
        },
    )
}

#[test]
fn test_run_simulation() {
    let summary = run_simulation(&uniform_config(4)).unwrap();
    assert_eq!(summary.num_runs(), 4);
    assert_eq!(summary.optimal_count(), 4);
    assert_eq!(summary.base_seed(), 3);
}

#[test]
fn test_invalid_config_is_rejected_before_running() {
    let config = uniform_config(4).with_worker_threads(WorkerThreads::Count(0));
    let err = run_simulation(&config).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
}

#[test]
fn test_run_simulation_file() {
    let path = std::env::temp_dir().join(format!("afsc-sim-{}.toml", std::process::id()));
    std::fs::write(&path, CONFIG).unwrap();
    let summary = run_simulation_file(&path);
    std::fs::remove_file(&path).unwrap();

    let summary = summary.unwrap();
    assert_eq!(summary.num_runs(), 6);
    assert_eq!(summary.jobs().len(), 4);
    for run in summary.runs() {
        let size = run.population.len();
        assert!((8..=12).contains(&size), "population {size} outside [8, 12]");
        assert!(run.population.iter().all(|c| c.preferences().len() == 4));
    }
}

#[test]
fn test_missing_file() {
    let err = run_simulation_file("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Io(_))));
}

#[test]
fn test_run_simulation_with_channel() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let summary = run_simulation_with_channel(&uniform_config(3), tx).unwrap();

    let mut received = 0;
    while rx.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, summary.num_runs());
}
