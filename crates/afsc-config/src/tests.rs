//! Tests for simulation configuration.

use afsc_core::{BoundFamily, FractionBounds};

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        num_runs = 40
        random_seed = 42
        deviation_penalty = -1000.0
        worker_threads = "auto"

        [population]
        preference_count = 4
        percentile_decimals = 2
        origin_group_a_probability = 0.3

        [[job_categories]]
        id = "11X"
        target = 3
        overclass_factor = 1.5
        popularity_weight = 5.0

        [job_categories.mandatory_qualification_bounds]
        min = 0.4
        max = 0.8

        [[job_categories]]
        id = "62E"
        target = 2
    "#;

    let config = SimulationConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.num_runs, 40);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.deviation_penalty, -1000.0);
    assert_eq!(config.worker_threads, WorkerThreads::Auto);
    assert_eq!(config.population.preference_count, 4);
    assert_eq!(config.population.percentile_decimals, 2);
    assert_eq!(config.job_categories.len(), 2);

    let pilot = &config.job_categories[0];
    assert_eq!(pilot.overclass_factor(), 1.5);
    assert_eq!(
        pilot.bounds(BoundFamily::MandatoryQualification),
        FractionBounds::new(0.4, 0.8)
    );
    assert_eq!(pilot.bounds(BoundFamily::Merit), FractionBounds::OPEN);

    let engineer = &config.job_categories[1];
    assert_eq!(engineer.overclass_factor(), 1.0);
    assert_eq!(engineer.popularity_weight(), 0.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        num_runs: 10
        random_seed: 42
        worker_threads: auto
        job_categories:
          - id: "14N"
            target: 1
            popularity_weight: 1.0
    "#;

    let config = SimulationConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.num_runs, 10);
    assert_eq!(config.worker_threads.count(), None);
    assert_eq!(config.job_categories[0].id().as_str(), "14N");
    assert_eq!(config.population, PopulationConfig::default());
}

#[test]
fn test_defaults() {
    let config = SimulationConfig::from_toml_str("").unwrap();
    assert_eq!(config.num_runs, 100);
    assert_eq!(config.random_seed, None);
    assert_eq!(config.deviation_penalty, -50_000.0);
    assert_eq!(config.population.preference_count, 6);
    assert_eq!(config.population.percentile_decimals, 3);
    assert_eq!(config.population.origin_group_a_probability, 0.5);
}

#[test]
fn test_negative_target_fails_to_parse() {
    let toml = r#"
        [[job_categories]]
        id = "X"
        target = -1
    "#;
    assert!(matches!(
        SimulationConfig::from_toml_str(toml),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn test_builder() {
    let config = SimulationConfig::new()
        .with_num_runs(5)
        .with_random_seed(123)
        .with_deviation_penalty(-10.0)
        .with_worker_threads(WorkerThreads::Count(3))
        .with_job_category(JobCategory::new("A", 1));

    assert_eq!(config.num_runs, 5);
    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.worker_threads.count(), Some(3));
    assert_eq!(config.job_categories.len(), 1);
}

#[test]
fn test_validate_rejects_bad_job() {
    let config = SimulationConfig::new()
        .with_job_category(JobCategory::new("A", 1).with_overclass_factor(0.5));
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Job(ModelConstructionError::OverclassFactor { .. }))
    ));
}

#[test]
fn test_validate_rejects_duplicate_jobs() {
    let config = SimulationConfig::new()
        .with_job_category(JobCategory::new("A", 1))
        .with_job_category(JobCategory::new("A", 2));
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Job(ModelConstructionError::DuplicateJob(_)))
    ));
}

#[test]
fn test_validate_rejects_bad_population() {
    let mut config = SimulationConfig::new();
    config.population.preference_count = 7;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = SimulationConfig::new();
    config.population.origin_group_a_probability = 1.5;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let config = SimulationConfig::new().with_worker_threads(WorkerThreads::Count(0));
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}
