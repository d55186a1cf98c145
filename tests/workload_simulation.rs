//! Workload loading and simulation integration tests

use blockfit::{FitError, Simulation, StepAction, Strategy, Workload};
use std::io::Write;
use tempfile::NamedTempFile;

/// Helper: write `contents` to a temp file with the given suffix
fn workload_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_toml_workload() {
    let file = workload_file(
        ".toml",
        r#"
        capacity = 20
        operations = 15
        seed = 3

        [[processes]]
        pid = 1
        size = 4

        [[processes]]
        pid = 2
        size = 6
        "#,
    );

    let workload = Workload::load(file.path()).unwrap();
    assert_eq!(workload.capacity, 20);
    assert_eq!(workload.operations, 15);
    assert_eq!(workload.seed, Some(3));
    assert_eq!(workload.min_process_size(), 4);
}

#[test]
fn test_load_json_workload() {
    let file = workload_file(
        ".json",
        r#"{"capacity": 10, "operations": 5, "processes": [{"pid": 4, "size": 2}]}"#,
    );

    let workload = Workload::load(file.path()).unwrap();
    assert_eq!(workload.capacity, 10);
    assert_eq!(workload.size_of(4), Some(2));
}

#[test]
fn test_load_rejects_invalid_workload() {
    let file = workload_file(
        ".toml",
        r#"
        capacity = 10
        operations = 5

        [[processes]]
        pid = 0
        size = 2
        "#,
    );

    let result = Workload::load(file.path());
    assert!(matches!(result, Err(FitError::InvalidProcessId(0))));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = Workload::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(FitError::Io(_))));
}

#[test]
fn test_default_workload_runs_every_strategy() {
    let simulation = Simulation::new(Workload::default().with_seed(2024)).unwrap();
    let reports = simulation.run_all().unwrap();

    let strategies: Vec<_> = reports.iter().map(|report| report.strategy).collect();
    assert_eq!(strategies, Strategy::ALL.to_vec());

    for report in &reports {
        assert_eq!(report.steps.len(), 30);
        assert_eq!(report.final_stats.capacity, 32);

        let last = report.steps.last().unwrap();
        assert_eq!(last.fragmentation, report.final_fragmentation);

        // Memory only ever holds processes from the workload
        for step in &report.steps {
            assert!(step.memory.iter().all(|&id| id <= 10));
        }
    }
}

#[test]
fn test_deallocation_follows_residency() {
    let simulation = Simulation::new(Workload::default().with_seed(5)).unwrap();
    let report = simulation.run(Strategy::FirstFit).unwrap();

    let mut resident = std::collections::HashSet::new();
    for step in &report.steps {
        match step.action {
            StepAction::Allocated { pid, .. } => {
                assert!(resident.insert(pid), "process {} allocated twice", pid);
            }
            StepAction::Deallocated { pid, .. } => {
                assert!(resident.remove(&pid), "process {} was not resident", pid);
            }
            StepAction::AllocationFailed { pid, .. } => {
                assert!(!resident.contains(&pid));
            }
        }
    }
}

#[test]
fn test_runs_are_reproducible_across_simulations() {
    let first = Simulation::new(Workload::default().with_seed(77))
        .unwrap()
        .run_all()
        .unwrap();
    let second = Simulation::new(Workload::default().with_seed(77))
        .unwrap()
        .run_all()
        .unwrap();
    assert_eq!(first, second);
}
