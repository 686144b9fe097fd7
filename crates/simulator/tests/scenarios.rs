//! End-to-end load runs against the public API.

use loadsim_simulator::selector::{OPERAND_MAX, OPERAND_MIN};
use loadsim_simulator::{
    Complexity, LoadConfig, NumericError, Operation, OperationLogger, OperationRecord,
    OperationOutcome, Simulator,
};
use std::time::{Duration, Instant};

/// Upper bound on records so fast hosts don't exhaust memory.
const RECORD_CAP: u64 = 2_000_000;

fn simulator(config: LoadConfig) -> Simulator {
    Simulator::new(config)
        .expect("valid config")
        .with_logger(OperationLogger::disabled())
}

fn assert_operands_in_range(records: &[OperationRecord]) {
    for record in records {
        assert!((OPERAND_MIN..=OPERAND_MAX).contains(&record.x), "x = {}", record.x);
        assert!((OPERAND_MIN..=OPERAND_MAX).contains(&record.y), "y = {}", record.y);
    }
}

#[tokio::test]
async fn test_easy_two_second_run() {
    let sim = simulator(
        LoadConfig::new(2, Complexity::Easy)
            .with_max_ops_per_sec(5)
            .with_max_operations(RECORD_CAP),
    );

    let start = Instant::now();
    let records = sim.run().await.unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed < Duration::from_secs(3), "took {elapsed:?}");
    assert!(!records.is_empty());
    if (records.len() as u64) < RECORD_CAP {
        assert!(elapsed >= Duration::from_secs(2), "stopped early: {elapsed:?}");
    }
    assert!(records
        .iter()
        .all(|r| matches!(r.operation, Operation::Add | Operation::Sub)));
    assert_operands_in_range(&records);
}

#[tokio::test]
async fn test_every_tier_stays_in_its_operations() {
    for complexity in Complexity::ALL {
        let sim = simulator(
            LoadConfig::new(1, complexity)
                .with_max_ops_per_sec(5)
                .with_max_operations(5_000)
                .with_seed(17),
        );
        let records = sim.run().await.unwrap();

        assert!(!records.is_empty());
        for record in &records {
            assert!(
                complexity.contains(record.operation),
                "{} not in {}",
                record.operation,
                complexity
            );
        }
        assert_operands_in_range(&records);
    }
}

#[tokio::test]
async fn test_zero_duration_does_not_hang() {
    let sim = simulator(LoadConfig::new(0, Complexity::Medium).with_max_ops_per_sec(1));
    let start = Instant::now();
    let records = sim.run().await.unwrap();
    assert!(records.len() <= 1);
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_one_second_run_terminates_on_time() {
    let sim = simulator(
        LoadConfig::new(1, Complexity::Complicated).with_max_operations(RECORD_CAP),
    );
    let start = Instant::now();
    let run = sim.run_with_report().await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(1_500));
    assert_eq!(run.report.total_operations, run.records.len() as u64);
}

#[tokio::test]
async fn test_overflow_is_captured_not_fatal() {
    let sim = simulator(
        LoadConfig::new(5, Complexity::Complicated)
            .with_max_operations(1_000)
            .with_seed(3),
    );
    let run = sim.run_with_report().await.unwrap();

    // The run kept going past the first overflow.
    assert_eq!(run.records.len(), 1_000);
    let overflows = run
        .records
        .iter()
        .filter(|r| r.result == OperationOutcome::Failed { error: NumericError::Overflow })
        .count();
    assert!(overflows > 0);
    assert!(run
        .records
        .iter()
        .filter(|r| r.operation == Operation::Sin)
        .all(|r| r.result.value().is_some()));
}

#[test]
fn test_division_by_zero_is_captured() {
    let record = OperationRecord::execute(Operation::Div, 12.0, 0.0);
    assert_eq!(
        record.result,
        OperationOutcome::Failed {
            error: NumericError::DivisionByZero
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_parallel_run_respects_deadline() {
    let sim = simulator(
        LoadConfig::new(1, Complexity::Medium)
            .with_workers(3)
            .with_max_ops_per_sec(2)
            .with_max_operations(RECORD_CAP)
            .with_seed(9),
    );
    let start = Instant::now();
    let records = sim.run().await.unwrap();
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(!records.is_empty());
    assert!(records
        .iter()
        .all(|r| Complexity::Medium.contains(r.operation)));
}
