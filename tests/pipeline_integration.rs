//! # Pipeline Integration Tests
//!
//! End-to-end runs over files and streams, including partial input failure
//! and concurrent stress across worker counts and merge strategies.

mod common;

use std::io::{self, Cursor, Read};

use common::*;
use measurements_core::{
    aggregate_file, aggregate_reader, format_aggregate, AggregationError, InputSource,
    MergeStrategy, PipelineConfig, PipelineCoordinator, PipelineState,
};

fn config(workers: usize, batch_size: usize) -> PipelineConfig {
    PipelineConfig::for_workers(workers)
        .with_batch_size(batch_size)
        .with_malformed_logging(false)
}

#[test]
fn test_file_round_trip_matches_reference() {
    let lines = MeasurementGenerator::new(42).lines(25_000);
    let file = write_measurements_file(&lines);

    let outcome = aggregate_file(file.path(), config(4, 1_000)).unwrap();

    assert!(outcome.warning.is_none());
    assert_eq!(outcome.report.lines_read, 25_000);
    assert_eq!(outcome.report.batches, 25);
    assert_eq!(outcome.report.records_aggregated, 25_000);
    assert_eq!(outcome.aggregate.total_count(), 25_000);
    assert_matches_reference(&outcome.aggregate, &reference_aggregate(&lines));
}

#[test]
fn test_rendered_output_for_readme_example() {
    let input = "Hamburg;12.0\nHamburg;14.0\nBulawayo;8.0\n";
    let outcome = aggregate_reader(Cursor::new(input), config(2, 10_000)).unwrap();

    assert_eq!(
        format_aggregate(&outcome.aggregate),
        "{Bulawayo=8.0/8.0/8.0, Hamburg=12.0/13.0/14.0}"
    );
}

#[test]
fn test_single_record() {
    let outcome = aggregate_reader(Cursor::new("K;-3.7\n"), config(3, 16)).unwrap();

    let summary = outcome.aggregate.get("K").unwrap();
    assert_eq!(summary.min(), -3.7);
    assert_eq!(summary.max(), -3.7);
    assert_eq!(summary.sum(), -3.7);
    assert_eq!(summary.count(), 1);
}

#[test]
fn test_malformed_lines_are_skipped() {
    let input = "Oslo;4.0\nno-delimiter\nOslo;1.0;2.0\n\nOslo;warm\n";
    let outcome = aggregate_reader(Cursor::new(input), config(2, 2)).unwrap();

    assert_eq!(outcome.aggregate.len(), 1);
    let oslo = outcome.aggregate.get("Oslo").unwrap();
    assert_eq!(oslo.count(), 1);
    assert_eq!(oslo.mean(), 4.0);

    assert_eq!(outcome.report.lines_read, 5);
    assert_eq!(outcome.report.records_aggregated, 1);
    assert_eq!(outcome.report.malformed_records, 4);
}

#[test]
fn test_empty_input_completes_with_empty_aggregate() {
    let coordinator = PipelineCoordinator::new(config(4, 8)).unwrap();
    let outcome = coordinator
        .run(InputSource::reader("empty", io::empty()))
        .unwrap();

    assert!(outcome.aggregate.is_empty());
    assert_eq!(outcome.report.batches, 0);
    assert_eq!(coordinator.state(), PipelineState::Completed);
}

#[test]
fn test_missing_file_is_input_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let coordinator = PipelineCoordinator::new(config(2, 8)).unwrap();

    let err = coordinator
        .run(InputSource::path(dir.path().join("absent.txt")))
        .unwrap_err();

    assert!(matches!(err, AggregationError::InputUnavailable { .. }));
    assert_eq!(coordinator.state(), PipelineState::Failed);
}

#[test]
fn test_invalid_utf8_line_is_skipped_and_input_continues() {
    let mut data = b"Hamburg;12.0\n\xffBad;1.0\n".to_vec();
    for _ in 0..1_000 {
        data.extend_from_slice(b"Oslo;3.0\n");
    }

    let outcome = aggregate_reader(Cursor::new(data), config(2, 64)).unwrap();

    assert!(outcome.warning.is_none());
    assert_eq!(outcome.report.lines_read, 1_002);
    assert_eq!(outcome.report.malformed_records, 1);
    assert_eq!(outcome.aggregate.len(), 2);
    assert_eq!(outcome.aggregate.get("Hamburg").unwrap().count(), 1);
    assert_eq!(outcome.aggregate.get("Oslo").unwrap().count(), 1_000);
}

/// Yields its data, then fails instead of reporting end of stream
struct TruncatedReader {
    data: Cursor<Vec<u8>>,
}

impl Read for TruncatedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream reset")),
            n => Ok(n),
        }
    }
}

#[test]
fn test_mid_stream_failure_returns_partial_aggregate() {
    let lines = MeasurementGenerator::new(7).lines(5_000);
    let mut data = lines.join("\n").into_bytes();
    data.push(b'\n');

    let outcome = aggregate_reader(
        TruncatedReader {
            data: Cursor::new(data),
        },
        config(3, 100).with_queue_depth(2),
    )
    .unwrap();

    assert!(outcome.is_partial());
    assert!(matches!(
        outcome.warning,
        Some(AggregationError::InputReadFailure { lines_read: 5_000, .. })
    ));
    // every batch produced before the failure was still aggregated
    assert_matches_reference(&outcome.aggregate, &reference_aggregate(&lines));

    let err = outcome.into_complete().unwrap_err();
    assert!(!err.is_fatal());
}

#[test]
fn test_concurrent_stress_across_shapes() {
    const KEYS: usize = 50;
    const VALUES_PER_KEY: usize = 400;

    let mut lines = Vec::with_capacity(KEYS * VALUES_PER_KEY);
    for value in 0..VALUES_PER_KEY {
        for key in 0..KEYS {
            lines.push(format!("station-{key};{}.{}", value % 100, key % 10));
        }
    }
    let data = lines.join("\n");

    for workers in [2, 4, 8] {
        for strategy in [MergeStrategy::Sharded, MergeStrategy::Locked] {
            let outcome = aggregate_reader(
                Cursor::new(data.clone()),
                config(workers, 37)
                    .with_queue_depth(workers)
                    .with_merge_strategy(strategy),
            )
            .unwrap();

            assert_eq!(outcome.aggregate.len(), KEYS);
            for key in 0..KEYS {
                let summary = outcome.aggregate.get(&format!("station-{key}")).unwrap();
                let min: f64 = format!("0.{}", key % 10).parse().unwrap();
                let max: f64 = format!("99.{}", key % 10).parse().unwrap();
                assert_eq!(summary.count(), VALUES_PER_KEY as u64, "{strategy} / {workers}");
                assert_eq!(summary.min(), min);
                assert_eq!(summary.max(), max);
            }
        }
    }
}

#[test]
fn test_worker_count_does_not_change_result() {
    let lines = MeasurementGenerator::new(99).lines(12_345);
    let file = write_measurements_file(&lines);

    let single = aggregate_file(file.path(), config(1, 500)).unwrap().aggregate;
    for workers in [2, 5, 16] {
        let parallel = aggregate_file(file.path(), config(workers, 123)).unwrap().aggregate;
        assert_eq!(single.len(), parallel.len());
        for (key, summary) in &single {
            assert_summary_close(parallel.get(key).unwrap(), summary);
        }
    }
}

#[test]
fn test_run_report_accounts_for_every_line() {
    let mut lines = MeasurementGenerator::new(3).lines(1_000);
    lines.insert(10, "garbage".to_string());
    lines.insert(500, "a;b;c".to_string());
    let file = write_measurements_file(&lines);

    let outcome = aggregate_file(file.path(), config(4, 64).with_flush_interval_batches(3)).unwrap();
    let report = &outcome.report;

    assert_eq!(report.lines_read, 1_002);
    assert_eq!(report.records_aggregated + report.malformed_records, report.lines_read);
    assert_eq!(report.malformed_records, 2);
    assert_eq!(
        report.workers.iter().map(|w| w.batches_processed).sum::<u64>(),
        report.batches
    );
    assert_eq!(report.distinct_keys, outcome.aggregate.len());

    let json = serde_json::to_value(report).unwrap();
    assert_eq!(json["lines_read"], 1_002);
    assert_eq!(json["merge_strategy"], "sharded");
}
