//! # Test Utilities
//!
//! Deterministic measurement generation and reference aggregation shared by
//! the integration and property tests.

#![allow(dead_code)]

pub mod strategies;

use std::collections::HashMap;
use std::io::Write;

use measurements_core::{AggregateMap, Summary};
use tempfile::NamedTempFile;

pub const STATIONS: &[&str] = &[
    "Abha",
    "Abidjan",
    "Bulawayo",
    "Hamburg",
    "İzmir",
    "Kraków",
    "La Ceiba",
    "Petropavlovsk-Kamchatsky",
    "St. John's",
    "Tromsø",
    "Zürich",
];

pub const FLOAT_TOLERANCE: f64 = 1e-9;

/// Small linear congruential generator so fixtures are reproducible
pub struct MeasurementGenerator {
    state: u64,
}

impl MeasurementGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state >> 33
    }

    /// One `<station>;<value>` line with a value in [-99.9, 99.9]
    pub fn next_line(&mut self) -> String {
        let station = STATIONS[(self.next_u64() as usize) % STATIONS.len()];
        let tenths = (self.next_u64() % 1999) as i64 - 999;
        format!("{station};{:.1}", tenths as f64 / 10.0)
    }

    pub fn lines(&mut self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.next_line()).collect()
    }
}

/// Write lines to a temporary file, newline-terminated
pub fn write_measurements_file<S: AsRef<str>>(lines: &[S]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    for line in lines {
        writeln!(file, "{}", line.as_ref()).expect("write measurement");
    }
    file.flush().expect("flush measurements");
    file
}

/// Sequential single-threaded reference aggregation
pub fn reference_aggregate<S: AsRef<str>>(lines: &[S]) -> HashMap<String, Summary> {
    let mut expected: HashMap<String, Summary> = HashMap::new();
    for line in lines {
        if let Ok(record) = measurements_core::parse_record(line.as_ref()) {
            expected
                .entry(record.key.to_string())
                .and_modify(|s| s.observe(record.value))
                .or_insert_with(|| Summary::from_value(record.value));
        }
    }
    expected
}

pub fn assert_summary_close(actual: &Summary, expected: &Summary) {
    assert_eq!(actual.count(), expected.count());
    assert_eq!(actual.min(), expected.min());
    assert_eq!(actual.max(), expected.max());
    assert!(
        (actual.sum() - expected.sum()).abs() <= FLOAT_TOLERANCE * expected.count() as f64 * 100.0,
        "sum {} differs from {}",
        actual.sum(),
        expected.sum()
    );
}

pub fn assert_matches_reference(actual: &AggregateMap, expected: &HashMap<String, Summary>) {
    assert_eq!(actual.len(), expected.len(), "distinct key count");
    for (key, expected_summary) in expected {
        let actual_summary = actual
            .get(key)
            .unwrap_or_else(|| panic!("missing key {key}"));
        assert_summary_close(actual_summary, expected_summary);
    }
}
