use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use measurements_core::{aggregate_reader, parse_record, MergeStrategy, PipelineConfig};

const STATIONS: &[&str] = &["Hamburg", "Bulawayo", "Palembang", "St. John's", "Cracow"];

fn synthetic_input(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            let tenths = (i * 7919 % 1999) as i64 - 999;
            format!("{};{:.1}\n", STATIONS[i % STATIONS.len()], tenths as f64 / 10.0)
        })
        .collect()
}

fn benchmark_parse_record(c: &mut Criterion) {
    c.bench_function("parse_record", |b| {
        b.iter(|| parse_record(black_box("Petropavlovsk-Kamchatsky;-12.3")))
    });
}

fn benchmark_pipeline(c: &mut Criterion) {
    let input = synthetic_input(200_000);

    for strategy in [MergeStrategy::Sharded, MergeStrategy::Locked] {
        c.bench_function(&format!("pipeline_200k_{strategy}"), |b| {
            b.iter(|| {
                let config = PipelineConfig::default()
                    .with_merge_strategy(strategy)
                    .with_malformed_logging(false);
                aggregate_reader(Cursor::new(input.clone()), config)
            })
        });
    }
}

criterion_group!(benches, benchmark_parse_record, benchmark_pipeline);
criterion_main!(benches);
