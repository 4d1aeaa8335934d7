use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use report_engine::{BandContext, BandKind, BandSink, Record, Report};

/// Sink that swallows every band, so timings isolate the engine pass.
struct NullSink;

impl BandSink for NullSink {
    fn render_band(&mut self, _kind: BandKind, _level: Option<usize>, _context: BandContext<'_>) {}

    fn output(&mut self) -> String {
        String::new()
    }
}

fn create_sales_records(count: usize) -> Vec<Record> {
    // 12 months x 4 categories per year, pre-sorted the way the engine
    // expects its input.
    (0..count)
        .map(|i| {
            Record::new()
                .with("year", 2020 + (i / 480) as i64)
                .with("month", format!("M{:02}", (i / 40) % 12))
                .with("category", format!("C{}", (i / 10) % 4))
                .with("amount", 10.0 + (i % 97) as f64)
        })
        .collect()
}

fn two_level_report() -> Report {
    Report::builder()
        .group_by("year")
        .sum("amount", "yearTotal")
        .group_by("month")
        .sum("amount", "monthTotal")
        .count("monthItems")
        .build()
        .unwrap()
}

fn three_level_report() -> Report {
    Report::builder()
        .group_by("year")
        .sum("amount", "yearTotal")
        .group_by("month")
        .sum("amount", "monthTotal")
        .group_by("category")
        .sum("amount", "categoryTotal")
        .avg("amount", "categoryAvg")
        .build()
        .unwrap()
}

fn bench_two_level_pass(c: &mut Criterion) {
    let report = two_level_report();
    let mut group = c.benchmark_group("two_level_pass");

    for size in [1_000, 10_000].iter() {
        let records = create_sales_records(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter_batched(
                || records.clone(),
                |records| {
                    let mut sink = NullSink;
                    report.run_records(black_box(records), &mut sink);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_three_level_pass(c: &mut Criterion) {
    let report = three_level_report();
    let mut group = c.benchmark_group("three_level_pass");

    for size in [1_000, 10_000].iter() {
        let records = create_sales_records(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter_batched(
                || records.clone(),
                |records| {
                    let mut sink = NullSink;
                    report.run_records(black_box(records), &mut sink);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_two_level_pass, bench_three_level_pass);
criterion_main!(benches);
