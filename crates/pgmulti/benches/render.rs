use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgmulti::{MultiInserter, params};

/// Build an inserter over `t (a,b,c,d)` with `n` rows.
fn build_inserter(n: usize) -> MultiInserter {
    let mut inserter =
        MultiInserter::with_capacity("t", "a,b,c,d", Some("id"), n).expect("valid inserter");
    for i in 0..n as i64 {
        inserter
            .add(params![i, i + 1, format!("row{i}"), i % 2 == 0])
            .expect("four values");
    }
    inserter
}

fn bench_to_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_insert/to_sql");

    for n in [1, 10, 100, 1000] {
        let inserter = build_inserter(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &inserter, |b, inserter| {
            b.iter(|| black_box(inserter.to_sql()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_insert/build_and_render");

    for n in [1, 10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let inserter = build_inserter(n);
                black_box(inserter.to_sql());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_to_sql, bench_build_and_render);
criterion_main!(benches);
