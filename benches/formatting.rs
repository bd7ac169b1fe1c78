//! Benchmarks for indentation normalization.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pseudopad::format::format_pseudocode;
use pseudopad::indent::IndentUnit;

fn bench_format_fixture(c: &mut Criterion) {
    let text = include_str!("../tests/fixtures/algorithms.txt");
    let unit = IndentUnit::new(4);
    c.bench_function("format_fixture", |b| {
        b.iter(|| format_pseudocode(black_box(text), &unit))
    });
}

fn bench_format_large(c: &mut Criterion) {
    let text = include_str!("../tests/fixtures/algorithms.txt").repeat(50);
    let unit = IndentUnit::new(4);
    c.bench_function("format_large", |b| {
        b.iter(|| format_pseudocode(black_box(&text), &unit))
    });
}

criterion_group!(benches, bench_format_fixture, bench_format_large);
criterion_main!(benches);
