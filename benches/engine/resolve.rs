//! Benchmarks for tone and duration resolution.

use std::hint::black_box;

use criterion::Criterion;
use tunebox::music::duration::{DurationSpec, Tempo};
use tunebox::music::tone::ToneSpec;

pub fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/resolve");
    let tempo = Tempo::default();

    // Dotted code - lookup plus modifier scan
    let code = DurationSpec::from("q.");
    group.bench_function("duration_code", |b| {
        b.iter(|| black_box(&code).resolve(black_box(tempo)))
    });

    // Flat spelling - normalizes through semitone arithmetic
    let name = ToneSpec::from("Eb+");
    group.bench_function("tone_name", |b| b.iter(|| black_box(&name).resolve()));

    // Scale number - pure index math
    let pentatonic = ToneSpec::from(-7);
    group.bench_function("tone_pentatonic", |b| {
        b.iter(|| black_box(&pentatonic).resolve())
    });

    group.finish();
}
