//! Benchmarks for synth bank rendering.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tunebox::audio::SynthBank;
use tunebox::music::tone::POOL_SLOTS;

use crate::BLOCK_SIZES;

fn hold(bank: &mut SynthBank, slots: impl IntoIterator<Item = usize>) {
    for slot in slots {
        if let Some(line) = bank.gain_line_mut(slot) {
            line.set_at(1.0, 0.0);
        }
    }
}

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/render");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Idle - every slot silent, phases skip
        let mut idle = SynthBank::new(48_000.0);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| idle.render(black_box(&mut buffer), black_box(0.0)))
        });

        // A plausible chord
        let mut chord = SynthBank::new(48_000.0);
        hold(&mut chord, [24, 27, 28, 31]);
        group.bench_with_input(BenchmarkId::new("four_notes", size), &size, |b, _| {
            b.iter(|| chord.render(black_box(&mut buffer), black_box(0.0)))
        });

        // Worst case - the whole pool sounding at once
        let mut full = SynthBank::new(48_000.0);
        hold(&mut full, 0..POOL_SLOTS);
        group.bench_with_input(BenchmarkId::new("full_pool", size), &size, |b, _| {
            b.iter(|| full.render(black_box(&mut buffer), black_box(0.0)))
        });
    }

    group.finish();
}
