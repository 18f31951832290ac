//! Benchmarks for the lookahead scheduling pass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tunebox::audio::offline::OfflineAudio;
use tunebox::engine::{EngineConfig, Player};

/// Notes short enough that one pass commits several per track.
fn populate(player: &mut Player, tracks: usize) {
    for track in 0..tracks {
        if track > 0 {
            player.new_track();
        }
        for _ in 0..4 {
            player.add_note("A", 0.01);
            player.add_note("C", 0.01);
            player.add_note("E", 0.01);
            player.add_rest(0.01);
        }
    }
}

pub fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/tick");

    for &tracks in &[1usize, 4, 16] {
        let audio = OfflineAudio::new(48_000.0);
        let mut player = Player::new(audio.context(), EngineConfig::default());
        populate(&mut player, tracks);

        // Rewinding before each pass makes every iteration fill the whole
        // lookahead window from scratch.
        group.bench_with_input(BenchmarkId::new("window_fill", tracks), &tracks, |b, _| {
            b.iter(|| {
                let player = black_box(&mut player);
                player.reset();
                player.play();
                player.tick().unwrap();
            })
        });

        // Steady state: the window is already full, nothing new commits.
        player.reset();
        player.play();
        player.tick().unwrap();
        group.bench_with_input(BenchmarkId::new("steady", tracks), &tracks, |b, _| {
            b.iter(|| black_box(&mut player).tick().unwrap())
        });
    }

    group.finish();
}
