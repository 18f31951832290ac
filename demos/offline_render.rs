//! Renders the reference melody without touching an audio device and prints
//! a level trace, one row per quarter second.
//!
//! Run with: cargo run --example offline_render

use tunebox::audio::offline::OfflineAudio;
use tunebox::engine::{EngineConfig, Player};

fn main() {
    let sample_rate = 48_000.0f32;
    let audio = OfflineAudio::new(sample_rate);
    let mut player = Player::new(audio.context(), EngineConfig::default());

    let melody = player.new_track();
    player.add_note("A", "q");
    player.add_rest("q");
    player.add_note("C", "h");

    println!(
        "one pass is {:.4} s at {:.0} BPM\n",
        player.track_duration(melody),
        player.config().tempo.0
    );

    player.play();

    // Alternate scheduling passes with tick-sized render blocks, the same
    // cadence the conductor would drive.
    let tick = player.config().tick.as_secs_f64();
    let mut block = vec![0.0f32; (tick * f64::from(sample_rate)).round() as usize];
    let mut rendered = Vec::new();
    let steps = (2.5 / tick).round() as usize;
    for _ in 0..steps {
        if let Err(err) = player.tick() {
            eprintln!("schedule failed: {err}");
            return;
        }
        audio.render(&mut block);
        rendered.extend_from_slice(&block);
    }

    let window = (f64::from(sample_rate) * 0.25) as usize;
    for (i, chunk) in rendered.chunks(window).enumerate() {
        let power: f32 = chunk.iter().map(|s| s * s).sum();
        let rms = (power / chunk.len() as f32).sqrt();
        let bar = "#".repeat((rms * 40.0) as usize);
        println!("{:5.2}s  rms {:.3}  {}", i as f64 * 0.25, rms, bar);
    }
}
