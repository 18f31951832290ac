//! A first song in both spellings: letter names on the melody, pentatonic
//! numbers on the bass.
//!
//! Run with: cargo run --example first_song

use std::thread;
use std::time::Duration;

use color_eyre::eyre::WrapErr;
use tunebox::audio::output::{open_output, OutputConfig};
use tunebox::engine::{Conductor, EngineConfig, Player};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let (_stream, handle, _scope) =
        open_output(&OutputConfig::default()).wrap_err("failed to open audio output")?;
    let mut player = Player::new(Box::new(handle), EngineConfig::default());

    // Four quarters walking up to G.
    let melody = player.new_track();
    player.add_note("C", "q");
    player.add_note("D", "q");
    player.add_note("E", "q");
    player.add_note("G", "q");

    // The same loop length from one pentatonic number: -4 is C one octave
    // down, held for a full note.
    let bass = player.new_track();
    player.add_note(-4, "f");

    println!(
        "melody loops every {:.3} s, bass every {:.3} s",
        player.track_duration(melody),
        player.track_duration(bass)
    );

    player.set_volume(0.8);
    player.play();
    let conductor = Conductor::spawn(player);

    println!("playing two passes...");
    thread::sleep(Duration::from_millis(4500));

    conductor.shutdown();
    Ok(())
}
