//! tunebox - terminal player for the scheduling engine
//!
//! Run with: cargo run

mod ui;

use color_eyre::eyre::WrapErr;
use tunebox::audio::output::{open_output, OutputConfig};
use tunebox::engine::{Conductor, EngineConfig, Player};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let (_stream, handle, scope) =
        open_output(&OutputConfig::default()).wrap_err("failed to open audio output")?;
    let sample_rate = handle.sample_rate();

    let mut player = Player::new(Box::new(handle), EngineConfig::default());

    // Melody on track zero. The Eb lands on the same generator as D#.
    player.add_note("E", "e");
    player.add_note("D", "e");
    player.add_note("C", "q");
    player.add_note("E", "e");
    player.add_note("D", "e");
    player.add_note("C", "q");
    player.add_rest("e");
    player.add_note("Eb", "e.");
    player.add_note("E", "q.");
    player.add_rest("q");
    player.add_rest("s");

    // Bass from pentatonic numbers, padded to the same loop length.
    player.new_track();
    player.add_note(-5, "h");
    player.add_note(-7, "h");
    player.add_note(-5, "f");

    player.set_volume(0.8);
    player.play();

    let conductor = Conductor::spawn(player);

    let mut terminal = ratatui::init();
    let result = ui::UiApp::new(conductor.player(), scope, sample_rate).run(&mut terminal);
    ratatui::restore();
    conductor.shutdown();
    result
}
