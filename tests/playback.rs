use tunebox::audio::offline::OfflineAudio;
use tunebox::engine::{EngineConfig, PlayState, Player};

const RATE: f32 = 1000.0;

fn rms(block: &[f32]) -> f32 {
    let power: f32 = block.iter().map(|s| s * s).sum();
    (power / block.len() as f32).sqrt()
}

/// Drive the player the way the conductor would: one scheduling pass, then
/// one tick's worth of rendered audio, repeated. Rendered samples append to
/// `out`, so sample index i is playback time i / RATE.
fn run_for(audio: &OfflineAudio, player: &mut Player, seconds: f64, out: &mut Vec<f32>) {
    let tick = player.config().tick.as_secs_f64();
    let samples_per_tick = (tick * f64::from(RATE)).round() as usize;
    let steps = (seconds / tick).round() as usize;
    let mut block = vec![0.0; samples_per_tick];
    for _ in 0..steps {
        player.tick().unwrap();
        audio.render(&mut block);
        out.extend_from_slice(&block);
    }
}

#[test]
fn plays_the_reference_melody_on_schedule() {
    let audio = OfflineAudio::new(RATE);
    let mut player = Player::new(audio.context(), EngineConfig::default());

    // Quarter, quarter rest, half. At the default 108 BPM the quarter is
    // 0.5556 s and the half 1.1111 s.
    player.add_note("A", "q");
    player.add_rest("q");
    player.add_note("C", "h");

    let track = player.selected_track().unwrap();
    assert!((player.track_duration(track) - 2.2222).abs() < 1e-3);

    player.play();
    let mut rendered = Vec::new();
    run_for(&audio, &mut player, 2.8, &mut rendered);

    // Mid-A: past the attack, before the release.
    assert!(rms(&rendered[150..250]) > 0.5, "A is sounding");
    // Mid-rest: A has released, C has not started.
    assert!(rendered[650..1050].iter().all(|s| *s == 0.0), "rest is silent");
    // Mid-C: the half note holds from 1.1111 s.
    assert!(rms(&rendered[1400..1600]) > 0.5, "C is sounding");
    // Past one full pass the track has wrapped and A sounds again.
    assert!(rms(&rendered[2350..2500]) > 0.5, "loop restarts with A");
}

#[test]
fn reset_goes_silent_and_restarts_from_the_top() {
    let audio = OfflineAudio::new(RATE);
    let mut player = Player::new(audio.context(), EngineConfig::default());
    player.add_note("A", 1.0);
    player.play();

    let mut rendered = Vec::new();
    run_for(&audio, &mut player, 0.3, &mut rendered);
    assert!(rms(&rendered[220..300]) > 0.5, "note is sounding before reset");

    player.reset();
    assert_eq!(player.state(), PlayState::Stopped);
    assert_eq!(player.position(), 0.0);

    // Suspended: output is silence and the clock holds.
    let mut block = vec![0.0; 100];
    audio.render(&mut block);
    assert!(block.iter().all(|s| *s == 0.0));
    assert!((audio.now() - 0.3).abs() < 1e-9);

    // Restart plays the note from its beginning at the new origin.
    player.play();
    let mut restarted = Vec::new();
    run_for(&audio, &mut player, 1.0, &mut restarted);
    assert!(rms(&restarted[50..150]) < 0.45, "attack rebuilds from silence");
    assert!(rms(&restarted[250..450]) > 0.5, "note sustains again");
}

#[test]
fn pause_holds_the_clock_and_resume_finishes_the_note() {
    let audio = OfflineAudio::new(RATE);
    let mut player = Player::new(audio.context(), EngineConfig::default());
    player.add_note("A", 1.0);
    player.play();

    let mut rendered = Vec::new();
    run_for(&audio, &mut player, 0.4, &mut rendered);

    player.pause();
    let mut block = vec![0.0; 200];
    audio.render(&mut block);
    assert!(block.iter().all(|s| *s == 0.0), "paused output is silence");
    assert!((audio.now() - 0.4).abs() < 1e-9, "paused clock holds");
    assert!((player.position() - 0.4).abs() < 1e-9);

    // Resume picks up mid-note; nothing re-triggers.
    player.play();
    run_for(&audio, &mut player, 0.4, &mut rendered);
    assert!(rms(&rendered[420..500]) > 0.5, "sustain continues");
    assert!(rms(&rendered[760..800]) < 0.45, "release still lands at 1 s");
}

#[test]
fn mute_silences_without_stopping_the_schedule() {
    let audio = OfflineAudio::new(RATE);
    let mut player = Player::new(audio.context(), EngineConfig::default());
    player.add_note("A", 1.0);
    player.play();

    let mut rendered = Vec::new();
    run_for(&audio, &mut player, 0.3, &mut rendered);
    assert!(rms(&rendered[220..300]) > 0.5);

    player.mute();
    let before = rendered.len();
    run_for(&audio, &mut player, 0.3, &mut rendered);
    assert!(rendered[before..].iter().all(|s| *s == 0.0), "muted output");

    // The note kept its place on the clock while muted.
    player.unmute();
    run_for(&audio, &mut player, 0.2, &mut rendered);
    assert!(rms(&rendered[600..800]) > 0.2, "release tail is audible");
    assert!((player.position() - 0.8).abs() < 1e-9);
}

#[test]
fn unresolved_tones_fail_at_schedule_time_not_authoring_time() {
    let audio = OfflineAudio::new(RATE);
    let mut player = Player::new(audio.context(), EngineConfig::default());

    // Authoring accepts the bad spelling; playback reports it.
    player.add_note("X?", "q");
    player.play();

    let err = player.tick().unwrap_err();
    assert!(err.to_string().contains("X?"));
    assert_eq!(player.state(), PlayState::Playing);
}

#[test]
fn tracks_loop_independently_at_their_own_lengths() {
    let audio = OfflineAudio::new(RATE);
    let mut player = Player::new(audio.context(), EngineConfig::default());

    // One-second loop against a half-second loop.
    player.add_note("A", 1.0);
    let short = player.new_track();
    player.add_note("E", 0.5);
    assert_eq!(player.track_duration(short), 0.5);

    player.play();
    let mut rendered = Vec::new();
    run_for(&audio, &mut player, 2.0, &mut rendered);
    assert_eq!(rendered.len(), 2000);

    // Deep into the second pass of the long loop both tracks are mid-note
    // again; the mix stays loud and inside the clamp.
    assert!(rms(&rendered[1250..1450]) > 0.5);
    assert!(rendered.iter().all(|s| s.abs() <= 1.0));
}
