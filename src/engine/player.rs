//! The audio player: authoring calls, transport, and the tick entry point.

use std::time::Duration;

use crate::engine::backend::PlaybackContext;
use crate::engine::scheduler::{self, ScheduleError};
use crate::music::duration::{DurationSpec, Tempo};
use crate::music::tone::{Tone, ToneSpec};
use crate::track::{Note, Track, TrackId};

/// Timing knobs, fixed for the life of a player.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Wall-clock interval between scheduling passes.
    pub tick: Duration,
    /// How far ahead of the playback clock each pass commits notes. Must
    /// comfortably exceed the tick interval or late ticks become audible.
    pub lookahead: Duration,
    /// Playback tempo; durations authored as codes resolve against this.
    pub tempo: Tempo,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(50),
            lookahead: Duration::from_millis(80),
            tempo: Tempo::default(),
        }
    }
}

/// Transport states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
    Paused,
}

/// A self-contained playback engine: tracks, transport, and mix state over
/// one audio backend.
///
/// Everything is an explicit method call on a player value; there is no
/// ambient current player or current track. Two writer roles share the
/// struct and never overlap: [`Player::tick`] is the only thing that moves
/// track cursors and target times, and the transport methods are the only
/// things that change the play state.
pub struct Player {
    ctx: Box<dyn PlaybackContext>,
    config: EngineConfig,
    tracks: Vec<Track>,
    selected: usize,
    state: PlayState,
    origin: Option<f64>,
    volume: f32,
    muted: bool,
}

impl Player {
    /// Create a player over an audio backend. No tracks exist yet; the
    /// first authoring call creates track 0.
    pub fn new(mut ctx: Box<dyn PlaybackContext>, config: EngineConfig) -> Self {
        ctx.set_master_gain(1.0);
        Self {
            ctx,
            config,
            tracks: Vec::new(),
            selected: 0,
            state: PlayState::Stopped,
            origin: None,
            volume: 1.0,
            muted: false,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    // --- authoring ---

    /// Append a note to the selected track.
    ///
    /// Both specs resolve immediately: the tone to a pool pitch, the
    /// duration to seconds at the player's tempo. Problems are logged and
    /// recovered; a spelling that resolves to nothing is kept and will fail
    /// loudly when the scheduler reaches it.
    pub fn add_note(&mut self, tone: impl Into<ToneSpec>, duration: impl Into<DurationSpec>) {
        let tone = self.resolve_tone(tone.into());
        let seconds = self.resolve_duration(duration.into());
        self.selected_track_mut().push(Note { tone, seconds });
    }

    /// Append silence to the selected track.
    pub fn add_rest(&mut self, duration: impl Into<DurationSpec>) {
        let seconds = self.resolve_duration(duration.into());
        self.selected_track_mut().push(Note {
            tone: Tone::Rest,
            seconds,
        });
    }

    /// Create an empty track, select it, and return its handle.
    pub fn new_track(&mut self) -> TrackId {
        let bank = self.ctx.create_bank();
        self.tracks.push(Track::new(bank));
        self.selected = self.tracks.len() - 1;
        TrackId(self.selected)
    }

    /// Point subsequent authoring calls at `track`. Unknown handles are
    /// logged and ignored.
    pub fn select_track(&mut self, track: TrackId) {
        if track.index() < self.tracks.len() {
            self.selected = track.index();
        } else {
            log::warn!("select_track: no track {}", track.index());
        }
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Handles of every track, in creation order.
    pub fn track_ids(&self) -> impl ExactSizeIterator<Item = TrackId> + '_ {
        (0..self.tracks.len()).map(TrackId)
    }

    /// Seconds of one full pass through the track. Unknown handles are
    /// logged and report 0.
    pub fn track_duration(&self, track: TrackId) -> f64 {
        match self.tracks.get(track.index()) {
            Some(track) => track.total_seconds(),
            None => {
                log::warn!("track_duration: no track {}", track.index());
                0.0
            }
        }
    }

    /// The track currently receiving authoring calls, if any exist.
    pub fn selected_track(&self) -> Option<TrackId> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(TrackId(self.selected))
        }
    }

    pub fn track(&self, track: TrackId) -> Option<&Track> {
        self.tracks.get(track.index())
    }

    fn selected_track_mut(&mut self) -> &mut Track {
        if self.tracks.is_empty() {
            self.new_track();
        }
        &mut self.tracks[self.selected]
    }

    fn resolve_tone(&self, spec: ToneSpec) -> Tone {
        let resolved = spec.resolve();
        for warning in &resolved.warnings {
            log::warn!("{warning}");
        }
        resolved.value
    }

    fn resolve_duration(&self, spec: DurationSpec) -> f64 {
        let resolved = spec.resolve(self.config.tempo);
        for warning in &resolved.warnings {
            log::warn!("{warning}");
        }
        resolved.value
    }

    // --- transport ---

    /// Start playback, or resume it where pause left it.
    pub fn play(&mut self) {
        match self.state {
            PlayState::Playing => {}
            PlayState::Paused => {
                self.ctx.resume();
                self.state = PlayState::Playing;
            }
            PlayState::Stopped => {
                self.origin = Some(self.ctx.now());
                self.ctx.resume();
                self.state = PlayState::Playing;
            }
        }
    }

    /// Freeze playback in place. Notes already committed keep their clock
    /// times and finish after resume.
    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.ctx.suspend();
            self.state = PlayState::Paused;
        }
    }

    pub fn toggle_play(&mut self) {
        if self.state == PlayState::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Stop and rewind every track, dropping everything already committed.
    /// Safe to call in any state and repeatedly; the next play starts clean
    /// from the top of every track.
    pub fn reset(&mut self) {
        self.ctx.suspend();
        for track in &mut self.tracks {
            track.rewind();
            track.bank.cancel_scheduled();
        }
        self.origin = None;
        self.state = PlayState::Stopped;
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Seconds since playback started, by the playback clock. Frozen while
    /// paused, zero when stopped.
    pub fn position(&self) -> f64 {
        match self.origin {
            Some(origin) => self.ctx.now() - origin,
            None => 0.0,
        }
    }

    // --- mix ---

    /// Master volume in [0, 1], applied immediately. While muted only the
    /// remembered value changes; unmute applies it.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if !self.muted {
            self.ctx.set_master_gain(self.volume);
        }
    }

    /// Silence the output, remembering the current volume.
    pub fn mute(&mut self) {
        if !self.muted {
            self.muted = true;
            self.ctx.set_master_gain(0.0);
        }
    }

    /// Restore the volume remembered at mute time.
    pub fn unmute(&mut self) {
        if self.muted {
            self.muted = false;
            self.ctx.set_master_gain(self.volume);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    // --- scheduling ---

    /// One scheduling pass: commit everything due inside the lookahead
    /// window. Called by the tick driver; a no-op unless playing.
    ///
    /// Every track gets its pass before the first unresolved-tone error is
    /// returned, so one bad track cannot silence the others.
    pub fn tick(&mut self) -> Result<(), ScheduleError> {
        if self.state != PlayState::Playing {
            return Ok(());
        }

        let now = self.ctx.now();
        let lookahead = self.config.lookahead.as_secs_f64();
        let mut first_error = None;

        for (index, track) in self.tracks.iter_mut().enumerate() {
            let result = scheduler::schedule_track(TrackId(index), track, now, lookahead);
            if let Err(err) = result {
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
