//! The lookahead pass: turn upcoming notes into committed gain envelopes.
//!
//! Wall-clock timers jitter by milliseconds, which is audible if notes
//! start the moment a timer fires. So the tick does not play anything
//! itself; it only tops up the real-time domain with events stamped at
//! absolute clock seconds, slightly ahead of the playback clock. Each pass
//! walks a track from its target time and commits every note that starts
//! inside the lookahead window, leaving the target time parked on the first
//! uncommitted note. A late tick changes nothing: the already-committed
//! events play themselves, and the next pass continues from the same
//! target time.

use std::fmt;

use crate::engine::backend::ToneBank;
use crate::music::tone::Tone;
use crate::track::{Track, TrackId};

/// Fraction of a note spent ramping up from silence.
pub const ATTACK_FRACTION: f64 = 0.2;

/// Fraction of a note held at full level after the attack; the release
/// ramp fills the remainder.
pub const SUSTAIN_FRACTION: f64 = 0.3;

/// A tone that reached the scheduler without resolving to a pool slot.
///
/// The pass over the offending track aborts with its target time parked on
/// the bad note, so the error repeats every tick until the track is fixed
/// or reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleError {
    /// The spelling as authored.
    pub spec: String,
    /// The track carrying the note.
    pub track: TrackId,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tone {:?} on track {} does not name a pool pitch",
            self.spec,
            self.track.index()
        )
    }
}

impl std::error::Error for ScheduleError {}

/// Commit every note of `track` that starts before `now + lookahead`.
///
/// A track with nothing playable (no notes, or notes that sum to zero
/// seconds and could never advance the clock) is left untouched.
pub(crate) fn schedule_track(
    id: TrackId,
    track: &mut Track,
    now: f64,
    lookahead: f64,
) -> Result<(), ScheduleError> {
    if track.notes.is_empty() || track.total_seconds() <= 0.0 {
        return Ok(());
    }

    let horizon = now + lookahead;
    let mut target = track.target_time.unwrap_or(now);

    while target < horizon {
        let note = &track.notes[track.cursor];
        match &note.tone {
            Tone::Rest => {}
            Tone::Pitch(key) => {
                commit_envelope(track.bank.as_mut(), key.slot(), target, note.seconds);
            }
            Tone::Unresolved(spec) => {
                track.target_time = Some(target);
                return Err(ScheduleError {
                    spec: spec.clone(),
                    track: id,
                });
            }
        }
        target += note.seconds;
        track.cursor = (track.cursor + 1) % track.notes.len();
    }

    track.target_time = Some(target);
    Ok(())
}

/// One note's gain contour, committed at absolute clock times: silence at
/// the start, full level by `ATTACK_FRACTION` of the note, held until
/// attack plus sustain, back to silence at the end.
fn commit_envelope(bank: &mut dyn ToneBank, slot: usize, start: f64, seconds: f64) {
    let attack_end = start + ATTACK_FRACTION * seconds;
    let release_start = start + (ATTACK_FRACTION + SUSTAIN_FRACTION) * seconds;

    bank.set_gain_at(slot, 0.0, start);
    bank.ramp_gain_to(slot, 1.0, attack_end);
    bank.set_gain_at(slot, 1.0, release_start);
    bank.ramp_gain_to(slot, 0.0, start + seconds);
}
