//! The track record: an append-only note loop plus its scheduling state.

use crate::engine::backend::ToneBank;
use crate::music::tone::Tone;

/// One authored note: a resolved tone and its length in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub tone: Tone,
    pub seconds: f64,
}

/// Stable handle to a track within one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub(crate) usize);

impl TrackId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A loop of notes with its own cursor, target time, and generator pool.
///
/// Notes only accumulate. The cursor names the next note to commit and
/// wraps past the end, which is what makes finite tracks loop. The target
/// time is the absolute clock second of that note's start, unset until the
/// scheduler first touches the track and again after a reset. Only the
/// scheduler moves either field.
pub struct Track {
    pub(crate) notes: Vec<Note>,
    pub(crate) cursor: usize,
    pub(crate) target_time: Option<f64>,
    pub(crate) bank: Box<dyn ToneBank>,
}

impl Track {
    pub fn new(bank: Box<dyn ToneBank>) -> Self {
        Self {
            notes: Vec::new(),
            cursor: 0,
            target_time: None,
            bank,
        }
    }

    pub fn push(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Seconds of one full pass through the loop.
    pub fn total_seconds(&self) -> f64 {
        self.notes.iter().map(|note| note.seconds).sum()
    }

    /// Index of the next note the scheduler will commit.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Absolute clock time of the next uncommitted note, once playback has
    /// touched this track.
    pub fn target_time(&self) -> Option<f64> {
        self.target_time
    }

    /// Forget all scheduling progress; the next pass starts from note zero.
    pub(crate) fn rewind(&mut self) {
        self.cursor = 0;
        self.target_time = None;
    }
}
