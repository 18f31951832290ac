//! Note scheduling and sine playback for beginner-facing music tools.
//!
//! Authoring is string-first: tones are note names (`"C#"`, `"Eb-"`) or
//! pentatonic scale numbers, durations are code letters (`"q"`, `"e."`) or
//! literal seconds. Playback is a lookahead scheduler that commits
//! sample-accurate gain envelopes onto a pool of always-running sine
//! generators.

pub mod audio;
pub mod engine; // Scheduling, transport, and the tick driver
pub mod music; // Tone and duration vocabulary
pub mod track;

pub const MAX_BLOCK_SIZE: usize = 2048;
