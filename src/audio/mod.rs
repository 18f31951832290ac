//! Sample generation: the audio half of the crate.
//!
//! A [`SynthBank`] holds sixty always-on sine generators, one per pool
//! pitch, each shaped by a [`automation::GainLine`] of timestamped events.
//! The realtime backend runs a bank inside the cpal callback; the offline
//! backend renders the same bank into a caller-supplied buffer.

/// Timestamped gain events and linear ramps.
pub mod automation;
/// Backend that renders under a simulated clock, for tests and bounce.
pub mod offline;
/// Phase-accumulating sine generator.
pub mod oscillator;
/// The cpal output stream and its command rings.
#[cfg(feature = "rtrb")]
pub mod output;
/// Sixty oscillator/gain pairs rendered additively.
pub mod synth;

pub use synth::SynthBank;
